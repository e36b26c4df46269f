//! In-memory stand-in for the OpenAI API, for tests.
//!
//! Records every call in order and answers with fixed IDs. File batch
//! statuses are served from a queue so tests can script ingestion.

use std::collections::VecDeque;
use std::sync::Mutex;

use specstore_core::{AppResult, SpecDocument};

use crate::assistant::Assistants;
use crate::types::{
    Assistant, BatchStatus, CreateAssistantRequest, FileBatch, FileCounts, FileObject,
    UpdateAssistantRequest, VectorStore,
};
use crate::vector_store::VectorStores;

/// A request received by [`MockOpenAi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateVectorStore(String),
    UploadFile {
        filename: String,
        len: usize,
    },
    CreateFileBatch {
        vector_store_id: String,
        file_ids: Vec<String>,
    },
    GetFileBatch {
        vector_store_id: String,
        batch_id: String,
    },
    CreateAssistant(CreateAssistantRequest),
    UpdateAssistant {
        assistant_id: String,
        request: UpdateAssistantRequest,
    },
}

#[derive(Debug, Default)]
pub struct MockOpenAi {
    calls: Mutex<Vec<Call>>,
    batch_statuses: Mutex<VecDeque<BatchStatus>>,
}

impl MockOpenAi {
    pub const CREATED_VECTOR_STORE_ID: &'static str = "vs_mock_created";
    pub const UPLOADED_FILE_ID: &'static str = "file_mock_uploaded";
    pub const BATCH_ID: &'static str = "vsfb_mock";
    pub const CREATED_ASSISTANT_ID: &'static str = "asst_mock_created";

    /// Every batch completes immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Statuses returned by successive batch create/get calls.
    ///
    /// Once the queue is drained the batch reports `completed`.
    pub fn with_batch_statuses(self, statuses: Vec<BatchStatus>) -> Self {
        *self.batch_statuses.lock().unwrap() = statuses.into();
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_batch(&self) -> FileBatch {
        let status = self
            .batch_statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(BatchStatus::Completed);

        let mut file_counts = FileCounts {
            total: 1,
            ..FileCounts::default()
        };
        match status {
            BatchStatus::InProgress => file_counts.in_progress = 1,
            BatchStatus::Completed => file_counts.completed = 1,
            BatchStatus::Cancelled => file_counts.cancelled = 1,
            BatchStatus::Failed | BatchStatus::Unknown => file_counts.failed = 1,
        }

        FileBatch {
            id: Self::BATCH_ID.to_string(),
            status,
            file_counts,
            poll_after: None,
        }
    }
}

#[async_trait::async_trait]
impl VectorStores for MockOpenAi {
    async fn create_vector_store(&self, name: &str) -> AppResult<VectorStore> {
        self.record(Call::CreateVectorStore(name.to_string()));
        Ok(VectorStore {
            id: Self::CREATED_VECTOR_STORE_ID.to_string(),
            name: Some(name.to_string()),
        })
    }

    async fn upload_file(&self, document: &SpecDocument) -> AppResult<FileObject> {
        self.record(Call::UploadFile {
            filename: document.filename.clone(),
            len: document.len(),
        });
        Ok(FileObject {
            id: Self::UPLOADED_FILE_ID.to_string(),
            filename: Some(document.filename.clone()),
            bytes: Some(document.len() as u64),
        })
    }

    async fn create_file_batch(
        &self,
        vector_store_id: &str,
        file_ids: &[String],
    ) -> AppResult<FileBatch> {
        self.record(Call::CreateFileBatch {
            vector_store_id: vector_store_id.to_string(),
            file_ids: file_ids.to_vec(),
        });
        Ok(self.next_batch())
    }

    async fn get_file_batch(&self, vector_store_id: &str, batch_id: &str) -> AppResult<FileBatch> {
        self.record(Call::GetFileBatch {
            vector_store_id: vector_store_id.to_string(),
            batch_id: batch_id.to_string(),
        });
        Ok(self.next_batch())
    }
}

#[async_trait::async_trait]
impl Assistants for MockOpenAi {
    async fn create_assistant(&self, request: &CreateAssistantRequest) -> AppResult<Assistant> {
        self.record(Call::CreateAssistant(request.clone()));
        Ok(Assistant {
            id: Self::CREATED_ASSISTANT_ID.to_string(),
            name: Some(request.name.clone()),
            model: request.model.clone(),
            tools: request.tools.clone(),
            tool_resources: Some(request.tool_resources.clone()),
        })
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        request: &UpdateAssistantRequest,
    ) -> AppResult<Assistant> {
        self.record(Call::UpdateAssistant {
            assistant_id: assistant_id.to_string(),
            request: request.clone(),
        });
        Ok(Assistant {
            id: assistant_id.to_string(),
            name: None,
            model: String::new(),
            tools: request.tools.clone(),
            tool_resources: Some(request.tool_resources.clone()),
        })
    }
}
