//! Request and response types for the OpenAI vector store and assistant APIs.
//!
//! Only the fields this workflow reads or writes are modeled; everything
//! else in the service's responses is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A vector store as returned by `POST /vector_stores`.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorStore {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// An uploaded file as returned by `POST /files`.
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Status of a vector store file batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    InProgress,
    Completed,
    Cancelled,
    Failed,
    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

impl BatchStatus {
    /// Whether the batch has stopped changing.
    ///
    /// Unknown statuses are terminal so polling always ends.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-file counts reported for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileCounts {
    pub in_progress: u32,
    pub completed: u32,
    pub failed: u32,
    pub cancelled: u32,
    pub total: u32,
}

impl fmt::Display for FileCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "in_progress={}, completed={}, failed={}, cancelled={}, total={}",
            self.in_progress, self.completed, self.failed, self.cancelled, self.total
        )
    }
}

/// A vector store file batch.
#[derive(Debug, Clone, Deserialize)]
pub struct FileBatch {
    pub id: String,
    pub status: BatchStatus,
    #[serde(default)]
    pub file_counts: FileCounts,

    /// Delay requested by the service before the next poll (`openai-poll-after-ms`)
    #[serde(skip)]
    pub poll_after: Option<Duration>,
}

/// A tool enabled on an assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Tool {
    pub const FILE_SEARCH: &'static str = "file_search";

    /// The retrieval tool backed by vector stores.
    pub fn file_search() -> Self {
        Self {
            kind: Self::FILE_SEARCH.to_string(),
        }
    }
}

/// Resources bound to an assistant's tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_search: Option<FileSearchResources>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSearchResources {
    #[serde(default)]
    pub vector_store_ids: Vec<String>,
}

impl ToolResources {
    /// Bind `file_search` to exactly one vector store.
    pub fn file_search(vector_store_id: impl Into<String>) -> Self {
        Self {
            file_search: Some(FileSearchResources {
                vector_store_ids: vec![vector_store_id.into()],
            }),
        }
    }
}

/// An assistant as returned by the create and update endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub tool_resources: Option<ToolResources>,
}

impl Assistant {
    /// Vector stores attached to the `file_search` tool.
    pub fn vector_store_ids(&self) -> &[String] {
        self.tool_resources
            .as_ref()
            .and_then(|resources| resources.file_search.as_ref())
            .map(|fs| fs.vector_store_ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_file_search(&self) -> bool {
        self.tools.iter().any(|tool| tool.kind == Tool::FILE_SEARCH)
    }
}

/// Body of `POST /assistants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAssistantRequest {
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub tools: Vec<Tool>,
    pub tool_resources: ToolResources,
}

/// Body of `POST /assistants/{id}`.
///
/// Both lists replace the assistant's current values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateAssistantRequest {
    pub tools: Vec<Tool>,
    pub tool_resources: ToolResources,
}
