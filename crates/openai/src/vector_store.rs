//! Vector store provisioning and document ingestion.

use std::time::Duration;

use specstore_core::{AppError, AppResult, SpecDocument};

use crate::types::{BatchStatus, FileBatch, FileObject, VectorStore};

/// Poll interval used when the service does not suggest one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Trait for the vector store endpoints this workflow needs.
#[async_trait::async_trait]
pub trait VectorStores: Send + Sync {
    /// Create an empty vector store.
    async fn create_vector_store(&self, name: &str) -> AppResult<VectorStore>;

    /// Upload a document as a file usable by assistants.
    async fn upload_file(&self, document: &SpecDocument) -> AppResult<FileObject>;

    /// Attach uploaded files to a vector store as one batch.
    async fn create_file_batch(
        &self,
        vector_store_id: &str,
        file_ids: &[String],
    ) -> AppResult<FileBatch>;

    /// Fetch the current state of a batch.
    async fn get_file_batch(&self, vector_store_id: &str, batch_id: &str) -> AppResult<FileBatch>;
}

/// Whether to reuse a known vector store or create a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorStorePlan {
    Reuse(String),
    Create { name: String },
}

impl VectorStorePlan {
    /// Reuse `existing_id` when present, otherwise create a store named `name`.
    pub fn new(existing_id: Option<String>, name: impl Into<String>) -> Self {
        match existing_id {
            Some(id) => Self::Reuse(id),
            None => Self::Create { name: name.into() },
        }
    }
}

/// Resolve a plan to a vector store ID.
///
/// `Reuse` trusts the given ID and makes no request.
pub async fn ensure_vector_store<S>(stores: &S, plan: &VectorStorePlan) -> AppResult<String>
where
    S: VectorStores + ?Sized,
{
    match plan {
        VectorStorePlan::Reuse(id) => {
            tracing::info!("Reusing Vector Store: {}", id);
            Ok(id.clone())
        }
        VectorStorePlan::Create { name } => {
            let store = stores.create_vector_store(name).await?;
            tracing::info!("Created Vector Store: {} (name='{}')", store.id, name);
            Ok(store.id)
        }
    }
}

/// Upload `document` into the vector store and wait for ingestion to finish.
///
/// Polls the batch until it leaves `in_progress`, waiting for the delay the
/// service suggests or `poll_interval` between requests. Any terminal status
/// other than `completed` becomes `AppError::Ingestion`.
pub async fn upload_document<S>(
    stores: &S,
    vector_store_id: &str,
    document: &SpecDocument,
    poll_interval: Duration,
) -> AppResult<FileBatch>
where
    S: VectorStores + ?Sized,
{
    let file = stores.upload_file(document).await?;
    tracing::debug!("Uploaded file {} as {}", document.filename, file.id);

    let mut batch = stores
        .create_file_batch(vector_store_id, std::slice::from_ref(&file.id))
        .await?;

    while !batch.status.is_terminal() {
        let wait = batch.poll_after.unwrap_or(poll_interval);
        tracing::debug!(
            batch_id = %batch.id,
            counts = %batch.file_counts,
            "Batch in progress, polling again in {:?}",
            wait
        );
        tokio::time::sleep(wait).await;
        batch = stores.get_file_batch(vector_store_id, &batch.id).await?;
    }

    if batch.status != BatchStatus::Completed {
        return Err(AppError::Ingestion {
            status: batch.status.to_string(),
            counts: batch.file_counts.to_string(),
        });
    }

    tracing::info!("Uploaded to Vector Store. File counts: {}", batch.file_counts);
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockOpenAi};

    const POLL: Duration = Duration::from_millis(1);

    fn document() -> SpecDocument {
        SpecDocument::new(br#"{"mast": "aluminium"}"#.to_vec(), "spec.json")
    }

    #[test]
    fn test_plan_from_config() {
        assert_eq!(
            VectorStorePlan::new(Some("vs_1".to_string()), "Boat Spec (MVP)"),
            VectorStorePlan::Reuse("vs_1".to_string())
        );
        assert_eq!(
            VectorStorePlan::new(None, "Boat Spec (MVP)"),
            VectorStorePlan::Create {
                name: "Boat Spec (MVP)".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_reuse_makes_no_calls() {
        let api = MockOpenAi::new();
        let id = ensure_vector_store(&api, &VectorStorePlan::Reuse("vs_existing".to_string()))
            .await
            .unwrap();
        assert_eq!(id, "vs_existing");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_returns_generated_id() {
        let api = MockOpenAi::new();
        let plan = VectorStorePlan::Create {
            name: "Boat Spec (MVP)".to_string(),
        };
        let id = ensure_vector_store(&api, &plan).await.unwrap();
        assert_eq!(id, MockOpenAi::CREATED_VECTOR_STORE_ID);
        assert_eq!(
            api.calls(),
            vec![Call::CreateVectorStore("Boat Spec (MVP)".to_string())]
        );
    }

    #[tokio::test]
    async fn test_upload_polls_until_completed() {
        let api = MockOpenAi::new().with_batch_statuses(vec![
            BatchStatus::InProgress,
            BatchStatus::InProgress,
            BatchStatus::Completed,
        ]);
        let batch = upload_document(&api, "vs_1", &document(), POLL).await.unwrap();
        assert_eq!(batch.status, BatchStatus::Completed);

        let calls = api.calls();
        assert_eq!(
            calls[0],
            Call::UploadFile {
                filename: "spec.json".to_string(),
                len: document().len(),
            }
        );
        assert_eq!(
            calls[1],
            Call::CreateFileBatch {
                vector_store_id: "vs_1".to_string(),
                file_ids: vec![MockOpenAi::UPLOADED_FILE_ID.to_string()],
            }
        );
        let polls = calls
            .iter()
            .filter(|call| matches!(call, Call::GetFileBatch { .. }))
            .count();
        assert_eq!(polls, 2);
    }

    #[tokio::test]
    async fn test_upload_failed_batch_is_ingestion_error() {
        let api = MockOpenAi::new()
            .with_batch_statuses(vec![BatchStatus::InProgress, BatchStatus::Failed]);
        let err = upload_document(&api, "vs_1", &document(), POLL)
            .await
            .unwrap_err();
        match err {
            AppError::Ingestion { status, counts } => {
                assert_eq!(status, "failed");
                assert!(counts.contains("failed=1"));
                assert!(counts.contains("total=1"));
            }
            other => panic!("Expected Ingestion error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_cancelled_batch_is_ingestion_error() {
        let api = MockOpenAi::new().with_batch_statuses(vec![BatchStatus::Cancelled]);
        let err = upload_document(&api, "vs_1", &document(), POLL)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Ingestion { ref status, .. } if status == "cancelled"));
    }
}
