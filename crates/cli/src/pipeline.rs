//! The three provisioning stages, run strictly in order.
//!
//! fetch spec -> ensure vector store + upload -> ensure assistant

use std::time::Duration;

use specstore_core::{AppConfig, AppResult, SpecDocument};
use specstore_github::{SpecLocation, SpecSource};
use specstore_openai::{
    ensure_assistant, ensure_vector_store, upload_document, AssistantPlan, Assistants,
    VectorStorePlan, VectorStores,
};

/// Identifiers produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    /// Size of the fetched spec document
    pub spec_bytes: usize,
    pub filename: String,
    pub vector_store_id: String,
    pub assistant_id: String,
}

impl Provisioned {
    /// Human-readable summary for stdout.
    pub fn summary(&self) -> String {
        format!(
            "Ready!\nVector Store ID : {}\nAssistant ID    : {}\nYou can now ask the assistant questions grounded in {}.",
            self.vector_store_id, self.assistant_id, self.filename
        )
    }
}

/// Run the full provisioning sequence.
///
/// The first error aborts the run; later stages are never reached.
pub async fn run<S, V, A>(
    config: &AppConfig,
    source: &S,
    stores: &V,
    assistants: &A,
    poll_interval: Duration,
) -> AppResult<Provisioned>
where
    S: SpecSource + ?Sized,
    V: VectorStores + ?Sized,
    A: Assistants + ?Sized,
{
    let location = SpecLocation::new(
        config.owner.as_str(),
        config.repo.as_str(),
        config.path.as_str(),
        config.reference.as_str(),
    );
    tracing::info!("Fetching {} from GitHub", location);
    let bytes = source.fetch(&location).await?;
    let document = SpecDocument::new(bytes, config.spec_filename());
    tracing::info!("Fetched {} bytes.", document.len());

    let plan = VectorStorePlan::new(
        config.vector_store_id.clone(),
        config.vector_store_name.as_str(),
    );
    let vector_store_id = ensure_vector_store(stores, &plan).await?;
    upload_document(stores, &vector_store_id, &document, poll_interval).await?;

    let plan = AssistantPlan::new(
        config.assistant_id.clone(),
        config.assistant_name.as_str(),
        config.model.as_str(),
    );
    let assistant = ensure_assistant(assistants, &plan, &vector_store_id).await?;

    Ok(Provisioned {
        spec_bytes: document.len(),
        filename: document.filename,
        vector_store_id,
        assistant_id: assistant.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use specstore_core::config::SourceArgs;
    use specstore_core::AppError;
    use specstore_github::mock::MockSource;
    use specstore_openai::mock::{Call, MockOpenAi};
    use specstore_openai::{BatchStatus, Tool, ToolResources, UpdateAssistantRequest};
    use std::collections::HashMap;

    const POLL: Duration = Duration::from_millis(1);
    const SPEC: &[u8] = br#"{"boat": {"name": "Petrel", "loa_m": 9.8}}"#;

    fn config(extra: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = [("GITHUB_TOKEN", "ghp_test"), ("OPENAI_API_KEY", "sk-test")]
            .iter()
            .chain(extra.iter())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let source = SourceArgs {
            owner: "acme".to_string(),
            repo: "boat".to_string(),
            path: None,
            reference: None,
        };
        AppConfig::from_lookup(source, |key| env.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_run_creates_everything() {
        let config = config(&[]);
        let source = MockSource::with_content(SPEC);
        let api = MockOpenAi::new();

        let result = run(&config, &source, &api, &api, POLL).await.unwrap();

        assert_eq!(
            source.requests(),
            vec![SpecLocation::new("acme", "boat", "spec/spec.json", "main")]
        );
        assert_eq!(result.spec_bytes, SPEC.len());
        assert_eq!(result.filename, "spec.json");
        assert_eq!(result.vector_store_id, MockOpenAi::CREATED_VECTOR_STORE_ID);
        assert_eq!(result.assistant_id, MockOpenAi::CREATED_ASSISTANT_ID);

        let calls = api.calls();
        assert_eq!(calls[0], Call::CreateVectorStore("Boat Spec (MVP)".to_string()));
        assert_eq!(
            calls[2],
            Call::CreateFileBatch {
                vector_store_id: MockOpenAi::CREATED_VECTOR_STORE_ID.to_string(),
                file_ids: vec![MockOpenAi::UPLOADED_FILE_ID.to_string()],
            }
        );
        match calls.last() {
            Some(Call::CreateAssistant(request)) => {
                assert_eq!(request.model, "gpt-4o-mini");
                assert_eq!(request.name, "Boat Spec Assistant (MVP)");
                assert_eq!(
                    request.tool_resources,
                    ToolResources::file_search(MockOpenAi::CREATED_VECTOR_STORE_ID)
                );
            }
            other => panic!("Expected create assistant last, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_uploaded_bytes_match_fetched_bytes() {
        let config = config(&[("GITHUB_PATH", "specs/hull.json")]);
        let source = MockSource::with_content(SPEC);
        let api = MockOpenAi::new();

        let result = run(&config, &source, &api, &api, POLL).await.unwrap();

        assert_eq!(result.filename, "hull.json");
        assert!(api.calls().contains(&Call::UploadFile {
            filename: "hull.json".to_string(),
            len: SPEC.len(),
        }));
    }

    #[tokio::test]
    async fn test_not_found_stops_before_openai() {
        let config = config(&[]);
        let source = MockSource::not_found();
        let api = MockOpenAi::new();

        let err = run(&config, &source, &api, &api, POLL).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_stops_before_openai() {
        let config = config(&[]);
        let source = MockSource::failing("GitHub API error (500 Internal Server Error)");
        let api = MockOpenAi::new();

        let err = run(&config, &source, &api, &api, POLL).await.unwrap_err();

        assert!(matches!(err, AppError::Request(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_existing_ids_reuse_and_update() {
        let config = config(&[("VECTOR_STORE_ID", "vs_keep"), ("ASSISTANT_ID", "asst_keep")]);
        let source = MockSource::with_content(SPEC);
        let api = MockOpenAi::new();

        let result = run(&config, &source, &api, &api, POLL).await.unwrap();

        assert_eq!(result.vector_store_id, "vs_keep");
        assert_eq!(result.assistant_id, "asst_keep");

        let calls = api.calls();
        assert!(!calls
            .iter()
            .any(|call| matches!(call, Call::CreateVectorStore(_) | Call::CreateAssistant(_))));
        let updates: Vec<&Call> = calls
            .iter()
            .filter(|call| matches!(call, Call::UpdateAssistant { .. }))
            .collect();
        assert_eq!(
            updates,
            vec![&Call::UpdateAssistant {
                assistant_id: "asst_keep".to_string(),
                request: UpdateAssistantRequest {
                    tools: vec![Tool::file_search()],
                    tool_resources: ToolResources::file_search("vs_keep"),
                },
            }]
        );
    }

    #[tokio::test]
    async fn test_failed_ingestion_skips_assistant() {
        let config = config(&[("ASSISTANT_ID", "asst_keep")]);
        let source = MockSource::with_content(SPEC);
        let api = MockOpenAi::new()
            .with_batch_statuses(vec![BatchStatus::InProgress, BatchStatus::Failed]);

        let err = run(&config, &source, &api, &api, POLL).await.unwrap_err();

        assert!(matches!(err, AppError::Ingestion { .. }));
        assert!(!api
            .calls()
            .iter()
            .any(|call| matches!(call, Call::CreateAssistant(_) | Call::UpdateAssistant { .. })));
    }

    #[test]
    fn test_summary() {
        let provisioned = Provisioned {
            spec_bytes: 10,
            filename: "spec.json".to_string(),
            vector_store_id: "vs_1".to_string(),
            assistant_id: "asst_1".to_string(),
        };
        let summary = provisioned.summary();
        assert!(summary.starts_with("Ready!"));
        assert!(summary.contains("Vector Store ID : vs_1"));
        assert!(summary.contains("Assistant ID    : asst_1"));
    }
}
