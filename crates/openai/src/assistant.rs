//! Assistant provisioning with `file_search` bound to one vector store.

use specstore_core::AppResult;

use crate::types::{Assistant, CreateAssistantRequest, Tool, ToolResources, UpdateAssistantRequest};

/// Instructions given to newly created assistants.
pub const ASSISTANT_INSTRUCTIONS: &str = "Answer questions about the boat using File Search. \
Cite facts from the provided spec where possible.";

/// Trait for the assistant endpoints this workflow needs.
#[async_trait::async_trait]
pub trait Assistants: Send + Sync {
    async fn create_assistant(&self, request: &CreateAssistantRequest) -> AppResult<Assistant>;

    async fn update_assistant(
        &self,
        assistant_id: &str,
        request: &UpdateAssistantRequest,
    ) -> AppResult<Assistant>;
}

/// Whether to update a known assistant or create a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantPlan {
    Update(String),
    Create { name: String, model: String },
}

impl AssistantPlan {
    /// Update `existing_id` when present, otherwise create a new assistant.
    pub fn new(
        existing_id: Option<String>,
        name: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        match existing_id {
            Some(id) => Self::Update(id),
            None => Self::Create {
                name: name.into(),
                model: model.into(),
            },
        }
    }
}

/// Make sure an assistant exists with `file_search` attached to `vector_store_id`.
///
/// The tool list and the tool's vector store list are replaced, never
/// appended to, so exactly one store is attached afterwards.
pub async fn ensure_assistant<A>(
    assistants: &A,
    plan: &AssistantPlan,
    vector_store_id: &str,
) -> AppResult<Assistant>
where
    A: Assistants + ?Sized,
{
    match plan {
        AssistantPlan::Update(id) => {
            let request = UpdateAssistantRequest {
                tools: vec![Tool::file_search()],
                tool_resources: ToolResources::file_search(vector_store_id),
            };
            let assistant = assistants.update_assistant(id, &request).await?;
            tracing::info!(
                "Updated Assistant: {} (attached Vector Store {})",
                assistant.id,
                vector_store_id
            );
            Ok(assistant)
        }
        AssistantPlan::Create { name, model } => {
            let request = CreateAssistantRequest {
                model: model.clone(),
                name: name.clone(),
                instructions: ASSISTANT_INSTRUCTIONS.to_string(),
                tools: vec![Tool::file_search()],
                tool_resources: ToolResources::file_search(vector_store_id),
            };
            let assistant = assistants.create_assistant(&request).await?;
            tracing::info!(
                "Created Assistant: {} (model={}, attached Vector Store {})",
                assistant.id,
                model,
                vector_store_id
            );
            Ok(assistant)
        }
    }
}
