//! OpenAI integration for specstore.
//!
//! This crate provisions the retrieval side of the workflow through the
//! Assistants v2 API:
//! - **Vector stores**: create or reuse a store, upload a document as a
//!   one-file batch and poll until ingestion finishes
//! - **Assistants**: create or update an assistant with `file_search`
//!   bound to exactly one vector store
//!
//! Both concerns sit behind traits (`VectorStores`, `Assistants`) that
//! `OpenAiClient` implements over HTTP.

pub mod assistant;
pub mod client;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;
pub mod vector_store;

// Re-export main types
pub use assistant::{ensure_assistant, AssistantPlan, Assistants, ASSISTANT_INSTRUCTIONS};
pub use client::OpenAiClient;
pub use types::{
    Assistant, BatchStatus, CreateAssistantRequest, FileBatch, FileCounts, FileObject, Tool,
    ToolResources, UpdateAssistantRequest, VectorStore,
};
pub use vector_store::{
    ensure_vector_store, upload_document, VectorStorePlan, VectorStores, DEFAULT_POLL_INTERVAL,
};
