//! HTTP client for the OpenAI files, vector store and assistant endpoints.
//!
//! API: https://platform.openai.com/docs/api-reference/vector-stores

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use specstore_core::{config::DEFAULT_OPENAI_BASE_URL, AppError, AppResult, SpecDocument};

use crate::assistant::Assistants;
use crate::types::{
    Assistant, CreateAssistantRequest, FileBatch, FileObject, UpdateAssistantRequest, VectorStore,
};
use crate::vector_store::VectorStores;

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_ASSISTANTS: &str = "assistants=v2";
const POLL_AFTER_HEADER: &str = "openai-poll-after-ms";
const FILE_PURPOSE: &str = "assistants";

#[derive(Serialize)]
struct CreateVectorStoreRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct CreateFileBatchRequest<'a> {
    file_ids: &'a [String],
}

/// OpenAI API client.
pub struct OpenAiClient {
    /// Base URL including the version prefix (e.g. `https://api.openai.com/v1`)
    base_url: String,

    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Create a client against `https://api.openai.com/v1`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_OPENAI_BASE_URL, api_key)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER, BETA_ASSISTANTS)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER, BETA_ASSISTANTS)
    }

    /// Send a request and fail on any non-success status.
    async fn send(&self, request: RequestBuilder, operation: &str) -> AppResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Request(format!("Failed to {}: {}", operation, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Request(format!(
                "OpenAI API error while trying to {} ({}): {}",
                operation, status, error_text
            )));
        }

        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: Response, operation: &str) -> AppResult<T> {
        response.json().await.map_err(|e| {
            AppError::Request(format!("Failed to parse response to {}: {}", operation, e))
        })
    }

    async fn send_batch(&self, request: RequestBuilder, operation: &str) -> AppResult<FileBatch> {
        let response = self.send(request, operation).await?;
        let poll_after = poll_after(&response);
        let mut batch: FileBatch = Self::parse(response, operation).await?;
        batch.poll_after = poll_after;
        Ok(batch)
    }
}

fn poll_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(POLL_AFTER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[async_trait::async_trait]
impl VectorStores for OpenAiClient {
    async fn create_vector_store(&self, name: &str) -> AppResult<VectorStore> {
        let operation = "create vector store";
        let request = self
            .post("/vector_stores")
            .json(&CreateVectorStoreRequest { name });
        let response = self.send(request, operation).await?;
        Self::parse(response, operation).await
    }

    async fn upload_file(&self, document: &SpecDocument) -> AppResult<FileObject> {
        let operation = "upload file";
        let part = reqwest::multipart::Part::bytes(document.bytes.clone())
            .file_name(document.filename.clone());
        let form = reqwest::multipart::Form::new()
            .text("purpose", FILE_PURPOSE)
            .part("file", part);

        let request = self.post("/files").multipart(form);
        let response = self.send(request, operation).await?;
        Self::parse(response, operation).await
    }

    async fn create_file_batch(
        &self,
        vector_store_id: &str,
        file_ids: &[String],
    ) -> AppResult<FileBatch> {
        let request = self
            .post(&format!("/vector_stores/{}/file_batches", vector_store_id))
            .json(&CreateFileBatchRequest { file_ids });
        self.send_batch(request, "create file batch").await
    }

    async fn get_file_batch(&self, vector_store_id: &str, batch_id: &str) -> AppResult<FileBatch> {
        let request = self.get(&format!(
            "/vector_stores/{}/file_batches/{}",
            vector_store_id, batch_id
        ));
        self.send_batch(request, "poll file batch").await
    }
}

#[async_trait::async_trait]
impl Assistants for OpenAiClient {
    async fn create_assistant(&self, request: &CreateAssistantRequest) -> AppResult<Assistant> {
        let operation = "create assistant";
        let response = self
            .send(self.post("/assistants").json(request), operation)
            .await?;
        Self::parse(response, operation).await
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        request: &UpdateAssistantRequest,
    ) -> AppResult<Assistant> {
        let operation = "update assistant";
        let response = self
            .send(
                self.post(&format!("/assistants/{}", assistant_id))
                    .json(request),
                operation,
            )
            .await?;
        Self::parse(response, operation).await
    }
}
