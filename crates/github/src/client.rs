//! GitHub contents API client.
//!
//! API: https://docs.github.com/en/rest/repos/contents#get-repository-content

use std::time::Duration;

use reqwest::StatusCode;
use specstore_core::{config::DEFAULT_GITHUB_API_URL, AppError, AppResult};

use crate::source::{SpecLocation, SpecSource};

const RAW_ACCEPT: &str = "application/vnd.github.raw";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "spec-vectorstore-bootstrap";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub client authenticated with a bearer token.
pub struct GitHubClient {
    /// Base URL for the REST API
    base_url: String,

    token: String,

    /// HTTP client
    client: reqwest::Client,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a client against `https://api.github.com`.
    pub fn new(token: impl Into<String>) -> AppResult<Self> {
        Self::with_base_url(DEFAULT_GITHUB_API_URL, token)
    }

    /// Create a client against a custom API base (GitHub Enterprise, tests).
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Request(format!("Failed to build GitHub client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    fn contents_url(&self, location: &SpecLocation) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            location.owner,
            location.repo,
            location.path.trim_start_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl SpecSource for GitHubClient {
    async fn fetch(&self, location: &SpecLocation) -> AppResult<Vec<u8>> {
        let url = self.contents_url(location);
        tracing::debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, RAW_ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION);

        if !location.reference.is_empty() {
            request = request.query(&[("ref", location.reference.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Request(format!("Failed to send request to GitHub: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound {
                owner: location.owner.clone(),
                repo: location.repo.clone(),
                path: location.path.clone(),
                reference: location.reference.clone(),
            });
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Request(format!(
                "GitHub API error ({}): {}",
                status, error_text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Request(format!("Failed to read GitHub response: {}", e)))?;

        tracing::debug!("Received {} bytes from GitHub", bytes.len());
        Ok(bytes.to_vec())
    }
}
