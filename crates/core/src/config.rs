//! Configuration resolution for specstore.
//!
//! Values come from two places:
//! - Command-line flags (`--owner`, `--repo`, `--path`, `--ref`, logging flags)
//! - Environment variables, which take precedence over the repository flags
//!
//! Both secrets are checked before anything else so that a misconfigured run
//! never reaches the network.

use std::fmt;

use crate::error::{AppError, AppResult};

pub const DEFAULT_SPEC_PATH: &str = "spec/spec.json";
pub const DEFAULT_REF: &str = "main";
pub const DEFAULT_SPEC_FILENAME: &str = "spec.json";
pub const DEFAULT_VECTOR_STORE_NAME: &str = "Boat Spec (MVP)";
pub const DEFAULT_ASSISTANT_NAME: &str = "Boat Spec Assistant (MVP)";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Repository coordinates as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    pub owner: String,
    pub repo: String,
    pub path: Option<String>,
    pub reference: Option<String>,
}

/// Fully resolved configuration for one provisioning run.
#[derive(Clone)]
pub struct AppConfig {
    /// GitHub token (bearer auth for the contents API)
    pub github_token: String,

    /// OpenAI API key
    pub openai_api_key: String,

    pub owner: String,
    pub repo: String,

    /// Path of the spec file inside the repository
    pub path: String,

    /// Branch, tag or commit SHA
    pub reference: String,

    pub github_api_url: String,
    pub openai_base_url: String,

    /// Existing vector store to reuse instead of creating one
    pub vector_store_id: Option<String>,
    pub vector_store_name: String,

    /// Existing assistant to update instead of creating one
    pub assistant_id: Option<String>,
    pub assistant_name: String,

    /// Model for a newly created assistant
    pub model: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("reference", &self.reference)
            .field("github_api_url", &self.github_api_url)
            .field("openai_base_url", &self.openai_base_url)
            .field("vector_store_id", &self.vector_store_id)
            .field("vector_store_name", &self.vector_store_name)
            .field("assistant_id", &self.assistant_id)
            .field("assistant_name", &self.assistant_name)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and the process environment.
    ///
    /// # Example
    /// ```no_run
    /// use specstore_core::config::{AppConfig, SourceArgs};
    ///
    /// let source = SourceArgs {
    ///     owner: "acme".to_string(),
    ///     repo: "boat".to_string(),
    ///     ..Default::default()
    /// };
    /// let config = AppConfig::load(source).expect("GITHUB_TOKEN and OPENAI_API_KEY must be set");
    /// println!("Fetching {}/{}", config.owner, config.repo);
    /// ```
    pub fn load(source: SourceArgs) -> AppResult<Self> {
        Self::from_lookup(source, |key| std::env::var(key).ok())
    }

    /// Resolve configuration using `env` to look up environment variables.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(source: SourceArgs, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).filter(|value| !value.is_empty());

        let github_token = var("GITHUB_TOKEN")
            .ok_or_else(|| AppError::Config("Missing env GITHUB_TOKEN".to_string()))?;
        let openai_api_key = var("OPENAI_API_KEY")
            .ok_or_else(|| AppError::Config("Missing env OPENAI_API_KEY".to_string()))?;

        let path = var("GITHUB_PATH")
            .or(source.path)
            .unwrap_or_else(|| DEFAULT_SPEC_PATH.to_string());
        let reference = var("GITHUB_REF")
            .or(source.reference)
            .unwrap_or_else(|| DEFAULT_REF.to_string());

        Ok(Self {
            github_token,
            openai_api_key,
            owner: var("GITHUB_OWNER").unwrap_or(source.owner),
            repo: var("GITHUB_REPO").unwrap_or(source.repo),
            path,
            reference,
            github_api_url: var("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            vector_store_id: var("VECTOR_STORE_ID"),
            vector_store_name: var("VECTOR_STORE_NAME")
                .unwrap_or_else(|| DEFAULT_VECTOR_STORE_NAME.to_string()),
            assistant_id: var("ASSISTANT_ID"),
            assistant_name: var("ASSISTANT_NAME")
                .unwrap_or_else(|| DEFAULT_ASSISTANT_NAME.to_string()),
            model: var("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            log_level: None,
            verbose: false,
            no_color: false,
        })
    }

    /// Apply logging flags from the command line.
    pub fn with_overrides(mut self, log_level: Option<String>, verbose: bool, no_color: bool) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Filename used for the upload: the last path segment, or `spec.json`.
    pub fn spec_filename(&self) -> String {
        self.path
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SPEC_FILENAME)
            .to_string()
    }
}
