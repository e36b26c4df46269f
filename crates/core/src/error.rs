//! Error types for specstore.
//!
//! A single enum covers every failure the provisioning run can hit:
//! configuration, a missing remote file, failed HTTP requests, and
//! vector store ingestion that did not complete.

use thiserror::Error;

/// Unified error type for specstore.
///
/// Every error is terminal for the run; callers propagate with `?` and
/// `main` reports it.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing secrets, invalid log filter)
    #[error("{0}")]
    Config(String),

    /// The requested file or reference does not exist in the repository
    #[error("GitHub path not found: {owner}/{repo}:{path}@{reference}")]
    NotFound {
        owner: String,
        repo: String,
        path: String,
        reference: String,
    },

    /// Transport failures and non-success HTTP statuses
    #[error("Request error: {0}")]
    Request(String),

    /// A vector store file batch reached a terminal state other than `completed`
    #[error("Vector store file batch not completed: status={status}, counts={counts}")]
    Ingestion { status: String, counts: String },
}

impl AppError {
    /// Whether this error was raised before any network call was attempted.
    pub fn is_config(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = AppError::NotFound {
            owner: "acme".to_string(),
            repo: "boat".to_string(),
            path: "spec/spec.json".to_string(),
            reference: "main".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GitHub path not found: acme/boat:spec/spec.json@main"
        );
        assert!(!err.is_config());
    }

    #[test]
    fn test_ingestion_message_includes_counts() {
        let err = AppError::Ingestion {
            status: "failed".to_string(),
            counts: "in_progress=0, completed=0, failed=1, cancelled=0, total=1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("status=failed"));
        assert!(msg.contains("failed=1"));
    }

    #[test]
    fn test_config_message_is_verbatim() {
        let err = AppError::Config("Missing env GITHUB_TOKEN".to_string());
        assert_eq!(err.to_string(), "Missing env GITHUB_TOKEN");
        assert!(err.is_config());
    }
}
