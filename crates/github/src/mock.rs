//! In-memory spec source for tests.

use std::sync::Mutex;

use specstore_core::{AppError, AppResult};

use crate::source::{SpecLocation, SpecSource};

#[derive(Debug)]
enum Outcome {
    Content(Vec<u8>),
    NotFound,
    Failure(String),
}

/// Serves a fixed outcome and records every requested location.
#[derive(Debug)]
pub struct MockSource {
    outcome: Outcome,
    requests: Mutex<Vec<SpecLocation>>,
}

impl MockSource {
    /// Always returns `content`.
    pub fn with_content(content: impl Into<Vec<u8>>) -> Self {
        Self::from_outcome(Outcome::Content(content.into()))
    }

    /// Always reports the location as missing.
    pub fn not_found() -> Self {
        Self::from_outcome(Outcome::NotFound)
    }

    /// Always fails with a request error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_outcome(Outcome::Failure(message.into()))
    }

    fn from_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SpecLocation> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SpecSource for MockSource {
    async fn fetch(&self, location: &SpecLocation) -> AppResult<Vec<u8>> {
        self.requests.lock().unwrap().push(location.clone());
        match &self.outcome {
            Outcome::Content(bytes) => Ok(bytes.clone()),
            Outcome::NotFound => Err(AppError::NotFound {
                owner: location.owner.clone(),
                repo: location.repo.clone(),
                path: location.path.clone(),
                reference: location.reference.clone(),
            }),
            Outcome::Failure(message) => Err(AppError::Request(message.clone())),
        }
    }
}
