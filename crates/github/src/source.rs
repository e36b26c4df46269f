//! Abstraction over where the spec document comes from.

use specstore_core::AppResult;

/// Coordinates of a file inside a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLocation {
    pub owner: String,
    pub repo: String,
    /// Path inside the repository, `/`-separated
    pub path: String,
    /// Branch, tag or commit SHA; empty means the default branch
    pub reference: String,
}

impl SpecLocation {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            path: path.into(),
            reference: reference.into(),
        }
    }
}

impl std::fmt::Display for SpecLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}:{}@{}", self.owner, self.repo, self.path, self.reference)
    }
}

/// Trait for spec sources.
///
/// Implementations return the exact bytes of the file at `location`, or
/// `AppError::NotFound` when the path or reference does not exist.
#[async_trait::async_trait]
pub trait SpecSource: Send + Sync {
    async fn fetch(&self, location: &SpecLocation) -> AppResult<Vec<u8>>;
}
