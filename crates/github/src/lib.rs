//! GitHub integration for specstore.
//!
//! Fetches a single file at a given reference through the repository
//! contents API, using the raw media type so the body is the file itself.
//!
//! # Example
//! ```no_run
//! use specstore_github::{GitHubClient, SpecLocation, SpecSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GitHubClient::new("ghp_...")?;
//! let location = SpecLocation::new("acme", "boat", "spec/spec.json", "main");
//! let bytes = client.fetch(&location).await?;
//! println!("{} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod source;

pub use client::GitHubClient;
pub use source::{SpecLocation, SpecSource};
