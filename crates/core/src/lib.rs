//! specstore core library
//!
//! This crate provides the foundational utilities shared by the specstore crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration resolution from CLI arguments and environment
//! - The `SpecDocument` passed between provisioning stages

pub mod config;
pub mod document;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::AppConfig;
pub use document::SpecDocument;
pub use error::{AppError, AppResult};
