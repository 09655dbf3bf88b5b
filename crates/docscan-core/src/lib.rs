//! Docscan Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the upload decoder, the recognition collaborator and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, RecognitionConfig, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ParsedFile, UploadErrorKind, UploadOutcome};
