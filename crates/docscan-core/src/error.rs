//! Error types module
//!
//! All failures that can reach an HTTP client are unified under `AppError`. Each
//! variant self-describes its response through `ErrorMetadata` so the API crate
//! can render them without matching on variants again.

use crate::config::UploadConfig;
use crate::models::UploadErrorKind;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client behaviour worth noticing, like oversized uploads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether the same request can succeed if retried
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedMediaType(String),

    #[error("Malformed multipart body: {0}")]
    MalformedMultipart(String),

    #[error("Missing file: {0}")]
    MissingFile(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Client-facing error for a failed decode, worded with the limits in force.
    pub fn from_upload_failure(kind: UploadErrorKind, limits: &UploadConfig) -> Self {
        match kind {
            UploadErrorKind::FileTooLarge => AppError::PayloadTooLarge(format!(
                "File exceeds maximum allowed size of {}",
                describe_size(limits.max_file_size_bytes)
            )),
            UploadErrorKind::UnsupportedContentType => AppError::UnsupportedMediaType(format!(
                "Unsupported file type. Allowed types: {}",
                limits.allowed_content_types.join(", ")
            )),
            UploadErrorKind::MalformedMultipart => {
                AppError::MalformedMultipart("Invalid multipart/form-data body".to_string())
            }
        }
    }
}

fn describe_size(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else {
        format!("{} bytes", bytes)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::PayloadTooLarge(_) => (
            413,
            "FILE_TOO_LARGE",
            false,
            Some("Reduce file size and upload again"),
            false,
            LogLevel::Warn,
        ),
        AppError::UnsupportedMediaType(_) => (
            400,
            "UNSUPPORTED_CONTENT_TYPE",
            false,
            Some("Upload one of the allowed image types"),
            false,
            LogLevel::Debug,
        ),
        AppError::MalformedMultipart(_) => (
            400,
            "MALFORMED_MULTIPART",
            false,
            Some("Send the file as multipart/form-data in a field named 'file'"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingFile(_) => (
            400,
            "MISSING_FILE",
            false,
            Some("Attach the file in a field named 'file'"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Check API key or authentication token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Recognition(_) => (
            502,
            "RECOGNITION_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::MalformedMultipart(_) => "MalformedMultipart",
            AppError::MissingFile(_) => "MissingFile",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Recognition(_) => "Recognition",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::UnsupportedMediaType(ref msg) => msg.clone(),
            AppError::MalformedMultipart(ref msg) => msg.clone(),
            AppError::MissingFile(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Recognition(_) => "Document recognition failed".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
