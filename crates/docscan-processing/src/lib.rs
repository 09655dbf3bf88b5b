//! Request body processing for docscan.
//!
//! The `upload` module turns a `multipart/form-data` request body into exactly one
//! [`UploadOutcome`](docscan_core::UploadOutcome).

pub mod upload;

pub use upload::{decode_upload, RequestBody, UploadLimits};
