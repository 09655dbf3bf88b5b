//! Docscan Services Library
//!
//! External collaborators that consume a decoded upload.

pub mod recognition;

pub use recognition::{DocumentRecognizer, HttpRecognizer, RecognitionError, RecognizedDocument};
