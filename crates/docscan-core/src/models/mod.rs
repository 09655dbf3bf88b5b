pub mod upload;

pub use upload::{ParsedFile, UploadErrorKind, UploadOutcome};
