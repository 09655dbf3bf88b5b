//! Result types produced by a single multipart upload decode.

use serde::Serialize;

/// Closed taxonomy of decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadErrorKind {
    #[error("file too large")]
    FileTooLarge,

    #[error("unsupported content type")]
    UnsupportedContentType,

    #[error("malformed multipart body")]
    MalformedMultipart,
}

impl UploadErrorKind {
    /// HTTP status the caller is expected to answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            UploadErrorKind::FileTooLarge => 413,
            UploadErrorKind::UnsupportedContentType => 400,
            UploadErrorKind::MalformedMultipart => 400,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadErrorKind::FileTooLarge => "file_too_large",
            UploadErrorKind::UnsupportedContentType => "unsupported_content_type",
            UploadErrorKind::MalformedMultipart => "malformed_multipart",
        }
    }
}

/// The one file extracted from an upload.
///
/// `size` always equals `buffer.len()`; the only constructor derives it from the
/// buffer, so the two cannot drift apart.
#[derive(Clone, PartialEq, Eq)]
pub struct ParsedFile {
    buffer: Vec<u8>,
    filename: String,
    mimetype: String,
    size: usize,
}

impl ParsedFile {
    pub fn new(buffer: Vec<u8>, filename: impl Into<String>, mimetype: impl Into<String>) -> Self {
        let size = buffer.len();
        Self {
            buffer,
            filename: filename.into(),
            mimetype: mimetype.into(),
            size,
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Filename as declared by the client. Untrusted.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("filename", &self.filename)
            .field("mimetype", &self.mimetype)
            .field("size", &self.size)
            .finish()
    }
}

/// Exactly one of these is produced per decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success(ParsedFile),
    /// Well-formed request without an upload field. Not an error.
    NoFile,
    Failure(UploadErrorKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_file_size_tracks_buffer() {
        let file = ParsedFile::new(vec![7u8; 1200], "note.png", "image/png");
        assert_eq!(file.size(), 1200);
        assert_eq!(file.size(), file.buffer().len());
    }

    #[test]
    fn error_kinds_carry_http_status() {
        assert_eq!(UploadErrorKind::FileTooLarge.http_status(), 413);
        assert_eq!(UploadErrorKind::UnsupportedContentType.http_status(), 400);
        assert_eq!(UploadErrorKind::MalformedMultipart.http_status(), 400);
    }

    #[test]
    fn debug_output_omits_buffer_contents() {
        let file = ParsedFile::new(b"secret-bytes".to_vec(), "a.png", "image/png");
        let rendered = format!("{:?}", file);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("a.png"));
    }
}
