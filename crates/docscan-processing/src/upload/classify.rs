//! Maps raw decode failures onto [`UploadErrorKind`].
//!
//! Unrecognised failures classify as `MalformedMultipart`; internal text never
//! leaves this module.

use docscan_core::UploadErrorKind;

const TOO_LARGE_MARKERS: &[&str] = &[
    "file too large",
    "payload too large",
    "length limit exceeded",
    "size limit",
    "size exceeded",
];

const UNSUPPORTED_MARKERS: &[&str] = &[
    "unsupported content type",
    "unsupported media type",
    "unsupported file type",
];

const MALFORMED_MARKERS: &[&str] = &[
    "unexpected end",
    "incomplete",
    "truncated",
    "boundary",
    "malformed",
];

/// Classify an error surfaced by the multipart parser.
pub fn classify_parser_error(err: &multer::Error) -> UploadErrorKind {
    match err {
        multer::Error::FieldSizeExceeded { .. } | multer::Error::StreamSizeExceeded { .. } => {
            UploadErrorKind::FileTooLarge
        }
        // Body transport errors arrive wrapped; their text is all we have.
        multer::Error::StreamReadFailed(source) => classify_message(&source.to_string()),
        multer::Error::IncompleteStream
        | multer::Error::IncompleteFieldData { .. }
        | multer::Error::IncompleteHeaders
        | multer::Error::NoBoundary
        | multer::Error::NoMultipart => UploadErrorKind::MalformedMultipart,
        other => classify_message(&other.to_string()),
    }
}

/// Classify a failure from its message text.
pub fn classify_message(message: &str) -> UploadErrorKind {
    let lowered = message.to_lowercase();
    let has_marker = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

    if has_marker(TOO_LARGE_MARKERS) {
        UploadErrorKind::FileTooLarge
    } else if has_marker(UNSUPPORTED_MARKERS) {
        UploadErrorKind::UnsupportedContentType
    } else {
        if !has_marker(MALFORMED_MARKERS) {
            tracing::debug!(error = %message, "Unrecognized upload failure, treating as malformed");
        }
        UploadErrorKind::MalformedMultipart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_markers_win() {
        assert_eq!(
            classify_message("length limit exceeded"),
            UploadErrorKind::FileTooLarge
        );
        assert_eq!(
            classify_message("File Too Large: 11534336 bytes"),
            UploadErrorKind::FileTooLarge
        );
    }

    #[test]
    fn unsupported_marker_is_recognised() {
        assert_eq!(
            classify_message("unsupported content type image/gif"),
            UploadErrorKind::UnsupportedContentType
        );
    }

    #[test]
    fn truncation_and_unknown_text_are_malformed() {
        assert_eq!(
            classify_message("Unexpected end of form"),
            UploadErrorKind::MalformedMultipart
        );
        assert_eq!(
            classify_message("connection reset by peer"),
            UploadErrorKind::MalformedMultipart
        );
        assert_eq!(classify_message(""), UploadErrorKind::MalformedMultipart);
    }

    #[test]
    fn parser_variants_are_classified() {
        assert_eq!(
            classify_parser_error(&multer::Error::IncompleteStream),
            UploadErrorKind::MalformedMultipart
        );
        assert_eq!(
            classify_parser_error(&multer::Error::NoBoundary),
            UploadErrorKind::MalformedMultipart
        );
        assert_eq!(
            classify_parser_error(&multer::Error::StreamSizeExceeded { limit: 10 }),
            UploadErrorKind::FileTooLarge
        );
    }

    #[test]
    fn wrapped_transport_errors_use_their_text() {
        let too_large = multer::Error::StreamReadFailed("length limit exceeded".into());
        assert_eq!(classify_parser_error(&too_large), UploadErrorKind::FileTooLarge);

        let reset = multer::Error::StreamReadFailed("connection reset".into());
        assert_eq!(
            classify_parser_error(&reset),
            UploadErrorKind::MalformedMultipart
        );
    }
}
