//! Picks the single upload part out of a multipart body.

use docscan_core::constants::DEFAULT_PART_CONTENT_TYPE;
use docscan_core::{ParsedFile, UploadErrorKind, UploadOutcome};

use super::limits::UploadLimits;

/// Decision for one part, made from its headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Buffer this part; it is the upload.
    Accept { mimetype: String },
    /// This part claimed the upload slot but cannot be accepted. Drain it.
    Reject(UploadErrorKind),
    /// Not the upload. Drain it.
    Drain,
}

/// Per-decode selection state.
///
/// Only the first part whose name matches claims the upload slot; later matches
/// are drained like any other part.
#[derive(Debug)]
pub struct FieldFilter<'a> {
    field_names: &'a [String],
    allowed_content_types: &'a [String],
    claimed: bool,
    accepted: Option<ParsedFile>,
    failure: Option<UploadErrorKind>,
}

impl<'a> FieldFilter<'a> {
    pub fn new(limits: &'a UploadLimits) -> Self {
        Self {
            field_names: &limits.field_names,
            allowed_content_types: &limits.allowed_content_types,
            claimed: false,
            accepted: None,
            failure: None,
        }
    }

    pub fn admit(&mut self, name: Option<&str>, declared_type: Option<&str>) -> Admission {
        if self.claimed {
            return Admission::Drain;
        }

        let is_upload_field =
            name.is_some_and(|name| self.field_names.iter().any(|field| field == name));
        if !is_upload_field {
            return Admission::Drain;
        }
        self.claimed = true;

        let mimetype = declared_type
            .map(normalize_content_type)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_PART_CONTENT_TYPE.to_string());

        if self.allowed_content_types.iter().any(|t| *t == mimetype) {
            Admission::Accept { mimetype }
        } else {
            tracing::debug!(
                field = name.unwrap_or_default(),
                mimetype = %mimetype,
                "Rejecting upload part with unsupported content type"
            );
            self.record_failure(UploadErrorKind::UnsupportedContentType);
            Admission::Reject(UploadErrorKind::UnsupportedContentType)
        }
    }

    pub fn accept(&mut self, file: ParsedFile) {
        self.accepted = Some(file);
    }

    /// Keep the first failure; later ones are ignored.
    pub fn record_failure(&mut self, kind: UploadErrorKind) {
        self.failure.get_or_insert(kind);
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Outcome once the parser has finished cleanly.
    pub fn into_outcome(self) -> UploadOutcome {
        match (self.failure, self.accepted) {
            (Some(kind), _) => UploadOutcome::Failure(kind),
            (None, Some(file)) => UploadOutcome::Success(file),
            (None, None) => UploadOutcome::NoFile,
        }
    }
}

/// Media type essence: parameters stripped, trimmed, lowercased.
fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}
