//! Upload and recognition defaults

/// Hard cap on the accepted multipart part.
pub const UPLOAD_MAX_FILE_SIZE_MB: usize = 10;

/// Wall-clock bound on a single multipart decode.
pub const UPLOAD_TIMEOUT_SECS: u64 = 15;

/// Content types the upload field may declare (compared lowercased).
pub const UPLOAD_ALLOWED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];

/// Part names accepted as the upload field (exact, case-sensitive).
///
/// Both names are honoured for existing clients; nothing documents why two
/// names exist, so treat `image` as an alias rather than a separate contract.
pub const UPLOAD_FIELD_NAMES: &[&str] = &["file", "image"];

/// Content type assumed for a part that declares none.
pub const DEFAULT_PART_CONTENT_TYPE: &str = "application/octet-stream";

/// Filename reported for a part that declares none.
pub const DEFAULT_PART_FILENAME: &str = "unknown";

/// Secondary cap applied by the recognition collaborator after decoding.
pub const OCR_MAX_FILE_SIZE_MB: usize = 4;

pub const OCR_TIMEOUT_SECS: u64 = 30;

pub const OCR_DEFAULT_API_URL: &str = "https://api.ocr.space/parse/image";
