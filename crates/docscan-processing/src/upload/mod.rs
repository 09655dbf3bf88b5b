//! Streaming multipart upload decoding
//!
//! Body bytes flow through a `multer` parser; the first part named like an upload
//! field is size-guarded and buffered, every other part is drained. All terminal
//! signals (parser finish, parser error, size trip, timeout) report into one
//! [`SettlementGate`] and only the first of them decides the outcome.

mod body_source;
mod classify;
mod decoder;
mod field_filter;
mod limits;
mod settlement;
mod size_guard;
mod timeout;

pub use body_source::{
    is_multipart, AbortHandle, AbortableBody, BodySource, BoxError, ByteStream, RequestBody,
};
pub use classify::{classify_message, classify_parser_error};
pub use decoder::decode_upload;
pub use field_filter::{Admission, FieldFilter};
pub use limits::UploadLimits;
pub use settlement::{Settlement, SettlementGate};
pub use size_guard::{ChunkVerdict, SizeGuard};
pub use timeout::TimeoutSentinel;
