//! Drives one multipart decode to its single outcome.

use docscan_core::constants::DEFAULT_PART_FILENAME;
use docscan_core::{ParsedFile, UploadErrorKind, UploadOutcome};

use super::body_source::{AbortHandle, AbortableBody, BodySource, ByteStream, RequestBody};
use super::classify::classify_parser_error;
use super::field_filter::{Admission, FieldFilter};
use super::limits::UploadLimits;
use super::settlement::SettlementGate;
use super::size_guard::{ChunkVerdict, SizeGuard};
use super::timeout::TimeoutSentinel;

/// Decode a request body and extract at most one upload part.
///
/// Never fails: every error is classified into the returned outcome.
///
/// A request whose Content-Type is not `multipart/form-data` yields
/// [`UploadOutcome::NoFile`] without reading the body. Otherwise the body is
/// parsed part by part under `limits`: the first part named like an upload field
/// is buffered, everything else is drained. The decode resolves as soon as one of
/// parser finish, parser error, size trip or timeout occurs.
pub async fn decode_upload(
    content_type: Option<&str>,
    body: RequestBody,
    limits: &UploadLimits,
) -> UploadOutcome {
    let (content_type, stream) = match BodySource::from_parts(content_type, body) {
        BodySource::NotMultipart => {
            tracing::debug!("Request is not multipart/form-data, skipping upload decode");
            return UploadOutcome::NoFile;
        }
        BodySource::MissingBody => {
            tracing::debug!("Multipart request without a body");
            return UploadOutcome::Failure(UploadErrorKind::MalformedMultipart);
        }
        BodySource::Multipart {
            content_type,
            stream,
        } => (content_type, stream),
    };

    let mut sentinel = TimeoutSentinel::start(limits.timeout);
    let outcome = decode_multipart(&content_type, stream, limits, &mut sentinel).await;

    match &outcome {
        UploadOutcome::Success(file) => tracing::debug!(
            filename = %file.filename(),
            content_type = %file.mimetype(),
            size = file.size(),
            "Upload decoded"
        ),
        UploadOutcome::NoFile => tracing::debug!("Multipart body carried no upload field"),
        UploadOutcome::Failure(kind) => {
            tracing::debug!(error_kind = kind.as_str(), "Upload decode failed")
        }
    }

    outcome
}

/// Races the parser against `sentinel`. The sentinel is disarmed on return,
/// whichever side finished first.
async fn decode_multipart(
    content_type: &str,
    stream: ByteStream,
    limits: &UploadLimits,
    sentinel: &mut TimeoutSentinel,
) -> UploadOutcome {
    let (gate, settlement) = SettlementGate::new();
    let (body, abort) = AbortableBody::new(stream);

    tokio::select! {
        biased;
        _ = drive(content_type, body, &abort, limits, &gate) => {}
        _ = sentinel.expired() => {
            if gate.settle(UploadOutcome::Failure(UploadErrorKind::MalformedMultipart)) {
                tracing::warn!(
                    timeout_secs = limits.timeout.as_secs(),
                    "Upload decode timed out"
                );
            }
            abort.abort();
        }
    }

    sentinel.cancel();
    drop(gate);
    settlement.outcome().await
}

/// Runs the parser to completion and reports every terminal signal to `gate`.
async fn drive(
    content_type: &str,
    body: AbortableBody,
    abort: &AbortHandle,
    limits: &UploadLimits,
    gate: &SettlementGate,
) {
    let boundary = match multer::parse_boundary(content_type) {
        Ok(boundary) => boundary,
        Err(err) => {
            settle_parser_error(gate, &err);
            return;
        }
    };

    let mut multipart = multer::Multipart::new(body, boundary);
    let mut filter = FieldFilter::new(limits);

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                settle_parser_error(gate, &err);
                return;
            }
        };

        let admission = filter.admit(
            field.name(),
            field.content_type().map(|mime| mime.essence_str()),
        );

        let mimetype = match admission {
            Admission::Accept { mimetype } => mimetype,
            Admission::Reject(_) | Admission::Drain => {
                match drain(&mut field).await {
                    Ok(discarded) => tracing::debug!(
                        field_name = field.name().unwrap_or_default(),
                        discarded,
                        "Drained part"
                    ),
                    Err(err) => {
                        settle_parser_error(gate, &err);
                        return;
                    }
                }
                continue;
            }
        };

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PART_FILENAME)
            .to_string();

        let mut guard = SizeGuard::new(limits.max_file_size);
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if guard.push(chunk) == ChunkVerdict::Exceeded {
                        if gate.settle(UploadOutcome::Failure(UploadErrorKind::FileTooLarge)) {
                            tracing::warn!(
                                filename = %filename,
                                limit = limits.max_file_size,
                                received = guard.received(),
                                "Upload exceeded size limit, aborting transfer"
                            );
                        }
                        abort.abort();
                        return;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    settle_parser_error(gate, &err);
                    return;
                }
            }
        }

        match guard.finish() {
            Ok(buffer) => filter.accept(ParsedFile::new(buffer, filename, mimetype)),
            Err(kind) => filter.record_failure(kind),
        }
    }

    gate.settle(filter.into_outcome());
}

/// Consume a part without keeping its bytes.
async fn drain(field: &mut multer::Field<'_>) -> Result<usize, multer::Error> {
    let mut discarded = 0;
    while let Some(chunk) = field.chunk().await? {
        discarded += chunk.len();
    }
    Ok(discarded)
}

fn settle_parser_error(gate: &SettlementGate, err: &multer::Error) {
    let kind = classify_parser_error(err);
    if gate.settle(UploadOutcome::Failure(kind)) {
        tracing::debug!(error = %err, error_kind = kind.as_str(), "Multipart parser error");
    }
}
