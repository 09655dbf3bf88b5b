use std::sync::Arc;

use axum::{
    body::HttpBody,
    extract::{Request, State},
    http::{header, StatusCode},
    Json,
};
use docscan_core::{AppError, UploadOutcome};
use docscan_infra::get_request_id;
use docscan_processing::{decode_upload, RequestBody};
use serde::Serialize;
use utoipa::ToSchema;

use crate::constants::MISSING_FILE_MESSAGE;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    /// Filename as declared by the client
    pub filename: String,
    pub mimetype: String,
    /// Size of the decoded file in bytes
    pub size: usize,
    /// Recognised text
    pub text: String,
}

/// Upload a document image and return its recognised text
///
/// The body is decoded as it arrives. The first part named `file` (or `image`)
/// is the upload; other parts are ignored.
#[utoipa::path(
    post,
    path = "/api/v0/scans",
    tag = "scans",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document recognised", body = ScanResponse),
        (status = 400, description = "Missing file, unsupported type or malformed body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Recognition service failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, request),
    fields(request_id = tracing::field::Empty, operation = "scan_upload")
)]
pub async fn upload_scan(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<ScanResponse>), HttpAppError> {
    if let Some(request_id) = get_request_id(&request) {
        tracing::Span::current().record("request_id", request_id.as_str());
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let body = request.into_body();
    let body = if body.is_end_stream() {
        RequestBody::Absent
    } else {
        RequestBody::streaming(body.into_data_stream())
    };

    let file = match decode_upload(content_type.as_deref(), body, &state.upload_limits).await {
        UploadOutcome::Success(file) => file,
        UploadOutcome::NoFile => {
            return Err(AppError::MissingFile(MISSING_FILE_MESSAGE.to_string()).into());
        }
        UploadOutcome::Failure(kind) => {
            return Err(AppError::from_upload_failure(kind, &state.config.upload).into());
        }
    };

    let recognizer = state
        .recognizer
        .as_ref()
        .ok_or_else(|| AppError::Internal("recognition unavailable".to_string()))?;

    let document = recognizer.recognize(&file).await?;

    tracing::info!(
        filename = %file.filename(),
        content_type = %file.mimetype(),
        size = file.size(),
        "Document scanned"
    );

    Ok((
        StatusCode::CREATED,
        Json(ScanResponse {
            filename: file.filename().to_string(),
            mimetype: file.mimetype().to_string(),
            size: file.size(),
            text: document.text,
        }),
    ))
}
