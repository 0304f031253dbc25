use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::HeaderMap,
    response::Json,
};
use std::time::Instant;
use tracing::{debug, error, info};

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{UploadCandidate, ValidateResponse};
use crate::services::format_file_size;

const FILE_FIELD: &str = "file";
const FILE_NAME_HEADER: &str = "x-file-name";
const DEFAULT_BINARY_NAME: &str = "upload.pdf";

/// Validate a file sent as the `file` field of a multipart form.
///
/// Every verdict, valid or not, is a 200 response.
pub async fn validate_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ValidateResponse>> {
    let request_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
    info!(request_id = %request_id, "Starting validation request");

    let candidate = match candidate_from_multipart(&mut multipart).await {
        Ok(candidate) => candidate,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Failed to extract file from multipart");
            return Err(e);
        }
    };

    run_validation(&state, &request_id, candidate).await
}

/// Validate a raw request body. The name comes from `x-file-name`.
pub async fn validate_binary_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ValidateResponse>> {
    let request_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
    info!(request_id = %request_id, "Starting binary validation request");

    let file_name = headers
        .get(FILE_NAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_BINARY_NAME)
        .to_string();

    let mime_type = headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    let candidate = UploadCandidate::from_bytes(file_name, mime_type, body);
    run_validation(&state, &request_id, candidate).await
}

async fn run_validation(
    state: &AppState,
    request_id: &str,
    candidate: UploadCandidate,
) -> AppResult<Json<ValidateResponse>> {
    let start = Instant::now();

    let verdict = state.validate(&candidate).await?;

    let total_time = start.elapsed().as_millis() as u64;

    info!(
        request_id = %request_id,
        file_name = candidate.name(),
        is_valid = verdict.is_valid(),
        status = verdict.status_label(),
        total_time_ms = total_time,
        "Validation request completed"
    );

    Ok(Json(ValidateResponse::new(
        candidate.name().to_string(),
        candidate.byte_size(),
        format_file_size(candidate.byte_size()),
        verdict,
        total_time,
    )))
}

/// Build a candidate from the first `file` field; other fields are skipped.
pub(crate) async fn candidate_from_multipart(multipart: &mut Multipart) -> AppResult<UploadCandidate> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let mime_type = field.content_type().unwrap_or("").to_string();
        let data = field.bytes().await?;

        debug!(
            file_name = %file_name,
            file_size = data.len(),
            mime_type = %mime_type,
            "Extracted file from multipart form"
        );

        return Ok(UploadCandidate::from_bytes(file_name, mime_type, data));
    }

    Err(AppError::MissingFile)
}
