use axum::{
    extract::{Multipart, State},
    response::Json,
};
use tracing::{info, warn};

use super::validate::candidate_from_multipart;
use super::AppState;
use crate::error::AppResult;
use crate::models::UploadResponse;

/// Select, validate and upload a multipart `file` in one request.
///
/// An invalid file answers `NO_VALID_SELECTION`; accepted uploads are also
/// forwarded to the upload listener.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let candidate = candidate_from_multipart(&mut multipart).await?;
    let mut uploader = state.uploader();

    uploader.select(candidate);
    if let Some(ticket) = uploader.begin_validation() {
        let completed = state.within_timeout(ticket.run()).await?;
        uploader.apply(completed);
    }

    if !uploader.is_file_valid() {
        warn!(
            file_name = uploader.current_file().map(|f| f.name()).unwrap_or(""),
            status = uploader.status_label(),
            detail = uploader.detail_message(),
            "Upload refused"
        );
    }

    let event = uploader.request_upload()?;
    info!(file_name = %event.file_name, file_size = event.file_size, "Upload request served");

    Ok(Json(UploadResponse {
        success: true,
        message: uploader.success_message().to_string(),
        data: event,
    }))
}
