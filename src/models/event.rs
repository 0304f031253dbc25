use chrono::{DateTime, Utc};
use serde::Serialize;

use super::UploadCandidate;

/// Notification emitted when an upload of a validated file is requested.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEvent {
    #[serde(skip)]
    pub file: UploadCandidate,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub accepted_at: DateTime<Utc>,
}

impl UploadEvent {
    pub fn new(file: UploadCandidate) -> Self {
        Self {
            file_name: file.name().to_string(),
            file_size: file.byte_size(),
            file_type: file.mime_type().to_string(),
            accepted_at: Utc::now(),
            file,
        }
    }
}
