use serde::Serialize;

use super::{UploadEvent, ValidationVerdict};

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub data: ValidateData,
    pub processing_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ValidateData {
    pub file_name: String,
    pub file_size: u64,
    pub file_size_display: String,
    pub verdict: ValidationVerdict,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub data: UploadEvent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub max_file_size: u64,
    pub accepted_file_types: Vec<String>,
    pub show_preview: bool,
}

impl ValidateResponse {
    pub fn new(
        file_name: String,
        file_size: u64,
        file_size_display: String,
        verdict: ValidationVerdict,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            success: true,
            data: ValidateData {
                file_name,
                file_size,
                file_size_display,
                verdict,
            },
            processing_time_ms,
        }
    }
}
