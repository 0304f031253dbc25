//! Pure checks run before any content is read.

use tracing::debug;

use crate::config::ValidationConfig;
use crate::models::{StatusLabel, ValidationVerdict};
use crate::services::format::{format_file_size, get_file_extension};

/// Reject sizes strictly above the configured ceiling.
pub fn size_gate(byte_size: u64, config: &ValidationConfig) -> Result<(), ValidationVerdict> {
    let limit = config.max_byte_size();
    if byte_size <= limit {
        return Ok(());
    }

    debug!(byte_size, limit, "Size gate rejected candidate");
    let limit_display = format_file_size(limit);
    Err(ValidationVerdict::invalid(
        StatusLabel::FileTooLarge,
        format!(
            "File size ({}) exceeds the maximum allowed size ({})",
            format_file_size(byte_size),
            limit_display
        ),
        format!("File is too large. Maximum size is {}.", limit_display),
    ))
}

/// Reject file names whose extension is not in the allow-set.
pub fn extension_gate(file_name: &str, config: &ValidationConfig) -> Result<(), ValidationVerdict> {
    let extension = get_file_extension(file_name).to_lowercase();
    if config.allows_extension(&extension) {
        return Ok(());
    }

    debug!(file_name, extension = %extension, "Extension gate rejected candidate");
    let accepted = config
        .allowed_extensions()
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(ValidationVerdict::invalid(
        StatusLabel::InvalidFileType,
        format!(
            "File extension \"{}\" is not accepted. Accepted: {}",
            extension, accepted
        ),
        "Please select a PDF file.",
    ))
}
