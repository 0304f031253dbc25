use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::info;

use super::AppState;
use crate::error::AppResult;
use crate::models::PublicConfig;
use crate::services::{format_file_size, PDF_SIGNATURES};

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    info!("Health check requested");

    let timestamp = chrono::Utc::now().to_rfc3339();
    let rules = state.validator().config();

    let response = json!({
        "status": "healthy",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "validation": {
            "max_file_size_bytes": rules.max_byte_size(),
            "max_file_size": format_file_size(rules.max_byte_size()),
            "accepted_file_types": rules.allowed_extensions(),
            "signatures": PDF_SIGNATURES.len(),
        }
    });

    Ok(Json(response))
}

/// Readiness check endpoint
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    info!(
        max_file_size = state.validator().config().max_byte_size(),
        "Readiness check passed"
    );
    StatusCode::OK
}

/// Configuration the presentation layer needs to render the picker
pub async fn config_handler(State(state): State<AppState>) -> Json<PublicConfig> {
    let config = state.config();
    Json(PublicConfig {
        max_file_size: config.max_file_size_bytes,
        accepted_file_types: config.accepted_file_types.clone(),
        show_preview: config.show_preview,
    })
}
