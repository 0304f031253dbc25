pub mod health;
pub mod upload;
pub mod validate;

pub use health::*;
pub use upload::*;
pub use validate::*;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::sync::mpsc::UnboundedSender;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::AppResult;
use crate::middleware::logging_middleware;
use crate::models::{UploadCandidate, UploadEvent, ValidationVerdict};
use crate::services::{PdfUploader, PdfValidator};

/// Room above the file ceiling so oversize files still reach the size gate.
const BODY_LIMIT_HEADROOM: usize = 64 * 1024;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    validator: PdfValidator,
    uploads: UnboundedSender<UploadEvent>,
}

impl AppState {
    pub fn new(config: Config, uploads: UnboundedSender<UploadEvent>) -> AppResult<Self> {
        let validator = PdfValidator::new(config.validation_config()?);
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                validator,
                uploads,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn validator(&self) -> &PdfValidator {
        &self.inner.validator
    }

    pub fn request_timeout(&self) -> Duration {
        self.inner.config.request_timeout()
    }

    /// Run `work` under the request timeout; expiry is [`AppError::Timeout`].
    ///
    /// [`AppError::Timeout`]: crate::error::AppError::Timeout
    pub async fn within_timeout<F: Future>(&self, work: F) -> AppResult<F::Output> {
        Ok(tokio::time::timeout(self.request_timeout(), work).await?)
    }

    pub async fn validate(&self, candidate: &UploadCandidate) -> AppResult<ValidationVerdict> {
        self.within_timeout(self.validator().validate(candidate)).await
    }

    /// A fresh uploader wired to the shared upload channel.
    pub fn uploader(&self) -> PdfUploader {
        PdfUploader::new(self.inner.validator.clone())
            .with_notifier(self.inner.uploads.clone())
            .with_display_delay(self.inner.config.success_display_delay())
    }
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config().max_file_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_LIMIT_HEADROOM);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/v1/config", get(config_handler))
        .route("/api/v1/validate", post(validate_handler))
        .route("/api/v1/validate/binary", post(validate_binary_handler))
        .route("/api/v1/upload", post(upload_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}
