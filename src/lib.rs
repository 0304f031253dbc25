//! pdfgate
//!
//! Validates user-supplied files as genuine PDF documents: a size gate, an
//! extension gate and a content sniffer over the leading bytes, plus the
//! selection/upload component that drives them and an HTTP host.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::{Config, ValidationConfig};
pub use error::{AppError, AppResult};
pub use models::{UploadCandidate, UploadEvent, ValidationVerdict};
pub use services::{PdfUploader, PdfValidator};
