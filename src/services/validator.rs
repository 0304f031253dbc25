use tracing::{debug, info};

use crate::config::ValidationConfig;
use crate::models::{UploadCandidate, ValidationVerdict};
use crate::services::format::format_file_size;
use crate::services::gates::{extension_gate, size_gate};
use crate::services::sniffer::ContentSniffer;

/// Runs size, extension and content checks in order, stopping at the first
/// rejection.
#[derive(Debug, Clone, Default)]
pub struct PdfValidator {
    config: ValidationConfig,
    sniffer: ContentSniffer,
}

impl PdfValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            sniffer: ContentSniffer::pdf(),
        }
    }

    pub fn with_sniffer(mut self, sniffer: ContentSniffer) -> Self {
        self.sniffer = sniffer;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub async fn validate(&self, candidate: &UploadCandidate) -> ValidationVerdict {
        debug!(
            candidate_id = %candidate.id(),
            file_name = candidate.name(),
            byte_size = candidate.byte_size(),
            "Validating candidate"
        );

        let verdict = match self.check(candidate).await {
            Ok(()) => ValidationVerdict::valid(format!(
                "{} ({}) is a valid PDF document.",
                candidate.name(),
                format_file_size(candidate.byte_size())
            )),
            Err(rejection) => rejection,
        };

        info!(
            candidate_id = %candidate.id(),
            file_name = candidate.name(),
            is_valid = verdict.is_valid(),
            status = verdict.status_label(),
            "Validation finished"
        );
        verdict
    }

    async fn check(&self, candidate: &UploadCandidate) -> Result<(), ValidationVerdict> {
        size_gate(candidate.byte_size(), &self.config)?;
        extension_gate(candidate.name(), &self.config)?;
        self.sniffer.sniff(candidate).await
    }
}

/// Validate `candidate` against `config` with the PDF signatures.
pub async fn validate(candidate: &UploadCandidate, config: &ValidationConfig) -> ValidationVerdict {
    PdfValidator::new(config.clone()).validate(candidate).await
}
