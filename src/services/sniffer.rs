use tracing::{debug, warn};

use crate::models::{StatusLabel, UploadCandidate, ValidationVerdict};

/// Number of leading bytes read from a candidate.
pub const SNIFF_LENGTH: usize = 1024;

/// Leading byte sequences a PDF document starts with.
pub const PDF_SIGNATURES: &[&[u8]] = &[b"%PDF", b"%PDF-"];

const INVALID_CONTENT_ERROR: &str = "The selected file is not a valid PDF document.";

/// Matches a bounded prefix of the candidate against known signatures.
#[derive(Debug, Clone)]
pub struct ContentSniffer {
    signatures: Vec<Vec<u8>>,
    sniff_length: usize,
}

impl ContentSniffer {
    pub fn new<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            signatures: signatures.into_iter().map(|s| s.as_ref().to_vec()).collect(),
            sniff_length: SNIFF_LENGTH,
        }
    }

    pub fn pdf() -> Self {
        Self::new(PDF_SIGNATURES.iter().copied())
    }

    /// True when `buffer` starts with any signature.
    pub fn matches(&self, buffer: &[u8]) -> bool {
        self.signatures
            .iter()
            .any(|signature| buffer.starts_with(signature))
    }

    /// Read the candidate's prefix and judge it. Read failures become an
    /// invalid verdict.
    pub async fn sniff(&self, candidate: &UploadCandidate) -> Result<(), ValidationVerdict> {
        let buffer = match candidate.read_prefix(self.sniff_length).await {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!(
                    candidate_id = %candidate.id(),
                    file_name = candidate.name(),
                    error = %e,
                    "Failed to read candidate content"
                );
                return Err(ValidationVerdict::invalid(
                    StatusLabel::InvalidContent,
                    format!("Could not read file content: {}", e),
                    INVALID_CONTENT_ERROR,
                ));
            }
        };

        debug!(
            candidate_id = %candidate.id(),
            bytes_read = buffer.len(),
            "Read candidate prefix"
        );

        if self.matches(&buffer) {
            Ok(())
        } else {
            Err(ValidationVerdict::invalid(
                StatusLabel::InvalidContent,
                "File content does not start with a PDF signature. It may have been renamed from another format.",
                INVALID_CONTENT_ERROR,
            ))
        }
    }
}

impl Default for ContentSniffer {
    fn default() -> Self {
        Self::pdf()
    }
}
