use serde::{Serialize, Serializer};
use std::fmt;

/// Closed set of short status strings a verdict can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    Valid,
    FileTooLarge,
    InvalidFileType,
    InvalidContent,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Valid => "Valid PDF file",
            StatusLabel::FileTooLarge => "File too large",
            StatusLabel::InvalidFileType => "Invalid file type",
            StatusLabel::InvalidContent => "Invalid PDF content",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of one validation call. Built fresh per call and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    is_valid: bool,
    status_label: StatusLabel,
    detail_message: String,
    user_facing_error: String,
}

impl ValidationVerdict {
    pub fn valid(detail_message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            status_label: StatusLabel::Valid,
            detail_message: detail_message.into(),
            user_facing_error: String::new(),
        }
    }

    /// A rejection. `status_label` must not be [`StatusLabel::Valid`];
    /// if it is, the rejection is reported as invalid content.
    pub fn invalid(
        status_label: StatusLabel,
        detail_message: impl Into<String>,
        user_facing_error: impl Into<String>,
    ) -> Self {
        let status_label = match status_label {
            StatusLabel::Valid => StatusLabel::InvalidContent,
            other => other,
        };
        Self {
            is_valid: false,
            status_label,
            detail_message: detail_message.into(),
            user_facing_error: user_facing_error.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn status(&self) -> StatusLabel {
        self.status_label
    }

    pub fn status_label(&self) -> &'static str {
        self.status_label.as_str()
    }

    pub fn detail_message(&self) -> &str {
        &self.detail_message
    }

    pub fn user_facing_error(&self) -> &str {
        &self.user_facing_error
    }
}
