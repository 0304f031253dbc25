//! Selection and upload state of a single uploader instance.
//!
//! The uploader owns one candidate slot. Every selection gets a fresh
//! identity, and verdicts computed for an identity that is no longer
//! current are dropped, so a slow read cannot overwrite a newer selection.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::DEFAULT_SUCCESS_DISPLAY_MS;
use crate::error::{AppError, AppResult, NO_VALID_SELECTION_MESSAGE};
use crate::models::{UploadCandidate, UploadEvent, ValidationVerdict};
use crate::services::validator::PdfValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploaderState {
    Empty,
    Selected,
    Validating,
    Valid,
    Invalid,
    Completed,
}

/// A validation detached from the uploader so the caller can await it
/// without holding the uploader borrowed.
#[derive(Debug)]
pub struct ValidationTicket {
    candidate: UploadCandidate,
    validator: PdfValidator,
}

impl ValidationTicket {
    pub fn candidate_id(&self) -> Uuid {
        self.candidate.id()
    }

    pub async fn run(self) -> CompletedValidation {
        let verdict = self.validator.validate(&self.candidate).await;
        CompletedValidation {
            candidate_id: self.candidate.id(),
            verdict,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletedValidation {
    pub candidate_id: Uuid,
    pub verdict: ValidationVerdict,
}

pub struct PdfUploader {
    validator: PdfValidator,
    display_delay: Duration,
    notifier: Option<UnboundedSender<UploadEvent>>,
    state: UploaderState,
    current: Option<UploadCandidate>,
    verdict: Option<ValidationVerdict>,
    error_message: String,
    success_message: String,
    is_drag_over: bool,
}

impl PdfUploader {
    pub fn new(validator: PdfValidator) -> Self {
        Self {
            validator,
            display_delay: Duration::from_millis(DEFAULT_SUCCESS_DISPLAY_MS),
            notifier: None,
            state: UploaderState::Empty,
            current: None,
            verdict: None,
            error_message: String::new(),
            success_message: String::new(),
            is_drag_over: false,
        }
    }

    pub fn with_notifier(mut self, notifier: UnboundedSender<UploadEvent>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_display_delay(mut self, delay: Duration) -> Self {
        self.display_delay = delay;
        self
    }

    /// Capture a candidate, replacing any previous one and clearing status.
    pub fn select(&mut self, candidate: UploadCandidate) {
        debug!(
            candidate_id = %candidate.id(),
            file_name = candidate.name(),
            byte_size = candidate.byte_size(),
            "File selected"
        );
        self.clear_messages();
        self.verdict = None;
        self.current = Some(candidate);
        self.state = UploaderState::Selected;
    }

    /// Move the current candidate into `Validating` and hand out the work.
    ///
    /// Returns `None` when nothing is selected.
    pub fn begin_validation(&mut self) -> Option<ValidationTicket> {
        let candidate = self.current.clone()?;
        self.verdict = None;
        self.error_message.clear();
        self.state = UploaderState::Validating;
        Some(ValidationTicket {
            candidate,
            validator: self.validator.clone(),
        })
    }

    /// Store a finished verdict. Returns `false` and leaves the state alone
    /// when the verdict belongs to a candidate that is no longer current.
    pub fn apply(&mut self, completed: CompletedValidation) -> bool {
        let is_current = self
            .current
            .as_ref()
            .map(|candidate| candidate.id() == completed.candidate_id)
            .unwrap_or(false);

        if !is_current || self.state != UploaderState::Validating {
            debug!(
                candidate_id = %completed.candidate_id,
                "Discarding verdict for superseded candidate"
            );
            return false;
        }

        let verdict = completed.verdict;
        if verdict.is_valid() {
            self.state = UploaderState::Valid;
        } else {
            self.error_message = verdict.user_facing_error().to_string();
            self.state = UploaderState::Invalid;
        }
        self.verdict = Some(verdict);
        true
    }

    /// Select and validate in one step.
    pub async fn select_file(&mut self, candidate: UploadCandidate) -> Option<&ValidationVerdict> {
        self.select(candidate);
        if let Some(ticket) = self.begin_validation() {
            let completed = ticket.run().await;
            self.apply(completed);
        }
        self.verdict.as_ref()
    }

    pub fn drag_enter(&mut self) {
        self.is_drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.is_drag_over = false;
    }

    /// Take the first dropped file; extras are ignored.
    pub async fn drop_files(&mut self, files: Vec<UploadCandidate>) -> Option<&ValidationVerdict> {
        self.is_drag_over = false;
        let dropped = files.len();
        let candidate = files.into_iter().next()?;
        if dropped > 1 {
            debug!(dropped, "Ignoring extra dropped files");
        }
        self.select_file(candidate).await
    }

    /// Emit an [`UploadEvent`] for the validated candidate.
    ///
    /// Without a valid selection this sets the error message and returns
    /// [`AppError::NoValidSelection`]; nothing is emitted.
    pub fn request_upload(&mut self) -> AppResult<UploadEvent> {
        let candidate = match self.current.clone() {
            Some(candidate) if self.state == UploaderState::Valid => candidate,
            _ => {
                warn!(state = ?self.state, "Upload requested without a valid file");
                self.error_message = NO_VALID_SELECTION_MESSAGE.to_string();
                return Err(AppError::NoValidSelection);
            }
        };

        let event = UploadEvent::new(candidate);

        if let Some(notifier) = &self.notifier {
            if notifier.send(event.clone()).is_err() {
                warn!(file_name = %event.file_name, "Upload listener is gone");
            }
        }

        info!(
            candidate_id = %event.file.id(),
            file_name = %event.file_name,
            file_size = event.file_size,
            "Upload accepted"
        );

        self.error_message.clear();
        self.success_message = format!("File \"{}\" uploaded successfully!", event.file_name);
        self.state = UploaderState::Completed;
        Ok(event)
    }

    /// Wait out the success display delay, then clear the uploader.
    pub async fn finish_upload(&mut self) {
        if self.state != UploaderState::Completed {
            return;
        }
        tokio::time::sleep(self.display_delay).await;
        self.reset();
    }

    /// Return to `Empty` from any state. The host clears its own file
    /// picker control.
    pub fn reset(&mut self) {
        self.current = None;
        self.verdict = None;
        self.clear_messages();
        self.is_drag_over = false;
        self.state = UploaderState::Empty;
    }

    pub fn remove_file(&mut self) {
        self.reset();
    }

    fn clear_messages(&mut self) {
        self.error_message.clear();
        self.success_message.clear();
    }

    pub fn state(&self) -> UploaderState {
        self.state
    }

    pub fn current_file(&self) -> Option<&UploadCandidate> {
        self.current.as_ref()
    }

    pub fn verdict(&self) -> Option<&ValidationVerdict> {
        self.verdict.as_ref()
    }

    pub fn is_file_valid(&self) -> bool {
        self.verdict
            .as_ref()
            .map(ValidationVerdict::is_valid)
            .unwrap_or(false)
    }

    pub fn status_label(&self) -> &str {
        self.verdict
            .as_ref()
            .map(ValidationVerdict::status_label)
            .unwrap_or("")
    }

    pub fn detail_message(&self) -> &str {
        self.verdict
            .as_ref()
            .map(ValidationVerdict::detail_message)
            .unwrap_or("")
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn success_message(&self) -> &str {
        &self.success_message
    }

    pub fn is_drag_over(&self) -> bool {
        self.is_drag_over
    }
}

impl Default for PdfUploader {
    fn default() -> Self {
        Self::new(PdfValidator::default())
    }
}
