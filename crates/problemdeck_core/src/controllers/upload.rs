//! Image upload and extraction workflow.
//!
//! `NoFile -> FileSelected -> Uploading -> ExtractionSucceeded | ExtractionFailed`.
//! Selection is gated locally on MIME type, then size. Failed uploads keep
//! the file so the user can re-trigger submission; nothing retries on its own.

use crate::constants::{
    MAX_UPLOAD_BYTES, NO_IMAGE_SELECTED_MESSAGE, OVERSIZED_IMAGE_MESSAGE,
    UNSUPPORTED_IMAGE_MESSAGE,
};
use crate::error::CatalogError;
use crate::feedback::{Notice, Notices};
use crate::gateway::CatalogGateway;
use crate::models::{EntityId, ImageCandidate, Problem};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    NoFile,
    FileSelected(ImageCandidate),
    Uploading(ImageCandidate),
    ExtractionSucceeded(Problem),
    ExtractionFailed { message: String, file: ImageCandidate },
}

pub struct UploadWorkflow {
    gateway: Arc<dyn CatalogGateway>,
    state: UploadState,
    error: Option<String>,
    notices: Notices,
}

impl UploadWorkflow {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self {
            gateway,
            state: UploadState::NoFile,
            error: None,
            notices: Notices::default(),
        }
    }

    /// Check a candidate against the type whitelist and the size limit.
    pub fn check_candidate(candidate: &ImageCandidate) -> Result<(), CatalogError> {
        if !candidate.has_accepted_type() {
            return Err(CatalogError::validation(UNSUPPORTED_IMAGE_MESSAGE));
        }
        if candidate.size() > MAX_UPLOAD_BYTES {
            return Err(CatalogError::validation(OVERSIZED_IMAGE_MESSAGE));
        }
        Ok(())
    }

    /// Select a file. A rejected file clears any earlier selection.
    ///
    /// # Errors
    /// Returns a validation error for a disallowed type or an oversized file.
    pub fn select_file(&mut self, candidate: ImageCandidate) -> Result<(), CatalogError> {
        if let Err(err) = Self::check_candidate(&candidate) {
            tracing::debug!(
                file = %candidate.file_name(),
                mime = %candidate.mime_type(),
                size = candidate.size(),
                "image selection rejected"
            );
            self.state = UploadState::NoFile;
            self.reject(err.to_string());
            return Err(err);
        }
        tracing::debug!(file = %candidate.file_name(), size = candidate.size(), "image selected");
        self.state = UploadState::FileSelected(candidate);
        self.error = None;
        Ok(())
    }

    /// Send the selected file for extraction.
    ///
    /// # Errors
    /// Refuses without a selected file (no remote call). Remote failures move
    /// the workflow to `ExtractionFailed`, keeping the file for a manual retry.
    pub async fn submit(&mut self) -> Result<Problem, CatalogError> {
        let file = match std::mem::replace(&mut self.state, UploadState::NoFile) {
            UploadState::FileSelected(file) | UploadState::ExtractionFailed { file, .. } => file,
            other => {
                self.state = other;
                let err = CatalogError::validation(NO_IMAGE_SELECTED_MESSAGE);
                self.reject(err.to_string());
                return Err(err);
            }
        };

        self.error = None;
        self.state = UploadState::Uploading(file.clone());
        tracing::debug!(file = %file.file_name(), "submitting image for extraction");
        match self.gateway.submit_image(&file).await {
            Ok(problem) => {
                tracing::info!(id = problem.id, "image extracted into problem");
                self.notices
                    .success("Image uploaded and processed successfully!");
                self.state = UploadState::ExtractionSucceeded(problem.clone());
                Ok(problem)
            }
            Err(err) => {
                tracing::warn!(file = %file.file_name(), error = %err, "image extraction failed");
                let message = match &err {
                    CatalogError::Transport(_) => "An error occurred while uploading.".to_string(),
                    other => other.user_message("An error occurred during upload."),
                };
                self.reject(message.clone());
                self.state = UploadState::ExtractionFailed { message, file };
                Err(err)
            }
        }
    }

    /// Discard the current result or selection and begin a new upload.
    pub fn start_over(&mut self) {
        self.state = UploadState::NoFile;
        self.error = None;
    }

    fn reject(&mut self, message: String) {
        self.notices.error(message.clone());
        self.error = Some(message);
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Last rejection or failure message, cleared by a successful selection.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_file(&self) -> Option<&ImageCandidate> {
        match &self.state {
            UploadState::FileSelected(file)
            | UploadState::Uploading(file)
            | UploadState::ExtractionFailed { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn extracted(&self) -> Option<&Problem> {
        match &self.state {
            UploadState::ExtractionSucceeded(problem) => Some(problem),
            _ => None,
        }
    }

    /// Identifier to open in the full problem view after a successful upload.
    pub fn extracted_id(&self) -> Option<EntityId> {
        self.extracted().map(|problem| problem.id)
    }

    /// One-line progress text for the current state.
    ///
    /// # Returns
    /// `None` before a submission has started.
    pub fn status_line(&self) -> Option<&'static str> {
        match self.state {
            UploadState::Uploading(_) => Some("Uploading and processing..."),
            UploadState::ExtractionSucceeded(_) => Some("Upload and processing successful!"),
            UploadState::ExtractionFailed { .. } => Some("Upload failed."),
            UploadState::NoFile | UploadState::FileSelected(_) => None,
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}
