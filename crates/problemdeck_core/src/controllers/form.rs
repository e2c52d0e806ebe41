//! Create/edit form for a single problem.
//!
//! State flow: `Idle -> Loading (edit only) -> Ready -> Submitting ->
//! Succeeded | Failed`. A failed submission keeps every field so the user can
//! retry without re-entering data.

use crate::constants::REQUIRED_FIELDS_MESSAGE;
use crate::error::CatalogError;
use crate::feedback::{Notice, Notices};
use crate::gateway::CatalogGateway;
use crate::models::{Difficulty, EntityId, Problem, ProblemPayload, ProblemStatus, VocabularyKind};
use crate::resolver::{AssociationResolver, Selection};
use crate::text::{join_keywords, split_keywords};
use crate::vocabulary::VocabularyStore;
use std::sync::Arc;

const NOT_READY_MESSAGE: &str = "The form has not finished loading.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Loading,
    Ready,
    Submitting,
    Succeeded(Problem),
    Failed(String),
}

/// Editable form fields. `keywords` is the comma-separated display string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemFields {
    pub title: String,
    pub difficulty: Option<Difficulty>,
    pub estimated_time: String,
    pub keywords: String,
    pub author: String,
    pub solution_text: String,
    pub status: ProblemStatus,
    pub latex_content: String,
    pub selection: Selection,
}

impl ProblemFields {
    /// Seed fields from a fetched problem.
    pub fn from_problem(problem: &Problem, vocabulary: &VocabularyStore) -> Self {
        Self {
            title: problem.title.clone(),
            difficulty: Some(problem.difficulty),
            estimated_time: problem.estimated_time.clone().unwrap_or_default(),
            keywords: join_keywords(&problem.keywords),
            author: problem.author.clone().unwrap_or_default(),
            solution_text: problem.solution_text.clone().unwrap_or_default(),
            status: problem.status,
            latex_content: problem.latex_content.clone().unwrap_or_default(),
            selection: Selection {
                tags: vocabulary.resolve_problem_associations_to_ids(VocabularyKind::Tag, &problem.tags),
                sources: vocabulary
                    .resolve_problem_associations_to_ids(VocabularyKind::Source, &problem.sources),
            },
        }
    }

    /// Required-field gate: a non-blank title and a chosen difficulty.
    pub fn validate(&self) -> Result<Difficulty, CatalogError> {
        match self.difficulty {
            Some(difficulty) if !self.title.trim().is_empty() => Ok(difficulty),
            _ => Err(CatalogError::validation(REQUIRED_FIELDS_MESSAGE)),
        }
    }
}

pub struct ProblemForm {
    gateway: Arc<dyn CatalogGateway>,
    mode: FormMode,
    state: FormState,
    fields: ProblemFields,
    vocabulary: VocabularyStore,
    notices: Notices,
}

impl ProblemForm {
    pub fn create(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self::with_mode(gateway, FormMode::Create)
    }

    pub fn edit(gateway: Arc<dyn CatalogGateway>, id: EntityId) -> Self {
        Self::with_mode(gateway, FormMode::Edit(id))
    }

    fn with_mode(gateway: Arc<dyn CatalogGateway>, mode: FormMode) -> Self {
        Self {
            gateway,
            mode,
            state: FormState::Idle,
            fields: ProblemFields::default(),
            vocabulary: VocabularyStore::new(),
            notices: Notices::default(),
        }
    }

    /// Load the vocabulary and, in edit mode, the target problem.
    ///
    /// The vocabulary is fetched only while the store is stale, so mounting
    /// again after a failed problem fetch does not refetch tags and sources.
    /// A vocabulary failure is reported but does not block the form.
    ///
    /// # Errors
    /// Returns the fetch failure for the edited problem; the form goes back
    /// to `Idle` and can be mounted again.
    pub async fn mount(&mut self) -> Result<(), CatalogError> {
        if self.vocabulary.is_stale() {
            let _ = self.refresh_vocabulary().await;
        }
        let FormMode::Edit(id) = self.mode else {
            self.state = FormState::Ready;
            return Ok(());
        };

        self.state = FormState::Loading;
        match self.gateway.get_problem(id).await {
            Ok(problem) => {
                self.fields = ProblemFields::from_problem(&problem, &self.vocabulary);
                self.state = FormState::Ready;
                tracing::debug!(id, "edit form seeded");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "failed to fetch problem details");
                self.notices
                    .error(err.user_message("Failed to fetch problem details."));
                self.state = FormState::Idle;
                Err(err)
            }
        }
    }

    /// Refetch the tag and source lists used by the selection widgets.
    ///
    /// # Errors
    /// Returns the gateway failure; the previous snapshot stays in use.
    pub async fn refresh_vocabulary(&mut self) -> Result<(), CatalogError> {
        if let Err(err) = self.vocabulary.refresh(self.gateway.as_ref()).await {
            tracing::warn!(error = %err, "failed to fetch vocabulary");
            self.notices
                .error(err.user_message("Failed to fetch tags and sources."));
            return Err(err);
        }
        Ok(())
    }

    /// Assemble the wire payload from the current fields.
    ///
    /// # Errors
    /// Returns a validation error when title or difficulty is missing.
    pub fn build_payload(&self) -> Result<ProblemPayload, CatalogError> {
        let difficulty = self.fields.validate()?;
        let names = AssociationResolver::new(self.vocabulary.snapshot()).names_for(&self.fields.selection);
        Ok(ProblemPayload {
            title: self.fields.title.trim().to_string(),
            difficulty,
            estimated_time: self.fields.estimated_time.clone(),
            keywords: split_keywords(&self.fields.keywords),
            author: self.fields.author.clone(),
            solution_text: self.fields.solution_text.clone(),
            status: self.fields.status,
            latex_content: self.fields.latex_content.clone(),
            tags: names.tags,
            sources: names.sources,
        })
    }

    /// Validate and send the form through create or update.
    ///
    /// # Errors
    /// Validation errors issue no remote call. Remote failures leave the
    /// fields intact and move the form to `Failed`.
    pub async fn submit(&mut self) -> Result<Problem, CatalogError> {
        if !matches!(self.state, FormState::Ready | FormState::Failed(_)) {
            let err = CatalogError::validation(NOT_READY_MESSAGE);
            self.notices.error(err.to_string());
            return Err(err);
        }
        let payload = match self.build_payload() {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(error = %err, "problem form rejected locally");
                self.notices.error(err.to_string());
                return Err(err);
            }
        };

        self.state = FormState::Submitting;
        let result = match self.mode {
            FormMode::Create => self.gateway.create_problem(&payload).await,
            FormMode::Edit(id) => self.gateway.update_problem(id, &payload).await,
        };
        match result {
            Ok(problem) => {
                let verb = match self.mode {
                    FormMode::Create => "created",
                    FormMode::Edit(_) => "updated",
                };
                tracing::info!(id = problem.id, "problem {}", verb);
                self.notices.success(format!("Problem {} successfully.", verb));
                self.state = FormState::Succeeded(problem.clone());
                Ok(problem)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save problem");
                let message = err.user_message("Failed to save the problem.");
                self.notices.error(message.clone());
                self.state = FormState::Failed(message);
                Err(err)
            }
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn fields(&self) -> &ProblemFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut ProblemFields {
        &mut self.fields
    }

    pub fn vocabulary(&self) -> &VocabularyStore {
        &self.vocabulary
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}
