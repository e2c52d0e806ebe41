//! Tag/source management over one vocabulary collection.
//!
//! Every successful mutation is followed by a full reload of the collection.
//! This keeps the client trivially consistent with the server but costs one
//! list call per edit; large vocabularies would want incremental patching.

use super::DeleteOutcome;
use crate::error::CatalogError;
use crate::feedback::{Confirm, Notice, Notices};
use crate::gateway::CatalogGateway;
use crate::models::{EntityId, VocabEntry, VocabularyKind};
use crate::text::normalize_optional_nonempty;
use std::sync::Arc;

/// The single row currently being renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineEdit {
    pub id: EntityId,
    pub name: String,
}

/// Load/create/rename/delete controller for tags or sources.
pub struct ManagedCollection {
    gateway: Arc<dyn CatalogGateway>,
    kind: VocabularyKind,
    entries: Vec<VocabEntry>,
    editing: Option<InlineEdit>,
    notices: Notices,
}

impl ManagedCollection {
    pub fn new(gateway: Arc<dyn CatalogGateway>, kind: VocabularyKind) -> Self {
        Self {
            gateway,
            kind,
            entries: Vec::new(),
            editing: None,
            notices: Notices::default(),
        }
    }

    pub fn tags(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self::new(gateway, VocabularyKind::Tag)
    }

    pub fn sources(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self::new(gateway, VocabularyKind::Source)
    }

    /// Prompt shown before deleting an entry.
    pub fn delete_prompt(&self) -> String {
        format!("Are you sure you want to delete this {}?", self.kind.noun())
    }

    /// Literal empty-state text for the collection.
    pub fn empty_text(&self) -> String {
        format!("No {} available.", self.kind.plural())
    }

    /// Replace the entries with the server's current collection.
    ///
    /// # Errors
    /// Returns the gateway failure; entries stay as they were.
    pub async fn load(&mut self) -> Result<(), CatalogError> {
        match self.gateway.list_vocabulary(self.kind).await {
            Ok(entries) => {
                tracing::debug!(kind = %self.kind, count = entries.len(), "collection loaded");
                self.entries = entries;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(kind = %self.kind, error = %err, "failed to fetch collection");
                self.notices
                    .error(err.user_message(&format!("Failed to fetch {}.", self.kind.plural())));
                Err(err)
            }
        }
    }

    /// Create an entry named `name` (trimmed).
    ///
    /// # Errors
    /// Blank names are rejected locally; remote failures are returned as-is.
    pub async fn create(&mut self, name: &str) -> Result<VocabEntry, CatalogError> {
        let name = self.require_name(Some(name))?;
        match self.gateway.create_vocabulary_entry(self.kind, &name).await {
            Ok(entry) => {
                self.mutated(entry.id, "added").await;
                Ok(entry)
            }
            Err(err) => Err(self.remote_failure(err, "add")),
        }
    }

    /// Enter inline-edit mode for `id`, replacing any edit in progress.
    pub fn begin_edit(&mut self, id: EntityId, current_name: &str) {
        self.editing = Some(InlineEdit {
            id,
            name: current_name.to_string(),
        });
    }

    /// Update the in-progress name; ignored when no edit is active.
    pub fn set_edit_name(&mut self, name: &str) {
        if let Some(edit) = self.editing.as_mut() {
            edit.name = name.to_string();
        }
    }

    /// Discard the in-progress edit without contacting the server.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the in-progress rename.
    ///
    /// # Errors
    /// Blank names and a missing edit are rejected locally. On remote
    /// failure the edit stays open so it can be corrected and retried.
    pub async fn commit_edit(&mut self) -> Result<VocabEntry, CatalogError> {
        let Some(edit) = self.editing.clone() else {
            let err = CatalogError::validation(format!("No {} is being edited.", self.kind.noun()));
            self.notices.error(err.to_string());
            return Err(err);
        };
        let name = self.require_name(Some(edit.name.as_str()))?;
        match self
            .gateway
            .rename_vocabulary_entry(self.kind, edit.id, &name)
            .await
        {
            Ok(entry) => {
                self.editing = None;
                self.mutated(entry.id, "updated").await;
                Ok(entry)
            }
            Err(err) => Err(self.remote_failure(err, "update")),
        }
    }

    /// Delete `id` after explicit confirmation.
    ///
    /// # Errors
    /// Returns the remote failure; nothing is reloaded in that case.
    pub async fn delete(
        &mut self,
        id: EntityId,
        confirm: &mut dyn Confirm,
    ) -> Result<DeleteOutcome, CatalogError> {
        if !confirm.confirm(&self.delete_prompt()) {
            return Ok(DeleteOutcome::Declined);
        }
        match self.gateway.delete_vocabulary_entry(self.kind, id).await {
            Ok(_) => {
                if self.editing.as_ref().is_some_and(|edit| edit.id == id) {
                    self.editing = None;
                }
                self.mutated(id, "deleted").await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => Err(self.remote_failure(err, "delete")),
        }
    }

    fn require_name(&mut self, name: Option<&str>) -> Result<String, CatalogError> {
        normalize_optional_nonempty(name.map(str::to_string)).ok_or_else(|| {
            let err = CatalogError::validation(format!("{} name cannot be empty.", self.kind.label()));
            self.notices.error(err.to_string());
            err
        })
    }

    async fn mutated(&mut self, id: EntityId, verb: &str) {
        tracing::info!(kind = %self.kind, id, "{} {}", self.kind.noun(), verb);
        self.notices
            .success(format!("{} {} successfully.", self.kind.label(), verb));
        // Reload failures are already reported through notices.
        let _ = self.load().await;
    }

    fn remote_failure(&mut self, err: CatalogError, action: &str) -> CatalogError {
        tracing::warn!(kind = %self.kind, action, error = %err, "collection mutation failed");
        self.notices.error(err.user_message(&format!(
            "Failed to {} {}.",
            action,
            self.kind.noun()
        )));
        err
    }

    pub fn kind(&self) -> VocabularyKind {
        self.kind
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn editing(&self) -> Option<&InlineEdit> {
        self.editing.as_ref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}
