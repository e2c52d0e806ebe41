//! Remote catalog gateway contract.
//!
//! One method per remote resource/action. Each call is a single round trip
//! with no retries and no caching; failures surface as [`CatalogError`].

use crate::error::CatalogError;
use crate::models::{DeleteAck, EntityId, ImageCandidate, Problem, ProblemPayload, VocabEntry, VocabularyKind};
use async_trait::async_trait;

#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Fetch every problem in the catalog.
    ///
    /// # Returns
    /// Problems in server order, associations embedded as `{id, name}`.
    ///
    /// # Errors
    /// [`CatalogError::Remote`] for a non-success status, otherwise
    /// [`CatalogError::Transport`] or [`CatalogError::Decode`].
    async fn list_problems(&self) -> Result<Vec<Problem>, CatalogError>;
    /// Fetch one problem by id.
    ///
    /// # Errors
    /// A missing id surfaces as [`CatalogError::Remote`] with status 404.
    async fn get_problem(&self, id: EntityId) -> Result<Problem, CatalogError>;
    /// Create a problem; associations travel as names.
    ///
    /// # Arguments
    /// - `payload`: validated fields with tag and source names.
    ///
    /// # Returns
    /// The stored problem including its assigned id.
    async fn create_problem(&self, payload: &ProblemPayload) -> Result<Problem, CatalogError>;
    /// Replace every field of problem `id` with `payload`.
    async fn update_problem(&self, id: EntityId, payload: &ProblemPayload) -> Result<Problem, CatalogError>;
    /// Delete problem `id`.
    async fn delete_problem(&self, id: EntityId) -> Result<DeleteAck, CatalogError>;

    /// Fetch the full tag list.
    async fn list_tags(&self) -> Result<Vec<VocabEntry>, CatalogError>;
    /// Create a tag named `name`; duplicates are rejected by the server.
    async fn create_tag(&self, name: &str) -> Result<VocabEntry, CatalogError>;
    /// Rename tag `id` to `name`.
    async fn update_tag(&self, id: EntityId, name: &str) -> Result<VocabEntry, CatalogError>;
    /// Delete tag `id`.
    async fn delete_tag(&self, id: EntityId) -> Result<DeleteAck, CatalogError>;

    /// Fetch the full source list.
    async fn list_sources(&self) -> Result<Vec<VocabEntry>, CatalogError>;
    /// Create a source named `name`; duplicates are rejected by the server.
    async fn create_source(&self, name: &str) -> Result<VocabEntry, CatalogError>;
    /// Rename source `id` to `name`.
    async fn update_source(&self, id: EntityId, name: &str) -> Result<VocabEntry, CatalogError>;
    /// Delete source `id`.
    async fn delete_source(&self, id: EntityId) -> Result<DeleteAck, CatalogError>;

    /// Submit an image for extraction; the result is the stored problem.
    async fn submit_image(&self, image: &ImageCandidate) -> Result<Problem, CatalogError>;

    /// List tags or sources depending on `kind`.
    async fn list_vocabulary(&self, kind: VocabularyKind) -> Result<Vec<VocabEntry>, CatalogError> {
        match kind {
            VocabularyKind::Tag => self.list_tags().await,
            VocabularyKind::Source => self.list_sources().await,
        }
    }

    /// Create a tag or source depending on `kind`.
    async fn create_vocabulary_entry(
        &self,
        kind: VocabularyKind,
        name: &str,
    ) -> Result<VocabEntry, CatalogError> {
        match kind {
            VocabularyKind::Tag => self.create_tag(name).await,
            VocabularyKind::Source => self.create_source(name).await,
        }
    }

    /// Rename a tag or source depending on `kind`.
    async fn rename_vocabulary_entry(
        &self,
        kind: VocabularyKind,
        id: EntityId,
        name: &str,
    ) -> Result<VocabEntry, CatalogError> {
        match kind {
            VocabularyKind::Tag => self.update_tag(id, name).await,
            VocabularyKind::Source => self.update_source(id, name).await,
        }
    }

    /// Delete a tag or source depending on `kind`.
    async fn delete_vocabulary_entry(
        &self,
        kind: VocabularyKind,
        id: EntityId,
    ) -> Result<DeleteAck, CatalogError> {
        match kind {
            VocabularyKind::Tag => self.delete_tag(id).await,
            VocabularyKind::Source => self.delete_source(id).await,
        }
    }
}
