//! Cached tag/source vocabulary for one view session.
//!
//! The snapshot is replaced wholesale on refresh and never patched in place.
//! Consumers may rely on identifiers but not on entry positions.

use crate::error::CatalogError;
use crate::gateway::CatalogGateway;
use crate::models::{EntityId, VocabEntry, VocabularyKind};
use crate::resolver;
use std::collections::BTreeSet;

/// Full tag and source lists as of the last successful refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularySnapshot {
    pub tags: Vec<VocabEntry>,
    pub sources: Vec<VocabEntry>,
}

impl VocabularySnapshot {
    /// Build a snapshot from already-fetched lists.
    pub fn new(tags: Vec<VocabEntry>, sources: Vec<VocabEntry>) -> Self {
        Self { tags, sources }
    }

    /// Entries of one kind, in the order the server listed them.
    pub fn entries(&self, kind: VocabularyKind) -> &[VocabEntry] {
        match kind {
            VocabularyKind::Tag => &self.tags,
            VocabularyKind::Source => &self.sources,
        }
    }

    /// Current name of entry `id`.
    ///
    /// # Returns
    /// `None` when the id is not in this snapshot (deleted or never fetched).
    pub fn name_of(&self, kind: VocabularyKind, id: EntityId) -> Option<&str> {
        self.entries(kind)
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.name.as_str())
    }
}

/// Read-mostly cache of the vocabulary, refreshed per view mount.
#[derive(Debug)]
pub struct VocabularyStore {
    snapshot: VocabularySnapshot,
    stale: bool,
}

impl Default for VocabularyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabularyStore {
    pub fn new() -> Self {
        Self {
            snapshot: VocabularySnapshot::default(),
            stale: true,
        }
    }

    /// Seed the store with an already-fetched snapshot.
    pub fn with_snapshot(snapshot: VocabularySnapshot) -> Self {
        Self {
            snapshot,
            stale: false,
        }
    }

    /// Fetch both lists and swap them in together.
    ///
    /// # Errors
    /// Returns the first gateway failure; the prior snapshot is kept intact.
    pub async fn refresh(&mut self, gateway: &dyn CatalogGateway) -> Result<(), CatalogError> {
        let tags = gateway.list_tags().await?;
        let sources = gateway.list_sources().await?;
        tracing::debug!(
            tags = tags.len(),
            sources = sources.len(),
            "vocabulary snapshot refreshed"
        );
        self.snapshot = VocabularySnapshot::new(tags, sources);
        self.stale = false;
        Ok(())
    }

    /// `true` until the first successful refresh.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn snapshot(&self) -> &VocabularySnapshot {
        &self.snapshot
    }

    pub fn entries(&self, kind: VocabularyKind) -> &[VocabEntry] {
        self.snapshot.entries(kind)
    }

    /// Current names for `ids`, in snapshot order; unknown ids are dropped.
    pub fn resolve_ids_to_names(&self, kind: VocabularyKind, ids: &BTreeSet<EntityId>) -> Vec<String> {
        resolver::ids_to_names(self.snapshot.entries(kind), ids)
    }

    /// Selection ids for the associations embedded in a fetched problem.
    pub fn resolve_problem_associations_to_ids(
        &self,
        kind: VocabularyKind,
        associations: &[VocabEntry],
    ) -> BTreeSet<EntityId> {
        tracing::trace!(%kind, count = associations.len(), "mapping associations to selection");
        resolver::associations_to_ids(associations)
    }
}
