//! Identifier/name translation between selections and wire payloads.
//!
//! Selection widgets track tags and sources by id so renames do not disturb
//! them; the remote contract takes names. Every create/update goes through
//! [`AssociationResolver::names_for`] first.

use crate::models::{EntityId, Problem, VocabEntry, VocabularyKind};
use crate::vocabulary::VocabularySnapshot;
use std::collections::BTreeSet;

/// Selected tag and source identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub tags: BTreeSet<EntityId>,
    pub sources: BTreeSet<EntityId>,
}

impl Selection {
    /// Selected ids of one vocabulary kind.
    pub fn ids(&self, kind: VocabularyKind) -> &BTreeSet<EntityId> {
        match kind {
            VocabularyKind::Tag => &self.tags,
            VocabularyKind::Source => &self.sources,
        }
    }
}

/// Name lists ready for a create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationNames {
    pub tags: Vec<String>,
    pub sources: Vec<String>,
}

/// Translates selections against one vocabulary snapshot.
pub struct AssociationResolver<'a> {
    vocabulary: &'a VocabularySnapshot,
}

impl<'a> AssociationResolver<'a> {
    pub fn new(vocabulary: &'a VocabularySnapshot) -> Self {
        Self { vocabulary }
    }

    /// Names for the selected ids, in snapshot enumeration order.
    ///
    /// Ids missing from the snapshot are omitted without error.
    pub fn names_for(&self, selection: &Selection) -> AssociationNames {
        AssociationNames {
            tags: self.names_of(VocabularyKind::Tag, &selection.tags),
            sources: self.names_of(VocabularyKind::Source, &selection.sources),
        }
    }

    fn names_of(&self, kind: VocabularyKind, ids: &BTreeSet<EntityId>) -> Vec<String> {
        let names = ids_to_names(self.vocabulary.entries(kind), ids);
        if names.len() < ids.len() {
            tracing::debug!(
                %kind,
                selected = ids.len(),
                resolved = names.len(),
                "omitting selections missing from the vocabulary snapshot"
            );
        }
        names
    }

    /// Selection equivalent of a fetched problem's embedded associations.
    pub fn selection_for(problem: &Problem) -> Selection {
        Selection {
            tags: associations_to_ids(&problem.tags),
            sources: associations_to_ids(&problem.sources),
        }
    }
}

/// Names of the `entries` whose id is in `ids`, keeping `entries` order.
pub fn ids_to_names(entries: &[VocabEntry], ids: &BTreeSet<EntityId>) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| ids.contains(&entry.id))
        .map(|entry| entry.name.clone())
        .collect()
}

/// Identifier set of embedded association objects.
pub fn associations_to_ids(associations: &[VocabEntry]) -> BTreeSet<EntityId> {
    associations.iter().map(|entry| entry.id).collect()
}
