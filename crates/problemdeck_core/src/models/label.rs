//! Tag and source vocabulary entries.

use super::problem::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `{id, name}` record from the tag or source collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VocabEntry {
    pub id: EntityId,
    pub name: String,
}

impl VocabEntry {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Which controlled vocabulary an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularyKind {
    Tag,
    Source,
}

impl VocabularyKind {
    /// Capitalized singular label used in notices ("Tag", "Source").
    pub fn label(self) -> &'static str {
        match self {
            Self::Tag => "Tag",
            Self::Source => "Source",
        }
    }

    /// Lowercase singular noun ("tag", "source").
    pub fn noun(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Source => "source",
        }
    }

    /// Lowercase plural noun, also the collection's path segment.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Source => "sources",
        }
    }
}

impl fmt::Display for VocabularyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}
