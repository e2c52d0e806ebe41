//! Problem records as fetched from, and submitted to, the remote catalog.

use super::label::VocabEntry;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier shared by problems, tags, and sources.
pub type EntityId = i64;

/// Problem difficulty rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown difficulty '{}' (expected Easy, Medium, or Hard)", trimmed))
    }
}

/// Whether the problem has been solved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemStatus {
    #[default]
    Unsolved,
    Solved,
}

impl ProblemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unsolved => "Unsolved",
            Self::Solved => "Solved",
        }
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unsolved" => Ok(Self::Unsolved),
            "solved" => Ok(Self::Solved),
            other => Err(format!("unknown status '{}' (expected Unsolved or Solved)", other)),
        }
    }
}

/// A catalogued problem as returned by the remote service.
///
/// Associations arrive as embedded `{id, name}` objects. Optional text fields
/// may be `null` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: EntityId,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub solution_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ProblemStatus,
    #[serde(default)]
    pub latex_content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<VocabEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<VocabEntry>,
}

impl Problem {
    /// Names of the embedded tags, in server order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }

    /// Names of the embedded sources, in server order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name.as_str()).collect()
    }
}

/// Create/update request body. Associations travel as names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemPayload {
    pub title: String,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub solution_text: String,
    pub status: ProblemStatus,
    pub latex_content: String,
    pub tags: Vec<String>,
    pub sources: Vec<String>,
}

/// Body of a successful delete call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
