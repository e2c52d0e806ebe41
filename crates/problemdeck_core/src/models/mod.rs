//! Data models for gateway requests, responses, and controller state.

/// Image selections handed to the extraction endpoint.
pub mod image;
/// Tag and source vocabulary entries.
pub mod label;
/// Problem records and submission payloads.
pub mod problem;


pub use image::ImageCandidate;
pub use label::{VocabEntry, VocabularyKind};
pub use problem::{DeleteAck, Difficulty, EntityId, Problem, ProblemPayload, ProblemStatus};
