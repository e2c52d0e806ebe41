//! Core domain library for ProblemDeck (model, vocabulary, controllers).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants (endpoint default, upload limits, literal messages).
pub mod constants;
/// User-facing workflow controllers (list, view, form, upload, collections).
pub mod controllers;
/// Process-global environment helpers.
pub mod env;
/// Catalog error taxonomy.
pub mod error;
/// Transient notices and the confirmation seam.
pub mod feedback;
/// Remote catalog gateway contract.
pub mod gateway;
/// Data models shared by the gateway and the controllers.
pub mod models;
/// Identifier/name translation between selections and wire payloads.
pub mod resolver;
/// Keyword and name text helpers.
pub mod text;
/// Cached tag/source vocabulary.
pub mod vocabulary;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::{DEFAULT_API_BASE_URL, MAX_UPLOAD_BYTES};
pub use error::CatalogError;
pub use feedback::{Confirm, Notice, NoticeLevel, Notices};
pub use gateway::CatalogGateway;
pub use resolver::{AssociationResolver, Selection};
pub use vocabulary::{VocabularySnapshot, VocabularyStore};
