//! Error taxonomy for catalog operations.
use thiserror::Error;

/// Top-level error type for gateway calls and controller workflows.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Local validation failure; blocks the action before any remote call.
    #[error("{0}")]
    Validation(String),

    /// The remote service answered with a non-success status.
    #[error("Remote error ({status}): {}", .message.as_deref().unwrap_or("no details provided"))]
    Remote { status: u16, message: Option<String> },

    /// No response was received (connect failure, timeout, broken body).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response whose body did not match the expected shape.
    #[error("Response decoding error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Build a local validation error with a literal message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// `true` for errors raised locally before any remote call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Message supplied by the remote service, when it provided one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: validation text verbatim, the server message
    /// when present, otherwise the per-action `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            _ => self.server_message().unwrap_or(fallback).to_string(),
        }
    }
}
