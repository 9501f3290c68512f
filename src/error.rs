//! Error types for the content store and its persistence gateways

use thiserror::Error;

/// Errors raised by [`crate::content::ContentStore`] operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Post not found: {0}")]
    NotFound(u64),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Reasons a save or import is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("slug `{0}` is already used by another post")]
    DuplicateSlug(String),

    #[error("invalid document shape: {0}")]
    InvalidShape(String),
}

/// Errors raised by a [`crate::persistence::PersistenceGateway`]
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// The validation failure behind this error, if any
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
