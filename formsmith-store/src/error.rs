//! Error types for the persistence boundary.

use formsmith_codec::CodecError;
use formsmith_types::FormId;
use thiserror::Error;

/// Result type for store operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors raised while saving or loading a form.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("form not found: {0}")]
    NotFound(FormId),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored schema could not be turned into a document.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("storage backend error: {0}")]
    Backend(String),
}
