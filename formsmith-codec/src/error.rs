//! Error types for the schema codec.

use formsmith_model::EditError;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while converting schema documents.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed JSON or an unknown field type.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The rehydrated tree was rejected by the document model.
    #[error("document rejected: {0}")]
    Rejected(#[from] EditError),
}
