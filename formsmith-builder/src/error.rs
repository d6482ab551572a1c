//! Error types for the editing session.

use formsmith_model::ValidationError;
use formsmith_store::PersistenceError;
use thiserror::Error;

/// Result type for session operations that reach the user.
pub type SessionResult<T> = Result<T, SessionError>;

/// Failures surfaced to the user as notices. Structural no-ops never show up
/// here; they are absorbed where they happen.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("document is not valid: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("a save is already in progress")]
    SaveInProgress,
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationError> for SessionError {
    fn from(error: ValidationError) -> Self {
        SessionError::Validation(vec![error])
    }
}
