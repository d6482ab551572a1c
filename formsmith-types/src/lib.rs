//! Core type definitions for formsmith.
//!
//! This crate defines the identifiers that every other formsmith crate
//! passes around:
//! - Row, Column and Field identifiers inside a form document
//! - Form identifiers assigned by the persistence layer
//!
//! Document structure itself lives in `formsmith-model`.

mod ids;

pub use ids::{ColumnId, FieldId, FormId, RowId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
}
