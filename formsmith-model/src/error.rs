//! Error types for document edits.

use formsmith_types::{ColumnId, FieldId, RowId};
use thiserror::Error;

/// Result type for document edits.
pub type EditResult<T> = Result<T, EditError>;

/// An edit targeted a node that does not exist, or would break id uniqueness.
///
/// Callers driving the editor from user input treat these as no-ops: a drop
/// onto a row that was removed a moment ago simply does nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// No row with this id.
    #[error("row not found: {0}")]
    RowNotFound(RowId),

    /// No column with this id.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// No field with this id.
    #[error("field not found: {0}")]
    FieldNotFound(FieldId),

    /// A row with this id is already in the document.
    #[error("duplicate row id: {0}")]
    DuplicateRowId(RowId),

    /// A column with this id is already in the document.
    #[error("duplicate column id: {0}")]
    DuplicateColumnId(ColumnId),

    /// A field with this id is already in the document.
    #[error("duplicate field id: {0}")]
    DuplicateFieldId(FieldId),

    /// Rows need at least one column.
    #[error("invalid column count: {0}")]
    InvalidColumnCount(usize),
}

/// A document-level precondition failed.
///
/// These are reported back to the user as form-level messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The form has no name.
    #[error("form name is required")]
    EmptyDocumentName,

    /// A field has an empty machine name.
    #[error("field {0} has an empty machine name")]
    EmptyFieldName(FieldId),

    /// The machine name is already used by another field.
    #[error("machine name already in use: {0}")]
    DuplicateFieldName(String),
}

/// Any failure of a single document edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl EditError {
    /// Returns true for structural errors, which are absorbed as no-ops.
    pub fn is_structural(&self) -> bool {
        matches!(self, EditError::Structural(_))
    }
}
