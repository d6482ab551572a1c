//! Form document model for formsmith.
//!
//! Defines the hierarchy every other formsmith crate works on:
//! - [`FormDocument`]: document metadata plus an ordered list of rows
//! - [`Row`] / [`Column`]: layout containers; column widths are always `100/n`
//! - [`Field`]: a single input with its machine name, conditional rule,
//!   CRM mapping and style overrides
//!
//! All structural edits go through `FormDocument` methods so that field ids
//! and machine names stay unique across the whole document. Rows are held
//! behind `Arc`, so cloning a document is cheap and an edit on the clone only
//! copies the row it touches.

mod conditional;
mod document;
mod error;
mod field;
mod layout;
mod validation;

pub use conditional::{is_visible, SubmissionValues};
pub use document::{Column, ColumnWidth, FieldLocation, FormDocument, FormPurpose, GlobalStyleSet, Row};
pub use error::{EditError, EditResult, StructuralError, ValidationError};
pub use field::{ConditionalRule, Field, FieldPatch, FieldType, ParseFieldTypeError, StyleOverride};
pub use validation::DanglingReference;
