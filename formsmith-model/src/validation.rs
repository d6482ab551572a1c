//! Save-time validation and dangling-reference detection.

use crate::document::FormDocument;
use crate::error::ValidationError;
use formsmith_types::FieldId;
use std::collections::HashSet;

/// Prefix of CRM mappings that point back into a task-item row.
const TASK_ITEM_MAPPING_PREFIX: &str = "task_item";

/// A conditional rule or mapping that points at something no longer in the
/// document. Informational only: the reference is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    /// A conditional rule watches a machine name no field has.
    Conditional {
        field_id: FieldId,
        watched_name: String,
    },
    /// A `task_item.<row id>.*` mapping names a row that was removed.
    Mapping { field_id: FieldId, mapping: String },
}

impl FormDocument {
    /// Checks the preconditions for saving. Returns every violation found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError::EmptyDocumentName);
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for field in self.fields() {
            if field.name.trim().is_empty() {
                errors.push(ValidationError::EmptyFieldName(field.id.clone()));
            } else if !seen.insert(field.name.as_str()) && reported.insert(field.name.as_str()) {
                errors.push(ValidationError::DuplicateFieldName(field.name.clone()));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Lists references that no longer resolve. Never mutates the document.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let names = self.field_names();
        let mut dangling = Vec::new();

        for field in self.fields() {
            if let Some(rule) = &field.conditional {
                if !names.contains(rule.watched_field_name.as_str()) {
                    dangling.push(DanglingReference::Conditional {
                        field_id: field.id.clone(),
                        watched_name: rule.watched_field_name.clone(),
                    });
                }
            }
            if let Some(mapping) = &field.mapping {
                if let Some(row_id) = task_item_row(mapping) {
                    let exists = self.rows().any(|r| r.id().as_str() == row_id);
                    if !exists {
                        dangling.push(DanglingReference::Mapping {
                            field_id: field.id.clone(),
                            mapping: mapping.clone(),
                        });
                    }
                }
            }
        }
        dangling
    }
}

/// The row id segment of a `task_item.<row id>.<part>` mapping.
fn task_item_row(mapping: &str) -> Option<&str> {
    let mut parts = mapping.splitn(3, '.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(TASK_ITEM_MAPPING_PREFIX), Some(row_id), Some(_)) if !row_id.is_empty() => Some(row_id),
        _ => None,
    }
}
