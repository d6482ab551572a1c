//! Applies drops to a document.
//!
//! Every drop is one of three moves: a palette item becomes new content, an
//! existing field is relocated, or an existing row is reordered. Anything
//! else is a cancellation. A target that no longer exists is absorbed as a
//! no-op and reported in the outcome; the document is left as it was.

use crate::config::BuilderConfig;
use crate::names::NameGenerator;
use crate::payload::{DragPayload, DropTarget, PaletteItem};
use crate::template::task_item;
use formsmith_model::{
    Column, EditError, Field, FieldLocation, FieldType, FormDocument, Row, StructuralError,
    ValidationError,
};
use formsmith_types::{ColumnId, FieldId, RowId};
use tracing::debug;

/// What a drop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A palette field was created in an existing column.
    Inserted {
        field_id: FieldId,
        column_id: ColumnId,
        index: usize,
    },
    /// An existing field moved; id and attributes unchanged.
    Relocated(FieldLocation),
    /// A new row was created (palette field on a row gap, or a task item).
    RowInserted { row_id: RowId, index: usize },
    RowMoved { row_id: RowId, index: usize },
    /// Dropped outside any container that accepts the payload.
    Cancelled,
    /// The target or source disappeared before the drop.
    Absorbed(StructuralError),
    /// The new content could not be inserted without breaking uniqueness.
    Rejected(ValidationError),
}

impl DropOutcome {
    /// Whether the document changed.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            DropOutcome::Inserted { .. }
                | DropOutcome::Relocated(_)
                | DropOutcome::RowInserted { .. }
                | DropOutcome::RowMoved { .. }
        )
    }
}

impl From<EditError> for DropOutcome {
    fn from(error: EditError) -> Self {
        match error {
            EditError::Structural(e) => DropOutcome::Absorbed(e),
            EditError::Validation(e) => DropOutcome::Rejected(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoveEngine {
    names: NameGenerator,
    default_options: Vec<String>,
}

impl MoveEngine {
    pub fn new(config: &BuilderConfig) -> Self {
        Self::with_names(NameGenerator::new(config.name_suffix_len), config)
    }

    pub fn with_names(names: NameGenerator, config: &BuilderConfig) -> Self {
        Self {
            names,
            default_options: config.default_options.clone(),
        }
    }

    pub fn names_mut(&mut self) -> &mut NameGenerator {
        &mut self.names
    }

    /// A fresh field of `field_type` with a machine name unused in `document`.
    pub fn new_field(&mut self, field_type: FieldType, document: &FormDocument) -> Field {
        let name = self.names.for_type(field_type, document);
        let field = Field::new(field_type, name, field_type.default_label());
        if field_type.has_options() {
            field.with_options(self.default_options.iter().cloned())
        } else {
            field
        }
    }

    /// Applies one drop. `target` is `None` when the pointer was released
    /// outside every drop zone.
    pub fn apply_drop(
        &mut self,
        document: &mut FormDocument,
        payload: &DragPayload,
        target: Option<&DropTarget>,
    ) -> DropOutcome {
        let Some(target) = target else {
            debug!("Drop outside any container, cancelled");
            return DropOutcome::Cancelled;
        };

        let outcome = match (payload, target) {
            (DragPayload::NewItem { item }, DropTarget::Column { column_id, index }) => match item {
                PaletteItem::Field(field_type) => {
                    self.insert_new_field(document, *field_type, column_id, *index)
                }
                PaletteItem::TaskItem => match row_of_column(document, column_id) {
                    Some(r) => {
                        let row = task_item(&mut self.names, document);
                        insert_row(document, r + 1, row)
                    }
                    None => DropOutcome::Absorbed(StructuralError::ColumnNotFound(
                        column_id.clone(),
                    )),
                },
            },
            (DragPayload::NewItem { item }, DropTarget::RowSlot { index }) => {
                let row = match item {
                    PaletteItem::Field(field_type) => {
                        let field = self.new_field(*field_type, document);
                        Row::from_parts(
                            RowId::new(),
                            vec![Column::from_parts(ColumnId::new(), vec![field])],
                        )
                    }
                    PaletteItem::TaskItem => task_item(&mut self.names, document),
                };
                insert_row(document, *index, row)
            }
            (DragPayload::ExistingField { field_id }, DropTarget::Column { column_id, index }) => {
                match document.relocate_field(field_id, column_id, Some(*index)) {
                    Ok(location) => DropOutcome::Relocated(location),
                    Err(e) => DropOutcome::Absorbed(e),
                }
            }
            (DragPayload::ExistingRow { row_id }, DropTarget::RowSlot { index }) => {
                match document.move_row(row_id, *index) {
                    Ok(index) => DropOutcome::RowMoved {
                        row_id: row_id.clone(),
                        index,
                    },
                    Err(e) => DropOutcome::Absorbed(e),
                }
            }
            (DragPayload::ExistingField { .. }, DropTarget::RowSlot { .. })
            | (DragPayload::ExistingRow { .. }, DropTarget::Column { .. }) => {
                DropOutcome::Cancelled
            }
        };

        match &outcome {
            DropOutcome::Absorbed(e) => debug!("Drop absorbed: {e}"),
            DropOutcome::Rejected(e) => debug!("Drop rejected: {e}"),
            DropOutcome::Cancelled => debug!("Drop target does not accept {:?}", payload),
            applied => debug!("Applied drop: {:?}", applied),
        }
        outcome
    }

    fn insert_new_field(
        &mut self,
        document: &mut FormDocument,
        field_type: FieldType,
        column_id: &ColumnId,
        index: usize,
    ) -> DropOutcome {
        if document.column(column_id).is_none() {
            return DropOutcome::Absorbed(StructuralError::ColumnNotFound(column_id.clone()));
        }
        let field = self.new_field(field_type, document);
        let field_id = field.id.clone();
        match document.insert_field(column_id, index, field) {
            Ok(index) => DropOutcome::Inserted {
                field_id,
                column_id: column_id.clone(),
                index,
            },
            Err(e) => e.into(),
        }
    }
}

impl Default for MoveEngine {
    fn default() -> Self {
        Self::new(&BuilderConfig::default())
    }
}

fn insert_row(document: &mut FormDocument, index: usize, row: Row) -> DropOutcome {
    match document.insert_row(index, row) {
        Ok(row_id) => {
            let index = document.row_index(&row_id).unwrap_or(index);
            DropOutcome::RowInserted { row_id, index }
        }
        Err(e) => e.into(),
    }
}

fn row_of_column(document: &FormDocument, column_id: &ColumnId) -> Option<usize> {
    document
        .rows()
        .position(|row| row.columns().iter().any(|c| c.id() == column_id))
}
