//! What is being dragged and where it can land.
//!
//! The palette, field cards and row handles all produce a [`DragPayload`];
//! every drop zone produces a [`DropTarget`]. Dispatch happens once, in the
//! move engine.

use formsmith_model::FieldType;
use formsmith_types::{ColumnId, FieldId, RowId};
use serde::{Deserialize, Serialize};

/// An entry in the field palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum PaletteItem {
    Field(FieldType),
    /// Expands into a description / completed / reason row.
    TaskItem,
}

impl PaletteItem {
    /// Every palette entry, in display order.
    pub fn all() -> impl Iterator<Item = PaletteItem> {
        FieldType::ALL
            .into_iter()
            .map(PaletteItem::Field)
            .chain(std::iter::once(PaletteItem::TaskItem))
    }

    pub fn label(self) -> &'static str {
        match self {
            PaletteItem::Field(t) => t.default_label(),
            PaletteItem::TaskItem => "Task Item",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragPayload {
    NewItem { item: PaletteItem },
    ExistingField { field_id: FieldId },
    ExistingRow { row_id: RowId },
}

impl DragPayload {
    pub fn new_field(field_type: FieldType) -> Self {
        DragPayload::NewItem {
            item: PaletteItem::Field(field_type),
        }
    }

    pub fn task_item() -> Self {
        DragPayload::NewItem {
            item: PaletteItem::TaskItem,
        }
    }

    pub fn field(field_id: FieldId) -> Self {
        DragPayload::ExistingField { field_id }
    }

    pub fn row(row_id: RowId) -> Self {
        DragPayload::ExistingRow { row_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropTarget {
    /// The dropped field ends up at `index` in the column, clamped.
    Column { column_id: ColumnId, index: usize },
    /// The dropped row ends up at `index` in the row list, clamped.
    RowSlot { index: usize },
}

impl DropTarget {
    pub fn column(column_id: ColumnId, index: usize) -> Self {
        DropTarget::Column { column_id, index }
    }

    pub fn row_slot(index: usize) -> Self {
        DropTarget::RowSlot { index }
    }
}
