//! Column re-layout.
//!
//! Changing a row's column count never drops a field: every field from the
//! old columns is gathered, in column order, into the first new column, and
//! the remaining columns start empty. Per-column grouping is not preserved;
//! fields are redistributed by dragging afterwards.

use crate::document::{Column, FormDocument, Row};
use crate::error::StructuralError;
use formsmith_types::RowId;

impl Row {
    /// Replaces this row's columns with `column_count` fresh columns and
    /// collects all existing fields into the first one.
    pub fn change_column_count(&mut self, column_count: usize) -> Result<(), StructuralError> {
        if column_count == 0 {
            return Err(StructuralError::InvalidColumnCount(column_count));
        }
        let gathered: Vec<_> = std::mem::take(self.columns_mut())
            .into_iter()
            .flat_map(Column::into_fields)
            .collect();

        let mut columns: Vec<Column> = (0..column_count).map(|_| Column::new()).collect();
        *columns[0].fields_mut() = gathered;
        *self.columns_mut() = columns;
        Ok(())
    }
}

impl FormDocument {
    /// Re-lays out a row with `column_count` columns of width `100/n`.
    pub fn change_column_count(
        &mut self,
        row_id: &RowId,
        column_count: usize,
    ) -> Result<(), StructuralError> {
        if column_count == 0 {
            return Err(StructuralError::InvalidColumnCount(column_count));
        }
        let index = self
            .row_index(row_id)
            .ok_or_else(|| StructuralError::RowNotFound(row_id.clone()))?;
        self.row_mut(index).change_column_count(column_count)
    }
}
