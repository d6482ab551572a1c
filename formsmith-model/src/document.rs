//! The row/column/field tree and its structural edits.

use crate::error::{EditResult, StructuralError, ValidationError};
use crate::field::{Field, FieldPatch};
use formsmith_types::{ColumnId, FieldId, RowId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// What a form is used for. Drives which renderer variant mounts it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPurpose {
    #[default]
    General,
    CustomerBooking,
    CustomerQuote,
    /// Staff-only checklist built from task items.
    ReminderTaskList,
}

/// Document-wide visual settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStyleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Width shared by every column of a row: `100 / column_count` percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidth {
    column_count: usize,
}

impl ColumnWidth {
    /// Width of one column in a row of `column_count` columns.
    pub fn for_count(column_count: usize) -> Self {
        Self {
            column_count: column_count.max(1),
        }
    }

    /// The width as a percentage of the row.
    pub fn percent(&self) -> f64 {
        100.0 / self.column_count as f64
    }
}

/// Formats as the interchange percentage string, e.g. `50%`.
impl fmt::Display for ColumnWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// An ordered list of fields inside a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    id: ColumnId,
    fields: Vec<Field>,
}

impl Column {
    /// Creates an empty column with a fresh id.
    pub fn new() -> Self {
        Self::from_parts(ColumnId::new(), Vec::new())
    }

    /// Reassembles a column from stored parts.
    pub fn from_parts(id: ColumnId, fields: Vec<Field>) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> &ColumnId {
        &self.id
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a field within this column.
    pub fn position(&self, field_id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| &f.id == field_id)
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }

    pub(crate) fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}

impl Default for Column {
    fn default() -> Self {
        Self::new()
    }
}

/// A horizontal band of equally wide columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    columns: Vec<Column>,
}

impl Row {
    /// Creates a row of `column_count` empty columns.
    pub fn new(column_count: usize) -> Result<Self, StructuralError> {
        if column_count == 0 {
            return Err(StructuralError::InvalidColumnCount(column_count));
        }
        Ok(Self {
            id: RowId::new(),
            columns: (0..column_count).map(|_| Column::new()).collect(),
        })
    }

    /// Reassembles a row from stored parts.
    pub fn from_parts(id: RowId, columns: Vec<Column>) -> Self {
        Self { id, columns }
    }

    pub fn id(&self) -> &RowId {
        &self.id
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Width of each column; always derived from the column count.
    pub fn column_width(&self) -> ColumnWidth {
        ColumnWidth::for_count(self.columns.len())
    }

    /// Every field in the row, column by column.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.columns.iter().flat_map(|c| c.fields.iter())
    }

    pub fn field_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<Column> {
        &mut self.columns
    }
}

/// Where a field currently sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLocation {
    pub row_id: RowId,
    pub column_id: ColumnId,
    pub index: usize,
}

/// A complete form: metadata and an ordered list of rows.
///
/// Every method that adds a field checks that its id and machine name are
/// not already used anywhere in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDocument {
    pub name: String,
    pub purpose: FormPurpose,
    pub styles: GlobalStyleSet,
    rows: Vec<Arc<Row>>,
}

impl FormDocument {
    /// Creates an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().map(|r| r.as_ref())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row_id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| &r.id == row_id).map(|r| r.as_ref())
    }

    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).map(|r| r.as_ref())
    }

    pub fn row_index(&self, row_id: &RowId) -> Option<usize> {
        self.rows.iter().position(|r| &r.id == row_id)
    }

    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.rows
            .iter()
            .flat_map(|r| r.columns.iter())
            .find(|c| &c.id == column_id)
    }

    /// Every field in document order: row by row, column by column.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.rows.iter().flat_map(|r| r.fields())
    }

    pub fn field_count(&self) -> usize {
        self.rows.iter().map(|r| r.field_count()).sum()
    }

    pub fn field(&self, field_id: &FieldId) -> Option<&Field> {
        self.fields().find(|f| &f.id == field_id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields().find(|f| f.name == name)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.field_by_name(name).is_some()
    }

    /// Every machine name in use.
    pub fn field_names(&self) -> HashSet<&str> {
        self.fields().map(|f| f.name.as_str()).collect()
    }

    /// Locates a field by id.
    pub fn find_field(&self, field_id: &FieldId) -> Option<FieldLocation> {
        let (r, c, index) = self.field_path(field_id)?;
        let row = &self.rows[r];
        Some(FieldLocation {
            row_id: row.id.clone(),
            column_id: row.columns[c].id.clone(),
            index,
        })
    }

    // ── Rows ─────────────────────────────────────────────────────

    /// Appends a row of `column_count` empty columns.
    pub fn add_row(&mut self, column_count: usize) -> Result<RowId, StructuralError> {
        let row = Row::new(column_count)?;
        let id = row.id.clone();
        self.rows.push(Arc::new(row));
        Ok(id)
    }

    /// Inserts a prebuilt row at `index`, clamped into `[0, len]`.
    ///
    /// The row's ids and machine names must not collide with each other or
    /// with the document; nothing is inserted if they do.
    pub fn insert_row(&mut self, index: usize, row: Row) -> EditResult<RowId> {
        self.check_row_insertable(&row)?;
        let index = index.min(self.rows.len());
        let id = row.id.clone();
        self.rows.insert(index, Arc::new(row));
        Ok(id)
    }

    /// Removes a row together with its columns and fields.
    pub fn remove_row(&mut self, row_id: &RowId) -> Option<Row> {
        let index = self.row_index(row_id)?;
        let row = self.rows.remove(index);
        Some(Arc::unwrap_or_clone(row))
    }

    /// Moves a row to `to_index`, clamped. Returns the final index.
    pub fn move_row(&mut self, row_id: &RowId, to_index: usize) -> Result<usize, StructuralError> {
        let from = self
            .row_index(row_id)
            .ok_or_else(|| StructuralError::RowNotFound(row_id.clone()))?;
        let row = self.rows.remove(from);
        let to = to_index.min(self.rows.len());
        self.rows.insert(to, row);
        Ok(to)
    }

    // ── Fields ───────────────────────────────────────────────────

    /// Inserts `field` into a column at `index`, clamped into `[0, len]`.
    /// Returns the index the field landed at.
    pub fn insert_field(
        &mut self,
        column_id: &ColumnId,
        index: usize,
        field: Field,
    ) -> EditResult<usize> {
        let (r, c) = self
            .column_path(column_id)
            .ok_or_else(|| StructuralError::ColumnNotFound(column_id.clone()))?;
        if self.field(&field.id).is_some() {
            return Err(StructuralError::DuplicateFieldId(field.id).into());
        }
        if field.name.trim().is_empty() {
            return Err(ValidationError::EmptyFieldName(field.id).into());
        }
        if self.contains_name(&field.name) {
            return Err(ValidationError::DuplicateFieldName(field.name).into());
        }
        let fields = self.row_mut(r).columns[c].fields_mut();
        let index = index.min(fields.len());
        fields.insert(index, field);
        Ok(index)
    }

    /// Detaches a field from wherever it is.
    pub fn remove_field(&mut self, field_id: &FieldId) -> Option<Field> {
        let (r, c, i) = self.field_path(field_id)?;
        Some(self.row_mut(r).columns[c].fields_mut().remove(i))
    }

    /// Applies an attribute patch in place.
    ///
    /// A rename to an empty or already used machine name rejects the whole
    /// patch and leaves the field unchanged.
    pub fn update_field(&mut self, field_id: &FieldId, patch: &FieldPatch) -> EditResult<()> {
        let (r, c, i) = self
            .field_path(field_id)
            .ok_or_else(|| StructuralError::FieldNotFound(field_id.clone()))?;
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyFieldName(field_id.clone()).into());
            }
            let taken = self
                .fields()
                .any(|f| &f.id != field_id && &f.name == name);
            if taken {
                return Err(ValidationError::DuplicateFieldName(name.clone()).into());
            }
        }
        let field = &mut self.row_mut(r).columns[c].fields_mut()[i];
        patch.apply(field);
        Ok(())
    }

    /// Moves a field to `index` in `to_column` (appending when `index` is
    /// `None`), keeping its id and every attribute.
    ///
    /// The destination is resolved before the field is detached, so a stale
    /// destination leaves the document untouched.
    pub fn relocate_field(
        &mut self,
        field_id: &FieldId,
        to_column: &ColumnId,
        index: Option<usize>,
    ) -> Result<FieldLocation, StructuralError> {
        let (sr, sc, si) = self
            .field_path(field_id)
            .ok_or_else(|| StructuralError::FieldNotFound(field_id.clone()))?;
        let (dr, dc) = self
            .column_path(to_column)
            .ok_or_else(|| StructuralError::ColumnNotFound(to_column.clone()))?;

        let field = self.row_mut(sr).columns[sc].fields_mut().remove(si);
        let row = self.row_mut(dr);
        let row_id = row.id.clone();
        let fields = row.columns[dc].fields_mut();
        let index = index.unwrap_or(fields.len()).min(fields.len());
        fields.insert(index, field);
        Ok(FieldLocation {
            row_id,
            column_id: to_column.clone(),
            index,
        })
    }

    // ── Internals ────────────────────────────────────────────────

    /// Copy-on-write access to a row; only this row is cloned when the
    /// document shares it with an older snapshot.
    pub(crate) fn row_mut(&mut self, index: usize) -> &mut Row {
        Arc::make_mut(&mut self.rows[index])
    }

    fn column_path(&self, column_id: &ColumnId) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.columns
                .iter()
                .position(|c| &c.id == column_id)
                .map(|c| (r, c))
        })
    }

    fn field_path(&self, field_id: &FieldId) -> Option<(usize, usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.columns.iter().enumerate().find_map(|(c, col)| {
                col.position(field_id).map(|i| (r, c, i))
            })
        })
    }

    fn check_row_insertable(&self, row: &Row) -> EditResult<()> {
        if self.row(&row.id).is_some() {
            return Err(StructuralError::DuplicateRowId(row.id.clone()).into());
        }
        let mut column_ids = HashSet::new();
        for column in &row.columns {
            if self.column(&column.id).is_some() || !column_ids.insert(&column.id) {
                return Err(StructuralError::DuplicateColumnId(column.id.clone()).into());
            }
        }
        let mut field_ids = HashSet::new();
        let mut names = HashSet::new();
        for field in row.fields() {
            if self.field(&field.id).is_some() || !field_ids.insert(&field.id) {
                return Err(StructuralError::DuplicateFieldId(field.id.clone()).into());
            }
            if field.name.trim().is_empty() {
                return Err(ValidationError::EmptyFieldName(field.id.clone()).into());
            }
            if self.contains_name(&field.name) || !names.insert(field.name.as_str()) {
                return Err(ValidationError::DuplicateFieldName(field.name.clone()).into());
            }
        }
        Ok(())
    }
}
