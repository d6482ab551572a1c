//! Conversion between [`FormDocument`] and [`SchemaDoc`].
//!
//! Loading repairs legacy input instead of rejecting it:
//! - a row, column or field without an id, or with an id already seen,
//!   gets a fresh one
//! - a field without a machine name gets `<type>_<n>`
//! - a machine name already taken gets `_2`, `_3`, ... appended
//! - a row with no columns gets one empty column
//!
//! Every repair is logged at `warn`. Conditional rules and mappings are
//! copied verbatim even when they point at nothing.

use crate::error::CodecResult;
use crate::schema::{SchemaColumn, SchemaDoc, SchemaField, SchemaRow};
use formsmith_model::{Column, Field, FormDocument, Row};
use formsmith_types::{ColumnId, FieldId, RowId};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Converts a document to its persisted form.
pub fn serialize(document: &FormDocument) -> SchemaDoc {
    SchemaDoc {
        name: document.name.clone(),
        purpose: document.purpose,
        styles: document.styles.clone(),
        schema: document.rows().map(serialize_row).collect(),
    }
}

fn serialize_row(row: &Row) -> SchemaRow {
    let width = row.column_width().to_string();
    SchemaRow {
        id: Some(row.id().clone()),
        columns: row
            .columns()
            .iter()
            .map(|column| SchemaColumn {
                id: Some(column.id().clone()),
                width: Some(width.clone()),
                fields: column.fields().iter().map(serialize_field).collect(),
            })
            .collect(),
    }
}

fn serialize_field(field: &Field) -> SchemaField {
    SchemaField {
        id: Some(field.id.clone()),
        label: field.label.clone(),
        name: field.name.clone(),
        field_type: field.field_type,
        placeholder: (!field.placeholder.is_empty()).then(|| field.placeholder.clone()),
        required: field.required,
        options: (!field.options.is_empty()).then(|| field.options.clone()),
        conditional: field.conditional.clone(),
        mapping: field.mapping.clone(),
        styles: (!field.styles.is_empty()).then(|| field.styles.clone()),
    }
}

/// Rehydrates a document from its persisted form, repairing missing or
/// duplicate ids and machine names.
pub fn deserialize(schema: &SchemaDoc) -> CodecResult<FormDocument> {
    let mut repair = Repair::new(schema);
    let mut document = FormDocument::new(schema.name.clone());
    document.purpose = schema.purpose;
    document.styles = schema.styles.clone();

    for schema_row in &schema.schema {
        let row_id = repair.row_id(schema_row.id.as_ref());
        let mut columns: Vec<Column> = schema_row
            .columns
            .iter()
            .map(|c| {
                let fields = c.fields.iter().map(|f| repair.field(f)).collect();
                Column::from_parts(repair.column_id(c.id.as_ref()), fields)
            })
            .collect();
        if columns.is_empty() {
            warn!("Row {} has no columns; giving it one empty column", row_id);
            repair.count += 1;
            columns.push(Column::from_parts(repair.column_id(None), Vec::new()));
        }
        let row = Row::from_parts(row_id, columns);
        document.insert_row(usize::MAX, row)?;
    }

    if repair.count > 0 {
        warn!(
            "Repaired {} id/name problems while loading form {:?}",
            repair.count, schema.name
        );
    }
    debug!(
        "Loaded form {:?}: {} rows, {} fields",
        document.name,
        document.row_count(),
        document.field_count()
    );
    Ok(document)
}

/// Parses JSON text and rehydrates it.
pub fn from_json(json: &str) -> CodecResult<FormDocument> {
    deserialize(&SchemaDoc::from_json_str(json)?)
}

/// Serializes a document to compact JSON.
pub fn to_json(document: &FormDocument) -> CodecResult<String> {
    Ok(serde_json::to_string(&serialize(document))?)
}

/// Serializes a document to indented JSON.
pub fn to_json_pretty(document: &FormDocument) -> CodecResult<String> {
    Ok(serde_json::to_string_pretty(&serialize(document))?)
}

/// Tracks what has been handed out while loading one document.
struct Repair {
    row_ids: HashSet<RowId>,
    column_ids: HashSet<ColumnId>,
    field_ids: HashSet<FieldId>,
    /// Names present in the input; generated names avoid these.
    reserved: HashSet<String>,
    taken: HashSet<String>,
    count: usize,
}

impl Repair {
    fn new(schema: &SchemaDoc) -> Self {
        Self {
            row_ids: HashSet::new(),
            column_ids: HashSet::new(),
            field_ids: HashSet::new(),
            reserved: schema
                .fields()
                .filter(|f| !f.name.trim().is_empty())
                .map(|f| f.name.clone())
                .collect(),
            taken: HashSet::new(),
            count: 0,
        }
    }

    fn row_id(&mut self, id: Option<&RowId>) -> RowId {
        match id {
            Some(id) if self.row_ids.insert(id.clone()) => id.clone(),
            _ => {
                self.count += 1;
                let fresh = RowId::new();
                self.row_ids.insert(fresh.clone());
                fresh
            }
        }
    }

    fn column_id(&mut self, id: Option<&ColumnId>) -> ColumnId {
        match id {
            Some(id) if self.column_ids.insert(id.clone()) => id.clone(),
            _ => {
                self.count += 1;
                let fresh = ColumnId::new();
                self.column_ids.insert(fresh.clone());
                fresh
            }
        }
    }

    fn field_id(&mut self, id: Option<&FieldId>) -> FieldId {
        match id {
            Some(id) if self.field_ids.insert(id.clone()) => id.clone(),
            _ => {
                self.count += 1;
                let fresh = FieldId::new();
                self.field_ids.insert(fresh.clone());
                fresh
            }
        }
    }

    fn name(&mut self, field: &SchemaField) -> String {
        let name = field.name.as_str();
        if !name.trim().is_empty() && self.taken.insert(name.to_string()) {
            return name.to_string();
        }
        self.count += 1;
        let (base, start) = if name.trim().is_empty() {
            (field.field_type.as_str(), 1)
        } else {
            (name, 2)
        };
        let mut n = start;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.reserved.contains(&candidate) && self.taken.insert(candidate.clone()) {
                warn!("Renamed field {:?} to {:?} on load", name, candidate);
                return candidate;
            }
            n += 1;
        }
    }

    fn field(&mut self, schema: &SchemaField) -> Field {
        Field {
            id: self.field_id(schema.id.as_ref()),
            name: self.name(schema),
            label: schema.label.clone(),
            field_type: schema.field_type,
            options: schema.options.clone().unwrap_or_default(),
            required: schema.required,
            placeholder: schema.placeholder.clone().unwrap_or_default(),
            conditional: schema.conditional.clone(),
            mapping: schema.mapping.clone(),
            styles: schema.styles.clone().unwrap_or_default(),
        }
    }
}
