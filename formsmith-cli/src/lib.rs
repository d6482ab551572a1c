//! Report building for the `formsmith` binary.

use formsmith_builder::BuilderConfig;
use formsmith_codec::{serialize, SchemaDoc, SchemaField};
use formsmith_model::{DanglingReference, FormDocument, ValidationError};
use formsmith_store::{FileFormStore, FormStore, FormSummary, PersistenceResult};
use formsmith_types::RowId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Findings for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub name: String,
    pub rows: usize,
    pub fields: usize,
    pub errors: Vec<ValidationError>,
    pub dangling: Vec<DanglingReference>,
    /// Rows with more columns than the builder offers.
    pub wide_rows: Vec<(RowId, usize)>,
}

impl CheckReport {
    pub fn build(document: &FormDocument, config: &BuilderConfig) -> Self {
        Self {
            name: document.name.clone(),
            rows: document.row_count(),
            fields: document.field_count(),
            errors: document.validate().err().unwrap_or_default(),
            dangling: document.dangling_references(),
            wide_rows: document
                .rows()
                .filter(|r| r.column_count() > config.max_columns)
                .map(|r| (r.id().clone(), r.column_count()))
                .collect(),
        }
    }

    /// Validation passed. Dangling references and wide rows are warnings.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}: {} rows, {} fields", self.name, self.rows, self.fields)?;
        for error in &self.errors {
            writeln!(f, "  error: {error}")?;
        }
        for reference in &self.dangling {
            match reference {
                DanglingReference::Conditional { field_id, watched_name } => writeln!(
                    f,
                    "  warning: field {field_id} is shown only when {watched_name:?} matches, but no field has that name"
                )?,
                DanglingReference::Mapping { field_id, mapping } => writeln!(
                    f,
                    "  warning: field {field_id} maps to {mapping:?}, whose task item row is gone"
                )?,
            }
        }
        for (row, columns) in &self.wide_rows {
            writeln!(f, "  warning: row {row} has {columns} columns")?;
        }
        if self.is_ok() {
            writeln!(f, "ok")?;
        }
        Ok(())
    }
}

/// What a renderer would show for a set of submission values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub visible: Vec<String>,
    pub hidden: Vec<String>,
    pub missing_required: Vec<String>,
    pub task_items: usize,
}

impl Preview {
    pub fn build(schema: &SchemaDoc, values: &BTreeMap<String, String>) -> Self {
        let (visible, hidden): (Vec<_>, Vec<_>) =
            schema.fields().partition(|f| f.is_visible(values));
        Self {
            visible: names(visible),
            hidden: names(hidden),
            missing_required: names(schema.missing_required(values)),
            task_items: schema.task_items().len(),
        }
    }
}

fn names(fields: Vec<&SchemaField>) -> Vec<String> {
    fields.into_iter().map(|f| f.name.clone()).collect()
}

/// Parses a `name=value` submission pair.
pub fn parse_value(pair: &str) -> Result<(String, String), String> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got {pair:?}")),
    }
}

/// The canonical form of a schema: every id present, widths re-derived.
pub fn normalize(document: &FormDocument) -> SchemaDoc {
    serialize(document)
}

/// Lists the forms stored under `root`.
pub async fn list_forms(root: &Path) -> PersistenceResult<Vec<FormSummary>> {
    FileFormStore::at(root).list().await
}
