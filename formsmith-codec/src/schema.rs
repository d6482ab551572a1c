//! Wire types of the persisted schema.
//!
//! ```json
//! {
//!   "name": "Booking",
//!   "purpose": "customer_booking",
//!   "styles": { "primaryColor": "#0055ff" },
//!   "schema": [
//!     { "id": "r1", "columns": [
//!       { "id": "c1", "width": "100%", "fields": [
//!         { "id": "f1", "label": "Email", "name": "email", "type": "email",
//!           "required": true, "mapping": "lead.email" }
//!       ] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Ids are optional on input so that documents written before ids existed
//! still load; the codec always writes them.

use formsmith_model::{ConditionalRule, FieldType, FormPurpose, GlobalStyleSet, StyleOverride};
use formsmith_types::{ColumnId, FieldId, RowId};
use serde::{Deserialize, Serialize};

/// A persisted form document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDoc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub purpose: FormPurpose,
    #[serde(default)]
    pub styles: GlobalStyleSet,
    /// Rows, top to bottom.
    #[serde(default)]
    pub schema: Vec<SchemaRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RowId>,
    #[serde(default)]
    pub columns: Vec<SchemaColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ColumnId>,
    /// Percentage string such as `"50%"`. Ignored on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FieldId>,
    #[serde(default)]
    pub label: String,
    /// Machine name. Empty only in damaged legacy input.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<ConditionalRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<StyleOverride>,
}

impl SchemaDoc {
    /// Parses a schema document from JSON text.
    pub fn from_json_str(json: &str) -> crate::CodecResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every field in document order.
    pub fn fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.schema
            .iter()
            .flat_map(|r| r.columns.iter())
            .flat_map(|c| c.fields.iter())
    }

    pub fn field_by_name(&self, name: &str) -> Option<&SchemaField> {
        self.fields().find(|f| f.name == name)
    }
}
