use formsmith_types::FieldId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of input kinds a field can render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Select,
    Radio,
    Checkbox,
    Date,
    Time,
    Address,
    File,
}

impl FieldType {
    /// Every field type, in palette order.
    pub const ALL: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
        FieldType::Time,
        FieldType::Address,
        FieldType::File,
    ];

    /// The wire name, also used as the machine-name prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Address => "address",
            FieldType::File => "file",
        }
    }

    /// Label given to a freshly dropped field of this type.
    pub fn default_label(self) -> &'static str {
        match self {
            FieldType::Text => "Text Field",
            FieldType::Textarea => "Text Area",
            FieldType::Email => "Email",
            FieldType::Phone => "Phone",
            FieldType::Select => "Dropdown",
            FieldType::Radio => "Radio Group",
            FieldType::Checkbox => "Checkbox",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::Address => "Address",
            FieldType::File => "File Upload",
        }
    }

    /// Whether the option list is meaningful for this type.
    pub fn has_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`FieldType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type: {0}")]
pub struct ParseFieldTypeError(pub String);

impl FromStr for FieldType {
    type Err = ParseFieldTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseFieldTypeError(s.to_string()))
    }
}

/// Show a field only when another field holds an exact value.
///
/// The watched name is not required to exist in the document; a rule whose
/// target was removed is kept as-is and simply never matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionalRule {
    /// Machine name of the field whose value is checked.
    #[serde(rename = "field")]
    pub watched_field_name: String,
    /// Value the watched field must hold, compared as an exact string.
    #[serde(rename = "value")]
    pub required_value: String,
}

impl ConditionalRule {
    pub fn new(watched_field_name: impl Into<String>, required_value: impl Into<String>) -> Self {
        Self {
            watched_field_name: watched_field_name.into(),
            required_value: required_value.into(),
        }
    }
}

/// Per-field visual overrides, independent of layout.
///
/// Keys this crate does not know about are carried in `extra` so that styles
/// written by newer editors survive a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl StyleOverride {
    /// True when no override is set.
    pub fn is_empty(&self) -> bool {
        self.text_color.is_none()
            && self.label_color.is_none()
            && self.background_color.is_none()
            && self.border_color.is_none()
            && self.border_width.is_none()
            && self.border_radius.is_none()
            && self.extra.is_empty()
    }
}

/// A single input in the form.
///
/// `name` is the machine name: the submission data key and the target of
/// other fields' conditional rules. Uniqueness of `id` and `name` is enforced
/// by [`FormDocument`](crate::FormDocument), not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    /// Choices for select/radio fields. Kept for other types but unused.
    pub options: Vec<String>,
    pub required: bool,
    pub placeholder: String,
    pub conditional: Option<ConditionalRule>,
    /// Opaque dot-delimited CRM path, e.g. `lead.email`.
    pub mapping: Option<String>,
    pub styles: StyleOverride,
}

impl Field {
    /// Creates a field with a fresh id and empty attributes.
    pub fn new(field_type: FieldType, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: FieldId::new(),
            name: name.into(),
            label: label.into(),
            field_type,
            options: Vec::new(),
            required: false,
            placeholder: String::new(),
            conditional: None,
            mapping: None,
            styles: StyleOverride::default(),
        }
    }

    pub fn with_id(mut self, id: FieldId) -> Self {
        self.id = id;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_conditional(mut self, rule: ConditionalRule) -> Self {
        self.conditional = Some(rule);
        self
    }

    pub fn with_mapping(mut self, mapping: impl Into<String>) -> Self {
        self.mapping = Some(mapping.into());
        self
    }

    pub fn with_styles(mut self, styles: StyleOverride) -> Self {
        self.styles = styles;
        self
    }
}

/// An attribute patch for [`FormDocument::update_field`](crate::FormDocument::update_field).
///
/// `None` leaves an attribute untouched. The conditional rule and mapping are
/// doubly optional so a patch can clear them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub options: Option<Vec<String>>,
    pub required: Option<bool>,
    pub placeholder: Option<String>,
    pub conditional: Option<Option<ConditionalRule>>,
    pub mapping: Option<Option<String>>,
    pub styles: Option<StyleOverride>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_conditional(mut self, rule: Option<ConditionalRule>) -> Self {
        self.conditional = Some(rule);
        self
    }

    pub fn with_mapping(mut self, mapping: Option<String>) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn with_styles(mut self, styles: StyleOverride) -> Self {
        self.styles = Some(styles);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes every set attribute onto `field`. Name uniqueness is checked
    /// by the caller before this runs.
    pub(crate) fn apply(&self, field: &mut Field) {
        if let Some(name) = &self.name {
            field.name.clone_from(name);
        }
        if let Some(label) = &self.label {
            field.label.clone_from(label);
        }
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(options) = &self.options {
            field.options.clone_from(options);
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(placeholder) = &self.placeholder {
            field.placeholder.clone_from(placeholder);
        }
        if let Some(conditional) = &self.conditional {
            field.conditional.clone_from(conditional);
        }
        if let Some(mapping) = &self.mapping {
            field.mapping.clone_from(mapping);
        }
        if let Some(styles) = &self.styles {
            field.styles.clone_from(styles);
        }
    }
}
