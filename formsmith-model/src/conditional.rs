//! Conditional visibility.
//!
//! Each field is evaluated on its own against raw submission input. A field
//! whose watched field is hidden is not hidden by cascade; it only looks at
//! whether the watched name currently holds the required value.

use crate::field::{ConditionalRule, Field};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read access to live submission values, keyed by machine name.
pub trait SubmissionValues {
    /// The current string value for `name`, if any.
    fn value(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> SubmissionValues for HashMap<String, String, S> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl SubmissionValues for BTreeMap<String, String> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Only JSON strings carry a value; numbers, booleans and the rest never
/// equal a required value.
impl SubmissionValues for serde_json::Map<String, serde_json::Value> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(serde_json::Value::as_str)
    }
}

impl<T: SubmissionValues + ?Sized> SubmissionValues for &T {
    fn value(&self, name: &str) -> Option<&str> {
        (**self).value(name)
    }
}

impl ConditionalRule {
    /// True iff the watched name is present and equals the required value exactly.
    pub fn is_satisfied_by<V: SubmissionValues + ?Sized>(&self, values: &V) -> bool {
        values.value(&self.watched_field_name) == Some(self.required_value.as_str())
    }
}

/// Visibility of a field carrying `rule`. No rule means always visible.
pub fn is_visible<V: SubmissionValues + ?Sized>(rule: Option<&ConditionalRule>, values: &V) -> bool {
    rule.is_none_or(|r| r.is_satisfied_by(values))
}

impl Field {
    /// Whether this field should be shown for the given submission state.
    pub fn is_visible<V: SubmissionValues + ?Sized>(&self, values: &V) -> bool {
        is_visible(self.conditional.as_ref(), values)
    }
}
