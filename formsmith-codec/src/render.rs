//! Read-side helpers for renderers consuming a [`SchemaDoc`].
//!
//! The builder preview, the standalone renderer and the public embed all
//! decide what to show by evaluating each field's conditional rule against
//! the live submission values.

use crate::schema::{SchemaDoc, SchemaField, SchemaRow};
use formsmith_model::{SubmissionValues, is_visible};

const TASK_ITEM_PREFIX: &str = "task_item.";

impl SchemaField {
    /// Whether this field is shown for the given submission values.
    pub fn is_visible<V: SubmissionValues + ?Sized>(&self, values: &V) -> bool {
        is_visible(self.conditional.as_ref(), values)
    }

    /// The `(id, part)` segments of a `task_item.<id>.<part>` mapping.
    fn task_item_part(&self) -> Option<(&str, &str)> {
        let rest = self.mapping.as_deref()?.strip_prefix(TASK_ITEM_PREFIX)?;
        rest.split_once('.')
    }
}

/// One task item as the staff task-list view sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskItemView<'a> {
    /// Id segment of the task-item mappings.
    pub item_id: &'a str,
    pub description: &'a SchemaField,
    pub completed: &'a SchemaField,
    pub reason: Option<&'a SchemaField>,
}

impl SchemaDoc {
    /// Fields to display, in document order.
    pub fn visible_fields<V: SubmissionValues + ?Sized>(&self, values: &V) -> Vec<&SchemaField> {
        self.fields().filter(|f| f.is_visible(values)).collect()
    }

    /// Required fields that are visible but have no non-blank value.
    ///
    /// Hidden required fields are never reported.
    pub fn missing_required<V: SubmissionValues + ?Sized>(&self, values: &V) -> Vec<&SchemaField> {
        self.fields()
            .filter(|f| f.required && f.is_visible(values))
            .filter(|f| values.value(&f.name).is_none_or(|v| v.trim().is_empty()))
            .collect()
    }

    /// Task items found in the document, one per row holding a description
    /// and a completed field mapped under the same `task_item.<id>` prefix.
    pub fn task_items(&self) -> Vec<TaskItemView<'_>> {
        self.schema.iter().filter_map(task_item_in_row).collect()
    }
}

fn task_item_in_row(row: &SchemaRow) -> Option<TaskItemView<'_>> {
    let mut item_id = None;
    let mut description = None;
    let mut completed = None;
    let mut reason = None;

    for field in row.columns.iter().flat_map(|c| c.fields.iter()) {
        let Some((id, part)) = field.task_item_part() else {
            continue;
        };
        if *item_id.get_or_insert(id) != id {
            continue;
        }
        match part {
            "description" => description = Some(field),
            "completed" => completed = Some(field),
            "reason" => reason = Some(field),
            _ => {}
        }
    }

    Some(TaskItemView {
        item_id: item_id?,
        description: description?,
        completed: completed?,
        reason,
    })
}
