//! The task-item template used by reminder task lists.

use crate::names::NameGenerator;
use formsmith_model::{Column, ConditionalRule, Field, FieldType, FormDocument, Row};
use formsmith_types::{ColumnId, RowId};

pub(crate) const COMPLETED_YES: &str = "Yes";
pub(crate) const COMPLETED_NO: &str = "No";

/// Builds a single full-width row holding one task item: a description,
/// a required Yes/No completed question, and a reason field shown only when
/// the answer is No.
///
/// All three fields map to `task_item.<row id>.<part>`. Machine names are
/// unique against `document`.
pub fn task_item(names: &mut NameGenerator, document: &FormDocument) -> Row {
    let row_id = RowId::new();
    let mapping = |part: &str| format!("task_item.{row_id}.{part}");
    let taken = |name: &str| document.contains_name(name);

    let description = Field::new(
        FieldType::Text,
        names.unique("task_description", taken),
        "Task",
    )
    .with_placeholder("Describe the task")
    .with_mapping(mapping("description"));

    let completed_name = names.unique("task_completed", taken);
    let completed = Field::new(FieldType::Radio, completed_name.clone(), "Completed?")
        .with_options([COMPLETED_YES, COMPLETED_NO])
        .with_required(true)
        .with_mapping(mapping("completed"));

    let reason = Field::new(
        FieldType::Textarea,
        names.unique("task_reason", taken),
        "Reason not completed",
    )
    .with_required(true)
    .with_conditional(ConditionalRule::new(completed_name, COMPLETED_NO))
    .with_mapping(mapping("reason"));

    Row::from_parts(
        row_id,
        vec![Column::from_parts(
            ColumnId::new(),
            vec![description, completed, reason],
        )],
    )
}
