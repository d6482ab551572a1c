use formsmith_builder::{
    BuilderConfig, DragPayload, DropOutcome, DropTarget, MoveEngine, NameGenerator,
};
use formsmith_model::{
    ConditionalRule, Field, FieldType, FormDocument, StructuralError, StyleOverride,
};
use formsmith_types::{ColumnId, FieldId, RowId};
use pretty_assertions::assert_eq;

fn engine() -> MoveEngine {
    MoveEngine::with_names(NameGenerator::seeded(6, 42), &BuilderConfig::default())
}

fn columns_of(doc: &FormDocument, row: &RowId) -> Vec<ColumnId> {
    doc.row(row)
        .unwrap()
        .columns()
        .iter()
        .map(|c| c.id().clone())
        .collect()
}

fn names_in(doc: &FormDocument, column: &ColumnId) -> Vec<String> {
    doc.column(column)
        .unwrap()
        .fields()
        .iter()
        .map(|f| f.name.clone())
        .collect()
}

// ── Palette insertion ───────────────────────────────────────────

#[test]
fn scenario_two_columns_then_collapse() {
    let mut doc = FormDocument::new("Scenario");
    let mut engine = engine();

    let row = doc.add_row(2).unwrap();
    let columns = columns_of(&doc, &row);
    assert_eq!(doc.row(&row).unwrap().column_width().to_string(), "50%");
    assert_eq!(doc.field_count(), 0);

    let outcome = engine.apply_drop(
        &mut doc,
        &DragPayload::new_field(FieldType::Text),
        Some(&DropTarget::column(columns[0].clone(), 0)),
    );
    assert!(matches!(outcome, DropOutcome::Inserted { index: 0, .. }));
    assert_eq!(doc.column(&columns[0]).unwrap().len(), 1);
    assert_eq!(doc.column(&columns[1]).unwrap().len(), 0);

    doc.change_column_count(&row, 1).unwrap();
    let after = doc.row(&row).unwrap();
    assert_eq!(after.column_count(), 1);
    assert_eq!(after.columns()[0].len(), 1);
}

#[test]
fn new_field_gets_type_prefixed_unique_name() {
    let mut doc = FormDocument::new("x");
    let mut engine = engine();
    let row = doc.add_row(1).unwrap();
    let column = columns_of(&doc, &row)[0].clone();

    for _ in 0..5 {
        engine.apply_drop(
            &mut doc,
            &DragPayload::new_field(FieldType::Email),
            Some(&DropTarget::column(column.clone(), usize::MAX)),
        );
    }
    let names = names_in(&doc, &column);
    assert_eq!(names.len(), 5);
    assert!(names.iter().all(|n| n.starts_with("email_") && n.len() == "email_".len() + 6));
    assert!(doc.validate().is_ok());
    assert_eq!(doc.fields().next().unwrap().label, "Email");
}

#[test]
fn choice_fields_seeded_with_default_options() {
    let config = BuilderConfig {
        default_options: vec!["Yes".into(), "No".into()],
        ..BuilderConfig::default()
    };
    let mut engine = MoveEngine::with_names(NameGenerator::seeded(4, 1), &config);
    let doc = FormDocument::new("x");
    assert_eq!(engine.new_field(FieldType::Radio, &doc).options, vec!["Yes", "No"]);
    assert!(engine.new_field(FieldType::Text, &doc).options.is_empty());
}

#[test]
fn palette_field_on_row_slot_creates_row() {
    let mut doc = FormDocument::new("x");
    doc.add_row(2).unwrap();
    let mut engine = engine();

    let outcome = engine.apply_drop(
        &mut doc,
        &DragPayload::new_field(FieldType::Date),
        Some(&DropTarget::row_slot(0)),
    );
    let DropOutcome::RowInserted { row_id, index } = outcome else {
        panic!("expected a new row, got {outcome:?}");
    };
    assert_eq!(index, 0);
    let row = doc.row(&row_id).unwrap();
    assert_eq!(row.column_count(), 1);
    assert_eq!(row.field_count(), 1);
    assert_eq!(doc.row_count(), 2);
}

// ── Relocation ──────────────────────────────────────────────────

#[test]
fn relocation_preserves_identity_and_attributes() {
    let mut doc = FormDocument::new("x");
    let row = doc.add_row(2).unwrap();
    let columns = columns_of(&doc, &row);
    let field = Field::new(FieldType::Select, "service", "Service")
        .with_options(["A", "B"])
        .with_conditional(ConditionalRule::new("other", "Yes"))
        .with_mapping("lead.service")
        .with_styles(StyleOverride {
            text_color: Some("#333".into()),
            ..StyleOverride::default()
        });
    let original = field.clone();
    doc.insert_field(&columns[0], 0, field).unwrap();

    let outcome = engine().apply_drop(
        &mut doc,
        &DragPayload::field(original.id.clone()),
        Some(&DropTarget::column(columns[1].clone(), 0)),
    );
    let DropOutcome::Relocated(location) = outcome else {
        panic!("expected relocation, got {outcome:?}");
    };
    assert_eq!(location.column_id, columns[1]);
    assert_eq!(location.row_id, row);
    assert_eq!(doc.field(&original.id), Some(&original));
    assert!(doc.column(&columns[0]).unwrap().is_empty());
}

#[test]
fn reorder_within_column() {
    let mut doc = FormDocument::new("x");
    let row = doc.add_row(1).unwrap();
    let column = columns_of(&doc, &row)[0].clone();
    let ids: Vec<FieldId> = ["a", "b", "c"]
        .iter()
        .map(|n| {
            let f = Field::new(FieldType::Text, *n, *n);
            let id = f.id.clone();
            doc.insert_field(&column, usize::MAX, f).unwrap();
            id
        })
        .collect();

    let mut engine = engine();
    engine.apply_drop(
        &mut doc,
        &DragPayload::field(ids[0].clone()),
        Some(&DropTarget::column(column.clone(), 2)),
    );
    assert_eq!(names_in(&doc, &column), vec!["b", "c", "a"]);

    engine.apply_drop(
        &mut doc,
        &DragPayload::field(ids[0].clone()),
        Some(&DropTarget::column(column.clone(), 0)),
    );
    assert_eq!(names_in(&doc, &column), vec!["a", "b", "c"]);
}

// ── Failure modes ───────────────────────────────────────────────

#[test]
fn drop_outside_is_cancelled() {
    let mut doc = FormDocument::new("x");
    doc.add_row(1).unwrap();
    let before = doc.clone();
    let outcome = engine().apply_drop(&mut doc, &DragPayload::new_field(FieldType::Text), None);
    assert_eq!(outcome, DropOutcome::Cancelled);
    assert!(!outcome.is_mutation());
    assert_eq!(doc, before);
}

#[test]
fn drop_on_removed_column_is_absorbed() {
    let mut doc = FormDocument::new("x");
    let row = doc.add_row(2).unwrap();
    let columns = columns_of(&doc, &row);
    let field = Field::new(FieldType::Text, "a", "A");
    let field_id = field.id.clone();
    doc.insert_field(&columns[0], 0, field).unwrap();

    let stale = columns[1].clone();
    doc.change_column_count(&row, 2).unwrap();
    let before = doc.clone();

    let mut engine = engine();
    let outcome = engine.apply_drop(
        &mut doc,
        &DragPayload::field(field_id.clone()),
        Some(&DropTarget::column(stale.clone(), 0)),
    );
    assert_eq!(outcome, DropOutcome::Absorbed(StructuralError::ColumnNotFound(stale.clone())));
    assert_eq!(doc, before);

    let outcome = engine.apply_drop(
        &mut doc,
        &DragPayload::new_field(FieldType::Text),
        Some(&DropTarget::column(stale, 0)),
    );
    assert!(matches!(outcome, DropOutcome::Absorbed(StructuralError::ColumnNotFound(_))));
    assert_eq!(doc, before);
}

#[test]
fn drop_of_removed_field_is_absorbed() {
    let mut doc = FormDocument::new("x");
    let row = doc.add_row(1).unwrap();
    let column = columns_of(&doc, &row)[0].clone();
    let gone = FieldId::new();
    let outcome = engine().apply_drop(
        &mut doc,
        &DragPayload::field(gone.clone()),
        Some(&DropTarget::column(column, 0)),
    );
    assert_eq!(outcome, DropOutcome::Absorbed(StructuralError::FieldNotFound(gone)));
}

#[test]
fn mismatched_targets_cancel() {
    let mut doc = FormDocument::new("x");
    let row = doc.add_row(1).unwrap();
    let column = columns_of(&doc, &row)[0].clone();
    let mut engine = engine();

    let outcome = engine.apply_drop(
        &mut doc,
        &DragPayload::row(row.clone()),
        Some(&DropTarget::column(column, 0)),
    );
    assert_eq!(outcome, DropOutcome::Cancelled);

    let outcome = engine.apply_drop(
        &mut doc,
        &DragPayload::field(FieldId::new()),
        Some(&DropTarget::row_slot(0)),
    );
    assert_eq!(outcome, DropOutcome::Cancelled);
}

// ── Rows ────────────────────────────────────────────────────────

#[test]
fn row_drop_reorders() {
    let mut doc = FormDocument::new("x");
    let a = doc.add_row(1).unwrap();
    let b = doc.add_row(2).unwrap();
    let c = doc.add_row(3).unwrap();

    let outcome = engine().apply_drop(
        &mut doc,
        &DragPayload::row(a.clone()),
        Some(&DropTarget::row_slot(2)),
    );
    assert_eq!(outcome, DropOutcome::RowMoved { row_id: a.clone(), index: 2 });
    let order: Vec<_> = doc.rows().map(|r| r.id().clone()).collect();
    assert_eq!(order, vec![b, c, a]);
}

#[test]
fn removed_row_drop_is_absorbed() {
    let mut doc = FormDocument::new("x");
    let row = doc.add_row(1).unwrap();
    doc.remove_row(&row);
    let outcome = engine().apply_drop(
        &mut doc,
        &DragPayload::row(row.clone()),
        Some(&DropTarget::row_slot(0)),
    );
    assert_eq!(outcome, DropOutcome::Absorbed(StructuralError::RowNotFound(row)));
}

// ── Task items ──────────────────────────────────────────────────

#[test]
fn task_item_drop_inserts_full_width_row() {
    let mut doc = FormDocument::new("Checks");
    let first = doc.add_row(2).unwrap();
    doc.add_row(1).unwrap();
    let column = columns_of(&doc, &first)[1].clone();

    let outcome = engine().apply_drop(
        &mut doc,
        &DragPayload::task_item(),
        Some(&DropTarget::column(column, 0)),
    );
    let DropOutcome::RowInserted { row_id, index } = outcome else {
        panic!("expected a task item row, got {outcome:?}");
    };
    assert_eq!(index, 1);

    let row = doc.row(&row_id).unwrap();
    assert_eq!(row.column_count(), 1);
    assert_eq!(row.column_width().to_string(), "100%");
    let fields = row.columns()[0].fields();
    assert_eq!(fields.len(), 3);

    let (description, completed, reason) = (&fields[0], &fields[1], &fields[2]);
    assert_eq!(description.field_type, FieldType::Text);
    assert_eq!(completed.field_type, FieldType::Radio);
    assert_eq!(completed.options, vec!["Yes", "No"]);
    assert_eq!(
        reason.conditional,
        Some(ConditionalRule::new(completed.name.clone(), "No"))
    );
    assert_eq!(
        description.mapping.as_deref(),
        Some(format!("task_item.{row_id}.description").as_str())
    );
    assert_eq!(
        reason.mapping.as_deref(),
        Some(format!("task_item.{row_id}.reason").as_str())
    );
    assert!(doc.dangling_references().is_empty());
}
