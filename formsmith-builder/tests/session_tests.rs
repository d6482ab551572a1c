use async_trait::async_trait;
use formsmith_builder::{
    load_from, save_to, BuilderConfig, DragPayload, DropTarget, EditorSession, LoadOutcome,
    MoveEngine, NameGenerator, NoticeKind, SessionError,
};
use formsmith_codec::SchemaDoc;
use formsmith_model::{
    EditError, FieldPatch, FieldType, FormDocument, FormPurpose, StructuralError, ValidationError,
};
use formsmith_store::{
    save_document, FormStore, FormSummary, MemoryFormStore, PersistenceError, PersistenceResult,
};
use formsmith_types::{ColumnId, FormId, RowId};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

fn session() -> EditorSession {
    let config = BuilderConfig::default();
    let engine = MoveEngine::with_names(NameGenerator::seeded(6, 11), &config);
    EditorSession::with_engine(config, engine, FormDocument::new("Booking"))
}

fn first_column(session: &EditorSession, row: &RowId) -> ColumnId {
    session.document().row(row).unwrap().columns()[0].id().clone()
}

/// Fails every call.
struct FailingStore;

#[async_trait]
impl FormStore for FailingStore {
    async fn save(&self, _: Option<&FormId>, _: &SchemaDoc) -> PersistenceResult<FormId> {
        Err(PersistenceError::Backend("offline".into()))
    }
    async fn load(&self, id: &FormId) -> PersistenceResult<SchemaDoc> {
        Err(PersistenceError::NotFound(id.clone()))
    }
    async fn list(&self) -> PersistenceResult<Vec<FormSummary>> {
        Err(PersistenceError::Backend("offline".into()))
    }
    async fn delete(&self, _: &FormId) -> PersistenceResult<()> {
        Err(PersistenceError::Backend("offline".into()))
    }
}

/// Delays loads of one particular id.
struct SlowStore {
    inner: MemoryFormStore,
    slow: FormId,
}

#[async_trait]
impl FormStore for SlowStore {
    async fn save(&self, id: Option<&FormId>, schema: &SchemaDoc) -> PersistenceResult<FormId> {
        self.inner.save(id, schema).await
    }
    async fn load(&self, id: &FormId) -> PersistenceResult<SchemaDoc> {
        if id == &self.slow {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.inner.load(id).await
    }
    async fn list(&self) -> PersistenceResult<Vec<FormSummary>> {
        self.inner.list().await
    }
    async fn delete(&self, id: &FormId) -> PersistenceResult<()> {
        self.inner.delete(id).await
    }
}

// ── History ─────────────────────────────────────────────────────

#[test]
fn undo_and_redo_walk_snapshots() {
    let mut s = session();
    let start = s.document().clone();
    let row = s.add_row(2).unwrap();
    let column = first_column(&s, &row);
    s.add_field(&column, 0, FieldType::Text).unwrap();
    let full = s.document().clone();

    assert!(s.undo());
    assert_eq!(s.document().field_count(), 0);
    assert!(s.undo());
    assert_eq!(s.document(), &start);
    assert!(!s.undo());

    assert!(s.redo());
    assert!(s.redo());
    assert_eq!(s.document(), &full);
    assert!(!s.can_redo());
}

#[test]
fn new_edit_clears_redo() {
    let mut s = session();
    s.add_row(1).unwrap();
    s.undo();
    assert!(s.can_redo());
    s.set_name("Renamed");
    assert!(!s.can_redo());
}

#[test]
fn history_is_bounded() {
    let config = BuilderConfig {
        history_limit: 3,
        ..BuilderConfig::default()
    };
    let mut s = EditorSession::with_document(config, FormDocument::new("x"));
    for _ in 0..10 {
        s.add_row(1).unwrap();
    }
    let mut steps = 0;
    while s.undo() {
        steps += 1;
    }
    assert_eq!(steps, 3);
    assert_eq!(s.document().row_count(), 7);
}

#[test]
fn no_op_edits_leave_no_history() {
    let mut s = session();
    let missing = RowId::new();
    assert_eq!(
        s.move_row(&missing, 0),
        Err(StructuralError::RowNotFound(missing.clone()))
    );
    assert!(s.remove_row(&missing).is_none());
    s.set_name("Booking");
    assert!(!s.can_undo());
    assert!(s.notices().is_empty());
}

// ── Edits ───────────────────────────────────────────────────────

#[test]
fn column_count_limited_by_config() {
    let mut s = session();
    assert_eq!(s.add_row(5), Err(StructuralError::InvalidColumnCount(5)));
    assert_eq!(s.add_row(0), Err(StructuralError::InvalidColumnCount(0)));
    let row = s.add_row(4).unwrap();
    assert_eq!(
        s.change_column_count(&row, 9),
        Err(StructuralError::InvalidColumnCount(9))
    );
    s.change_column_count(&row, 1).unwrap();
    assert_eq!(s.document().row(&row).unwrap().column_count(), 1);
}

#[test]
fn colliding_rename_is_rejected_with_notice() {
    let mut s = session();
    let row = s.add_row(1).unwrap();
    let column = first_column(&s, &row);
    let a = s.add_field(&column, 0, FieldType::Text).unwrap();
    let b = s.add_field(&column, 1, FieldType::Text).unwrap();
    let a_name = s.document().field(&a).unwrap().name.clone();
    let b_name = s.document().field(&b).unwrap().name.clone();
    let history_before = s.can_undo();

    let err = s
        .update_field(&b, &FieldPatch::new().with_name(a_name.clone()).with_label("B"))
        .unwrap_err();
    assert_eq!(err, EditError::from(ValidationError::DuplicateFieldName(a_name)));
    assert_eq!(s.document().field(&b).unwrap().name, b_name);
    assert_eq!(s.document().field(&b).unwrap().label, "Text Field");
    assert_eq!(s.notices().len(), 1);
    assert_eq!(s.notices()[0].kind, NoticeKind::Validation);
    assert_eq!(s.can_undo(), history_before);
}

#[test]
fn structural_failures_are_silent() {
    let mut s = session();
    let err = s.add_field(&ColumnId::new(), 0, FieldType::Email).unwrap_err();
    assert!(err.is_structural());
    assert!(s.notices().is_empty());
}

#[test]
fn drop_is_one_undo_step() {
    let mut s = session();
    let row = s.add_row(1).unwrap();
    let column = first_column(&s, &row);

    s.begin_drag(DragPayload::task_item());
    s.hover(Some(DropTarget::column(column.clone(), 0)));
    s.hover(Some(DropTarget::row_slot(1)));
    assert_eq!(s.document().row_count(), 1);
    let t = s.drop();
    assert!(t.outcome().is_some_and(|o| o.is_mutation()));
    assert_eq!(s.document().row_count(), 2);
    assert_eq!(s.document().field_count(), 3);

    assert!(s.undo());
    assert_eq!(s.document().row_count(), 1);
}

#[test]
fn cancelled_drag_changes_nothing() {
    let mut s = session();
    s.add_row(1).unwrap();
    let before = s.document().clone();
    s.begin_drag(DragPayload::new_field(FieldType::Text));
    s.hover(Some(DropTarget::row_slot(0)));
    s.cancel_drag();
    assert_eq!(s.document(), &before);

    s.begin_drag(DragPayload::new_field(FieldType::Text));
    let t = s.drop();
    assert!(t.outcome().is_some_and(|o| !o.is_mutation()));
    assert_eq!(s.document(), &before);
}

// ── Dirty tracking ──────────────────────────────────────────────

#[test]
fn fresh_session_is_clean() {
    assert!(!EditorSession::default().is_dirty());
    assert!(session().is_dirty());
}

#[tokio::test]
async fn save_marks_clean_and_edit_marks_dirty() {
    let store = MemoryFormStore::new();
    let shared = Arc::new(Mutex::new(session()));
    let id = save_to(&shared, &store).await.unwrap();

    let mut s = shared.lock().await;
    assert_eq!(s.form_id(), Some(&id));
    assert!(!s.is_dirty());
    s.set_purpose(FormPurpose::CustomerQuote);
    assert!(s.is_dirty());
    s.undo();
    assert!(!s.is_dirty());
}

// ── Saving ──────────────────────────────────────────────────────

#[test]
fn save_blocked_while_in_flight() {
    let mut s = session();
    let ticket = s.begin_save().unwrap();
    assert!(s.is_saving());
    assert!(matches!(s.begin_save(), Err(SessionError::SaveInProgress)));

    let id = FormId::new();
    assert_eq!(s.complete_save(ticket, Ok(id.clone())).unwrap(), id);
    assert!(!s.is_saving());
    assert!(s.begin_save().is_ok());
}

#[test]
fn save_requires_valid_document() {
    let mut s = EditorSession::default();
    s.set_name("   ");
    let err = s.begin_save().unwrap_err();
    let SessionError::Validation(errors) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(errors, vec![ValidationError::EmptyDocumentName]);
    assert!(!s.is_saving());
    assert_eq!(s.notices()[0].kind, NoticeKind::Validation);
}

#[tokio::test]
async fn failed_save_keeps_document_and_reports() {
    let shared = Arc::new(Mutex::new(session()));
    {
        let mut s = shared.lock().await;
        let row = s.add_row(1).unwrap();
        let column = first_column(&s, &row);
        s.add_field(&column, 0, FieldType::Email).unwrap();
    }
    let before = shared.lock().await.document().clone();

    let err = save_to(&shared, &FailingStore).await.unwrap_err();
    assert!(matches!(err, SessionError::Persistence(PersistenceError::Backend(_))));

    let mut s = shared.lock().await;
    assert_eq!(s.document(), &before);
    assert!(s.is_dirty());
    assert!(!s.is_saving());
    assert!(s.form_id().is_none());
    let notice = s.notices()[0].clone();
    assert_eq!(notice.kind, NoticeKind::Persistence);
    assert!(s.dismiss_notice(notice.id));
    assert!(!s.dismiss_notice(notice.id));
    assert!(s.notices().is_empty());
}

#[test]
fn edits_during_save_stay_dirty() {
    let mut s = session();
    let ticket = s.begin_save().unwrap();
    s.add_row(1).unwrap();
    s.complete_save(ticket, Ok(FormId::new())).unwrap();
    assert!(s.is_dirty());
}

#[test]
fn save_through_blocking_runtime() {
    let store = MemoryFormStore::new();
    let shared = Arc::new(Mutex::new(session()));
    let id = tokio_test::block_on(save_to(&shared, &store)).unwrap();
    let stored = tokio_test::block_on(store.load(&id)).unwrap();
    assert_eq!(stored.name, "Booking");
}

// ── Loading ─────────────────────────────────────────────────────

#[test]
fn only_newest_ticket_applies() {
    let mut s = session();
    let first = s.begin_load();
    let second = s.begin_load();

    let doc_a = FormDocument::new("A");
    let doc_b = FormDocument::new("B");
    assert_eq!(
        s.complete_load(second, FormId::from_string("b"), Ok(doc_b.clone())),
        LoadOutcome::Applied
    );
    assert_eq!(
        s.complete_load(first, FormId::from_string("a"), Ok(doc_a)),
        LoadOutcome::Stale
    );
    assert_eq!(s.document(), &doc_b);
    assert_eq!(s.form_id().map(FormId::as_str), Some("b"));
    assert!(!s.is_loading());
}

#[test]
fn stale_result_discarded_even_if_it_arrives_first() {
    let mut s = session();
    let first = s.begin_load();
    let second = s.begin_load();
    assert_eq!(
        s.complete_load(first, FormId::new(), Ok(FormDocument::new("old"))),
        LoadOutcome::Stale
    );
    assert_eq!(s.document().name, "Booking");
    assert!(s.is_loading());
    assert_eq!(
        s.complete_load(second, FormId::new(), Ok(FormDocument::new("new"))),
        LoadOutcome::Applied
    );
    assert_eq!(s.document().name, "new");
}

#[test]
fn failed_load_keeps_previous_document() {
    let mut s = session();
    s.add_row(1).unwrap();
    let before = s.document().clone();
    let ticket = s.begin_load();
    let id = FormId::new();
    let outcome = s.complete_load(ticket, id.clone(), Err(PersistenceError::NotFound(id)));
    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(s.document(), &before);
    assert!(s.can_undo());
    assert_eq!(s.notices()[0].kind, NoticeKind::Persistence);
}

#[test]
fn load_resets_history() {
    let mut s = session();
    s.add_row(1).unwrap();
    let ticket = s.begin_load();
    s.complete_load(ticket, FormId::new(), Ok(FormDocument::new("Loaded")));
    assert!(!s.can_undo());
    assert!(!s.is_dirty());
}

#[test]
fn save_finishing_after_load_keeps_loaded_form() {
    let mut s = session();
    s.set_name("Form A");
    let save = s.begin_save().unwrap();

    let ticket = s.begin_load();
    let loaded = FormDocument::new("Form B");
    let outcome = s.complete_load(ticket, FormId::from_string("form-b"), Ok(loaded.clone()));
    assert_eq!(outcome, LoadOutcome::Applied);

    let saved = s.complete_save(save, Ok(FormId::from_string("form-a"))).unwrap();
    assert_eq!(saved.as_str(), "form-a");
    assert_eq!(s.document(), &loaded);
    assert_eq!(s.form_id().map(FormId::as_str), Some("form-b"));
    assert!(!s.is_dirty());
    assert!(!s.is_saving());
}

#[tokio::test]
async fn save_after_unrelated_load_targets_loaded_form() {
    let store = MemoryFormStore::new();
    let other = save_document(&store, None, &FormDocument::new("Other")).await.unwrap();
    let mut s = session();
    let save = s.begin_save().unwrap();
    let ticket = s.begin_load();
    s.complete_load(ticket, other.clone(), Ok(FormDocument::new("Other")));
    let first = store.save(save.form_id.as_ref(), &save.schema).await;
    s.complete_save(save, first).unwrap();

    s.set_purpose(FormPurpose::CustomerQuote);
    let next = s.begin_save().unwrap();
    assert_eq!(next.form_id.as_ref(), Some(&other));
}

#[tokio::test]
async fn concurrent_loads_last_request_wins() {
    let inner = MemoryFormStore::new();
    let slow = save_document(&inner, None, &FormDocument::new("Slow")).await.unwrap();
    let fast = save_document(&inner, None, &FormDocument::new("Fast")).await.unwrap();
    let store = Arc::new(SlowStore {
        inner,
        slow: slow.clone(),
    });
    let shared = Arc::new(Mutex::new(session()));

    let first = {
        let (shared, store) = (shared.clone(), store.clone());
        tokio::spawn(async move { load_from(&shared, store.as_ref(), slow).await })
    };
    // Let the first request take its ticket before the second is issued.
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = load_from(&shared, store.as_ref(), fast.clone()).await;

    assert_eq!(second, LoadOutcome::Applied);
    assert_eq!(first.await.unwrap(), LoadOutcome::Stale);
    let s = shared.lock().await;
    assert_eq!(s.document().name, "Fast");
    assert_eq!(s.form_id(), Some(&fast));
}

#[tokio::test]
async fn load_from_missing_form_fails_softly() {
    let shared = Arc::new(Mutex::new(session()));
    let outcome = load_from(&shared, &MemoryFormStore::new(), FormId::new()).await;
    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(shared.lock().await.document().name, "Booking");
}
