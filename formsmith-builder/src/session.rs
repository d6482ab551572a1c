//! The editing session.
//!
//! Every user action runs against a clone of the current document and, if it
//! changed anything, the clone becomes the new current snapshot. Cloning is
//! cheap because rows are shared until touched, so the previous snapshot goes
//! straight onto the undo stack.
//!
//! Persistence is the only asynchronous boundary. Loads are sequenced by
//! ticket so that only the newest request can replace the document; saves are
//! gated so that a second save cannot start while one is in flight. A save
//! that completes after a different form was loaded only reports its result.

use crate::config::BuilderConfig;
use crate::drag::{DragController, DragTransition};
use crate::engine::{DropOutcome, MoveEngine};
use crate::error::{SessionError, SessionResult};
use crate::payload::{DragPayload, DropTarget};
use formsmith_codec::{serialize, SchemaDoc};
use formsmith_model::{
    DanglingReference, EditError, EditResult, Field, FieldPatch, FieldType, FormDocument,
    FormPurpose, GlobalStyleSet, Row, StructuralError,
};
use formsmith_store::{load_document, FormStore, PersistenceResult};
use formsmith_types::{ColumnId, FieldId, FormId, RowId};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Identifies one load request. Only the most recently issued ticket can
/// complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued; this result was discarded.
    Stale,
    /// The load failed; the previous document is intact.
    Failed,
}

/// A save in flight: the exact snapshot being written.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    pub form_id: Option<FormId>,
    pub schema: SchemaDoc,
    document: FormDocument,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    Persistence,
}

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug)]
pub struct EditorSession {
    config: BuilderConfig,
    document: FormDocument,
    form_id: Option<FormId>,
    /// Snapshot last loaded or saved; `None` for a never-saved document.
    saved: Option<FormDocument>,
    undo: VecDeque<FormDocument>,
    redo: Vec<FormDocument>,
    engine: MoveEngine,
    drag: DragController,
    load_counter: u64,
    pending_load: Option<LoadTicket>,
    /// Bumped whenever a load replaces the document.
    generation: u64,
    save_in_flight: bool,
    notices: Vec<Notice>,
    notice_counter: u64,
}

impl EditorSession {
    pub fn new(config: BuilderConfig) -> Self {
        Self::with_document(config, FormDocument::default())
    }

    /// A session editing an unsaved document.
    pub fn with_document(config: BuilderConfig, document: FormDocument) -> Self {
        let engine = MoveEngine::new(&config);
        Self::with_engine(config, engine, document)
    }

    pub fn with_engine(config: BuilderConfig, engine: MoveEngine, document: FormDocument) -> Self {
        Self {
            config,
            document,
            form_id: None,
            saved: None,
            undo: VecDeque::new(),
            redo: Vec::new(),
            engine,
            drag: DragController::new(),
            load_counter: 0,
            pending_load: None,
            generation: 0,
            save_in_flight: false,
            notices: Vec::new(),
            notice_counter: 0,
        }
    }

    // ── State ────────────────────────────────────────────────────

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn form_id(&self) -> Option<&FormId> {
        self.form_id.as_ref()
    }

    /// True when the document differs from the last loaded or saved snapshot.
    /// A document that was never saved is dirty once it has any content or name.
    pub fn is_dirty(&self) -> bool {
        match &self.saved {
            Some(saved) => *saved != self.document,
            None => self.document != FormDocument::default(),
        }
    }

    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        self.document.dangling_references()
    }

    // ── History ──────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.document, previous);
        self.redo.push(current);
        debug!("Undo ({} steps left)", self.undo.len());
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.document, next);
        self.push_undo(current);
        debug!("Redo ({} steps left)", self.redo.len());
        true
    }

    fn push_undo(&mut self, snapshot: FormDocument) {
        if self.config.history_limit == 0 {
            return;
        }
        self.undo.push_back(snapshot);
        while self.undo.len() > self.config.history_limit {
            self.undo.pop_front();
        }
    }

    /// Runs `edit` on a copy of the document and commits the copy when the
    /// edit succeeds and changed something.
    fn commit<T, E>(
        &mut self,
        edit: impl FnOnce(&mut FormDocument) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut next = self.document.clone();
        let value = edit(&mut next)?;
        if next != self.document {
            let previous = std::mem::replace(&mut self.document, next);
            self.push_undo(previous);
            self.redo.clear();
        }
        Ok(value)
    }

    fn apply(&mut self, edit: impl FnOnce(&mut FormDocument)) {
        let Ok(()) = self.commit(|doc| {
            edit(doc);
            Ok::<_, Infallible>(())
        });
    }

    /// Structural failures are absorbed; validation failures become notices.
    fn report<T>(&mut self, result: EditResult<T>) -> EditResult<T> {
        match &result {
            Err(EditError::Structural(e)) => debug!("Edit absorbed: {e}"),
            Err(EditError::Validation(e)) => {
                let message = e.to_string();
                self.push_notice(NoticeKind::Validation, message);
            }
            Ok(_) => {}
        }
        result
    }

    // ── Document edits ───────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.apply(|doc| doc.name = name);
    }

    pub fn set_purpose(&mut self, purpose: FormPurpose) {
        self.apply(|doc| doc.purpose = purpose);
    }

    pub fn set_styles(&mut self, styles: GlobalStyleSet) {
        self.apply(|doc| doc.styles = styles);
    }

    pub fn add_row(&mut self, column_count: usize) -> Result<RowId, StructuralError> {
        let column_count = self.check_column_count(column_count)?;
        self.commit(|doc| doc.add_row(column_count))
    }

    pub fn insert_row(&mut self, index: usize, row: Row) -> EditResult<RowId> {
        let result = self.commit(|doc| doc.insert_row(index, row));
        self.report(result)
    }

    pub fn remove_row(&mut self, row_id: &RowId) -> Option<Row> {
        self.commit(|doc| doc.remove_row(row_id).ok_or(())).ok()
    }

    pub fn move_row(&mut self, row_id: &RowId, to_index: usize) -> Result<usize, StructuralError> {
        self.commit(|doc| doc.move_row(row_id, to_index))
    }

    pub fn change_column_count(
        &mut self,
        row_id: &RowId,
        column_count: usize,
    ) -> Result<(), StructuralError> {
        let column_count = self.check_column_count(column_count)?;
        self.commit(|doc| doc.change_column_count(row_id, column_count))
    }

    fn check_column_count(&self, column_count: usize) -> Result<usize, StructuralError> {
        if column_count == 0 || column_count > self.config.max_columns {
            return Err(StructuralError::InvalidColumnCount(column_count));
        }
        Ok(column_count)
    }

    pub fn insert_field(
        &mut self,
        column_id: &ColumnId,
        index: usize,
        field: Field,
    ) -> EditResult<usize> {
        let result = self.commit(|doc| doc.insert_field(column_id, index, field));
        self.report(result)
    }

    /// Creates a palette field of `field_type` with a generated machine name.
    pub fn add_field(
        &mut self,
        column_id: &ColumnId,
        index: usize,
        field_type: FieldType,
    ) -> EditResult<FieldId> {
        let field = self.engine.new_field(field_type, &self.document);
        let id = field.id.clone();
        self.insert_field(column_id, index, field).map(|_| id)
    }

    pub fn remove_field(&mut self, field_id: &FieldId) -> Option<Field> {
        self.commit(|doc| doc.remove_field(field_id).ok_or(())).ok()
    }

    pub fn update_field(&mut self, field_id: &FieldId, patch: &FieldPatch) -> EditResult<()> {
        let result = self.commit(|doc| doc.update_field(field_id, patch));
        self.report(result)
    }

    // ── Drag and drop ────────────────────────────────────────────

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn begin_drag(&mut self, payload: DragPayload) -> DragTransition {
        self.drag.begin(payload)
    }

    pub fn hover(&mut self, target: Option<DropTarget>) -> DragTransition {
        self.drag.hover(target)
    }

    /// Ends the drag; a successful drop is one undoable step.
    pub fn drop(&mut self) -> DragTransition {
        let mut next = self.document.clone();
        let transition = self.drag.drop(&mut self.engine, &mut next);
        match transition.outcome() {
            Some(outcome) if outcome.is_mutation() => {
                let previous = std::mem::replace(&mut self.document, next);
                self.push_undo(previous);
                self.redo.clear();
            }
            Some(outcome) => self.report_drop(outcome),
            None => {}
        }
        transition
    }

    fn report_drop(&mut self, outcome: &DropOutcome) {
        if let DropOutcome::Rejected(e) = outcome {
            self.push_notice(NoticeKind::Validation, e.to_string());
        }
    }

    pub fn cancel_drag(&mut self) -> DragTransition {
        self.drag.cancel()
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Starts a load. Any earlier ticket still outstanding becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_counter += 1;
        let ticket = LoadTicket(self.load_counter);
        if let Some(previous) = self.pending_load.replace(ticket) {
            debug!("Load {:?} superseded by {:?}", previous, ticket);
        }
        ticket
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Applies a load result if `ticket` is still the newest request.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        form_id: FormId,
        result: PersistenceResult<FormDocument>,
    ) -> LoadOutcome {
        if self.pending_load != Some(ticket) {
            warn!("Discarding stale load result for form {}", form_id);
            return LoadOutcome::Stale;
        }
        self.pending_load = None;

        match result {
            Ok(document) => {
                info!("Loaded form {} into session", form_id);
                self.document = document.clone();
                self.saved = Some(document);
                self.form_id = Some(form_id);
                self.generation += 1;
                self.undo.clear();
                self.redo.clear();
                self.drag.cancel();
                LoadOutcome::Applied
            }
            Err(e) => {
                warn!("Failed to load form {}: {e}", form_id);
                self.push_notice(NoticeKind::Persistence, format!("Could not load form: {e}"));
                LoadOutcome::Failed
            }
        }
    }

    // ── Saving ───────────────────────────────────────────────────

    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    /// Validates and snapshots the document for saving.
    pub fn begin_save(&mut self) -> SessionResult<SaveTicket> {
        if self.save_in_flight {
            return Err(SessionError::SaveInProgress);
        }
        if let Err(errors) = self.document.validate() {
            for error in &errors {
                self.push_notice(NoticeKind::Validation, error.to_string());
            }
            return Err(SessionError::Validation(errors));
        }
        self.save_in_flight = true;
        Ok(SaveTicket {
            form_id: self.form_id.clone(),
            schema: serialize(&self.document),
            document: self.document.clone(),
            generation: self.generation,
        })
    }

    /// Records the result of a save. The document itself is never touched,
    /// and if another form was loaded meanwhile the session keeps that form's
    /// id and saved snapshot.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: PersistenceResult<FormId>,
    ) -> SessionResult<FormId> {
        self.save_in_flight = false;
        match result {
            Ok(id) if ticket.generation != self.generation => {
                info!(
                    "Saved form {} ({:?}) after another form was loaded",
                    id, ticket.schema.name
                );
                Ok(id)
            }
            Ok(id) => {
                info!("Saved form {} ({:?})", id, ticket.schema.name);
                self.saved = Some(ticket.document);
                self.form_id = Some(id.clone());
                Ok(id)
            }
            Err(e) => {
                warn!("Failed to save form: {e}");
                self.push_notice(NoticeKind::Persistence, format!("Could not save form: {e}"));
                Err(e.into())
            }
        }
    }

    // ── Notices ──────────────────────────────────────────────────

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    fn push_notice(&mut self, kind: NoticeKind, message: String) {
        self.notice_counter += 1;
        self.notices.push(Notice {
            id: self.notice_counter,
            kind,
            message,
        });
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

/// Loads `form_id` from `store` into a shared session. The lock is not held
/// while the store is awaited, so a later call supersedes this one.
pub async fn load_from<S: FormStore + ?Sized>(
    session: &Arc<Mutex<EditorSession>>,
    store: &S,
    form_id: FormId,
) -> LoadOutcome {
    let ticket = session.lock().await.begin_load();
    let result = load_document(store, &form_id).await;
    session.lock().await.complete_load(ticket, form_id, result)
}

/// Saves a shared session's document to `store`.
pub async fn save_to<S: FormStore + ?Sized>(
    session: &Arc<Mutex<EditorSession>>,
    store: &S,
) -> SessionResult<FormId> {
    let ticket = session.lock().await.begin_save()?;
    let result = store.save(ticket.form_id.as_ref(), &ticket.schema).await;
    session.lock().await.complete_save(ticket, result)
}
