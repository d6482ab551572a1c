//! Interactive editing layer for formsmith documents.
//!
//! An [`EditorSession`] owns the document being edited and applies every
//! user action as one whole-snapshot transition, which gives undo/redo and
//! dirty tracking for free. Drag and drop goes through a [`DragController`]
//! whose hover steps never touch the document; only the drop hands a payload
//! to the [`MoveEngine`].

pub mod config;
pub mod drag;
pub mod engine;
mod error;
pub mod hover;
pub mod names;
pub mod payload;
pub mod session;
pub mod template;

pub use config::{BuilderConfig, ConfigError, ConfigResult};
pub use drag::{DragController, DragEffect, DragNoopReason, DragPhase, DragState, DragTransition};
pub use engine::{DropOutcome, MoveEngine};
pub use error::{SessionError, SessionResult};
pub use hover::{hover_decision, Axis, HoverDecision, HoverGeometry, Point, Rect};
pub use names::NameGenerator;
pub use payload::{DragPayload, DropTarget, PaletteItem};
pub use session::{
    load_from, save_to, EditorSession, LoadOutcome, LoadTicket, Notice, NoticeKind, SaveTicket,
};
pub use template::task_item;
