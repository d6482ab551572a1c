//! Drag lifecycle.
//!
//! ```text
//! Idle -> Dragging -> (Hovering)* -> Dropped | Cancelled -> Idle
//! ```
//!
//! Hover steps only record the pending target. The drop is the single step
//! that mutates the document, through [`MoveEngine::apply_drop`]. Events that
//! make no sense in the current state are reported as no-ops rather than
//! errors.

use crate::engine::{DropOutcome, MoveEngine};
use crate::payload::{DragPayload, DropTarget};
use formsmith_model::FormDocument;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        payload: DragPayload,
    },
    Hovering {
        payload: DragPayload,
        target: DropTarget,
    },
}

/// [`DragState`] without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Hovering,
}

impl DragState {
    pub fn phase(&self) -> DragPhase {
        match self {
            DragState::Idle => DragPhase::Idle,
            DragState::Dragging { .. } => DragPhase::Dragging,
            DragState::Hovering { .. } => DragPhase::Hovering,
        }
    }
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    DragAlreadyInProgress,
    TargetUnchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    Started { payload: DragPayload },
    /// The pending target changed; `None` means the pointer left every zone.
    TargetChanged { target: Option<DropTarget> },
    Dropped(DropOutcome),
    Cancelled,
    Noop { reason: DragNoopReason },
}

/// One lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragPhase,
    pub to: DragPhase,
    pub effect: DragEffect,
}

impl DragTransition {
    /// The drop outcome, if this step was a drop.
    pub fn outcome(&self) -> Option<&DropOutcome> {
        match &self.effect {
            DragEffect::Dropped(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.effect, DragEffect::Noop { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    transition_counter: u64,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.state.phase()
    }

    pub fn is_active(&self) -> bool {
        self.phase() != DragPhase::Idle
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { payload } | DragState::Hovering { payload, .. } => Some(payload),
        }
    }

    /// The target a drop would land on right now.
    pub fn pending_target(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Hovering { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn begin(&mut self, payload: DragPayload) -> DragTransition {
        let from = self.phase();
        let effect = match self.state {
            DragState::Idle => {
                self.state = DragState::Dragging {
                    payload: payload.clone(),
                };
                DragEffect::Started { payload }
            }
            _ => DragEffect::Noop {
                reason: DragNoopReason::DragAlreadyInProgress,
            },
        };
        self.transition(from, effect)
    }

    /// Records the zone under the pointer. Never touches the document.
    pub fn hover(&mut self, target: Option<DropTarget>) -> DragTransition {
        let from = self.phase();
        let state = std::mem::take(&mut self.state);
        let (state, effect) = match (state, target) {
            (DragState::Idle, _) => (
                DragState::Idle,
                DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                },
            ),
            (DragState::Hovering { payload, target: current }, Some(target)) if current == target => (
                DragState::Hovering {
                    payload,
                    target: current,
                },
                DragEffect::Noop {
                    reason: DragNoopReason::TargetUnchanged,
                },
            ),
            (DragState::Dragging { payload }, None) => (
                DragState::Dragging { payload },
                DragEffect::Noop {
                    reason: DragNoopReason::TargetUnchanged,
                },
            ),
            (DragState::Dragging { payload } | DragState::Hovering { payload, .. }, Some(target)) => (
                DragState::Hovering {
                    payload,
                    target: target.clone(),
                },
                DragEffect::TargetChanged {
                    target: Some(target),
                },
            ),
            (DragState::Hovering { payload, .. }, None) => (
                DragState::Dragging { payload },
                DragEffect::TargetChanged { target: None },
            ),
        };
        self.state = state;
        self.transition(from, effect)
    }

    /// Ends the drag on the pending target and applies exactly one drop.
    pub fn drop(&mut self, engine: &mut MoveEngine, document: &mut FormDocument) -> DragTransition {
        let from = self.phase();
        let effect = match std::mem::take(&mut self.state) {
            DragState::Idle => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            DragState::Dragging { payload } => {
                DragEffect::Dropped(engine.apply_drop(document, &payload, None))
            }
            DragState::Hovering { payload, target } => {
                DragEffect::Dropped(engine.apply_drop(document, &payload, Some(&target)))
            }
        };
        self.transition(from, effect)
    }

    pub fn cancel(&mut self) -> DragTransition {
        let from = self.phase();
        let effect = match std::mem::take(&mut self.state) {
            DragState::Idle => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            _ => DragEffect::Cancelled,
        };
        self.transition(from, effect)
    }

    fn transition(&mut self, from: DragPhase, effect: DragEffect) -> DragTransition {
        self.transition_counter += 1;
        let transition = DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.phase(),
            effect,
        };
        if !transition.is_noop() {
            debug!("Drag {:?} -> {:?}", transition.from, transition.to);
        }
        transition
    }
}
