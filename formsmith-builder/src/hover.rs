//! Pointer geometry for reordering.
//!
//! Hover evaluation is pure: it reads rectangles the renderer measured and
//! decides whether the dragged item should take the hovered item's index.
//! Nothing here touches the document.

use formsmith_types::{FieldId, RowId};
use std::collections::HashMap;

/// Reordering direction. Fields stack vertically in a column; rows stack
/// vertically in the document but the same rule applies along either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }
}

/// A bounding box in renderer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Midpoint of the rectangle along `axis`.
    pub fn midpoint(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y + self.height / 2.0,
            Axis::Horizontal => self.x + self.width / 2.0,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Outcome of one hover step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverDecision {
    /// The dragged item should take this index.
    MoveTo(usize),
    /// Keep the current order.
    Hold,
}

/// Hysteresis rule for pointer-driven reordering.
///
/// Moving forward (`drag_index < hover_index`) only happens once the pointer
/// has crossed the hovered item's midpoint; moving backward only before it.
pub fn hover_decision(
    drag_index: usize,
    hover_index: usize,
    pointer: Point,
    hovered: Rect,
    axis: Axis,
) -> HoverDecision {
    if drag_index == hover_index {
        return HoverDecision::Hold;
    }
    let position = pointer.along(axis);
    let middle = hovered.midpoint(axis);
    if drag_index < hover_index && position < middle {
        return HoverDecision::Hold;
    }
    if drag_index > hover_index && position > middle {
        return HoverDecision::Hold;
    }
    HoverDecision::MoveTo(hover_index)
}

/// Bounding boxes the renderer measured for fields and rows.
///
/// Owned by the view layer. It is never serialized and never compared as
/// part of a document.
#[derive(Debug, Clone, Default)]
pub struct HoverGeometry {
    fields: HashMap<FieldId, Rect>,
    rows: HashMap<RowId, Rect>,
}

impl HoverGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, id: FieldId, rect: Rect) {
        self.fields.insert(id, rect);
    }

    pub fn set_row(&mut self, id: RowId, rect: Rect) {
        self.rows.insert(id, rect);
    }

    pub fn field(&self, id: &FieldId) -> Option<Rect> {
        self.fields.get(id).copied()
    }

    pub fn row(&self, id: &RowId) -> Option<Rect> {
        self.rows.get(id).copied()
    }

    /// Drops entries for fields and rows that left the document.
    pub fn retain(&mut self, field_live: impl Fn(&FieldId) -> bool, row_live: impl Fn(&RowId) -> bool) {
        self.fields.retain(|id, _| field_live(id));
        self.rows.retain(|id, _| row_live(id));
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.rows.clear();
    }

    /// Hover decision for a field over `hovered`, if its box is known.
    pub fn field_decision(
        &self,
        drag_index: usize,
        hover_index: usize,
        hovered: &FieldId,
        pointer: Point,
    ) -> Option<HoverDecision> {
        let rect = self.field(hovered)?;
        Some(hover_decision(drag_index, hover_index, pointer, rect, Axis::Vertical))
    }

    /// Hover decision for a row over `hovered`, if its box is known.
    pub fn row_decision(
        &self,
        drag_index: usize,
        hover_index: usize,
        hovered: &RowId,
        pointer: Point,
    ) -> Option<HoverDecision> {
        let rect = self.row(hovered)?;
        Some(hover_decision(drag_index, hover_index, pointer, rect, Axis::Vertical))
    }
}
