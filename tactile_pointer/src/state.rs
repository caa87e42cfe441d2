// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain state carried by an [`InteractionBinding`](crate::InteractionBinding).

use kurbo::{Point, Rect, Vec2};
use tactile_core::time::OneShot;
use tactile_core::{Error, Result};

/// One pointer's history against one binding.
///
/// Exactly one of `is_down`/`is_up` and one of `is_over`/`is_out` holds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactRecord {
    /// Pointer index.
    pub id: usize,
    /// Pointer position relative to the object's position.
    pub position: Point,
    /// Camera scroll when the drag started.
    pub camera: Point,
    /// Pressed on the object.
    pub is_down: bool,
    /// Not pressed on the object.
    pub is_up: bool,
    /// Hovering the object.
    pub is_over: bool,
    /// Not hovering the object.
    pub is_out: bool,
    /// Dragging the object.
    pub is_dragged: bool,
    /// Game time hover started.
    pub time_over: f64,
    /// Game time hover ended.
    pub time_out: f64,
    /// Game time of the press.
    pub time_down: f64,
    /// Game time of the release.
    pub time_up: f64,
    /// Length of the last completed press.
    pub down_duration: f64,
}

impl ContactRecord {
    /// An idle record: up and out.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            position: Point::ORIGIN,
            camera: Point::ORIGIN,
            is_down: false,
            is_up: true,
            is_over: false,
            is_out: true,
            is_dragged: false,
            time_over: 0.0,
            time_out: 0.0,
            time_down: 0.0,
            time_up: 0.0,
            down_duration: 0.0,
        }
    }

    pub(crate) fn set_over(&mut self, over: bool) {
        self.is_over = over;
        self.is_out = !over;
    }

    pub(crate) fn set_down(&mut self, down: bool) {
        self.is_down = down;
        self.is_up = !down;
    }
}

/// Drag progress of one binding.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DragState {
    /// The pointer whose press waits for the gates to pass.
    pub pending: Option<usize>,
    /// Screen position of that press; the distance gate measures from here.
    pub press_point: Point,
    /// The distance gate has passed for the pending drag.
    pub distance_passed: bool,
    /// The time gate has passed for the pending drag.
    pub time_passed: bool,
    /// Object position minus pointer position at drag start.
    pub drag_point: Vec2,
    /// Object position when the drag started.
    pub start_point: Point,
    /// The pointer dragging the object, if any.
    pub pointer: Option<usize>,
    /// Deadline of the time gate.
    pub(crate) timer: OneShot,
    /// Raised to top during this drag; parent changes are ignored.
    pub(crate) raising: bool,
}

impl DragState {
    /// True while a pointer drags the object.
    pub fn is_dragged(&self) -> bool {
        self.pointer.is_some()
    }
}

/// Grid snapping.
///
/// A coordinate `v` snaps to `round((v - o) / s) * s + o` where `s` is the
/// cell size and `o` is the offset reduced modulo `s`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapConfig {
    /// Cell size.
    pub cell: Vec2,
    /// Grid origin.
    pub offset: Vec2,
    /// Snap while dragging.
    pub on_drag: bool,
    /// Snap once when the drag ends.
    pub on_release: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            cell: Vec2::ZERO,
            offset: Vec2::ZERO,
            on_drag: false,
            on_release: false,
        }
    }
}

impl SnapConfig {
    /// A grid of `width` by `height` cells. Both sides must be positive.
    pub fn new(width: f64, height: f64, on_drag: bool, on_release: bool) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::InvalidSnapCell { width, height });
        }
        Ok(Self {
            cell: Vec2::new(width, height),
            offset: Vec2::ZERO,
            on_drag,
            on_release,
        })
    }

    /// Builder: shift the grid origin.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// True if either snap mode is on.
    pub fn enabled(&self) -> bool {
        self.on_drag || self.on_release
    }

    /// Snap `p` to the grid.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            snap_axis(p.x, self.cell.x, self.offset.x),
            snap_axis(p.y, self.cell.y, self.offset.y),
        )
    }
}

fn snap_axis(v: f64, cell: f64, offset: f64) -> f64 {
    if cell <= 0.0 {
        return v;
    }
    let o = offset % cell;
    ((v - o) / cell).round() * cell + o
}

/// Limits a dragged object must stay within.
pub enum DragBounds {
    /// A fixed rectangle in parent space (screen space for fixed-to-camera
    /// objects).
    Rect(Rect),
    /// A rectangle read at every drag step, typically another object's bounds.
    Dynamic(Box<dyn Fn() -> Rect>),
}

impl core::fmt::Debug for DragBounds {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Rect(r) => f.debug_tuple("Rect").field(r).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl DragBounds {
    /// Follow a rectangle computed on demand.
    pub fn dynamic(bounds: impl Fn() -> Rect + 'static) -> Self {
        Self::Dynamic(Box::new(bounds))
    }

    /// The current limiting rectangle.
    pub fn rect(&self) -> Rect {
        match self {
            Self::Rect(r) => *r,
            Self::Dynamic(f) => f(),
        }
    }
}

impl From<Rect> for DragBounds {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

/// Options for [`InteractionBinding::enable_drag`](crate::InteractionBinding::enable_drag).
#[derive(Debug)]
pub struct DragOptions {
    /// Center the object under the pointer when the drag starts.
    pub lock_center: bool,
    /// Raise the object when it is pressed and when the drag starts.
    pub bring_to_top: bool,
    /// Require an opaque texel under the pointer to press.
    pub pixel_perfect: bool,
    /// Minimum alpha for pixel-perfect presses.
    pub alpha_threshold: u8,
    /// Keep the object inside these bounds.
    pub bounds: Option<DragBounds>,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            lock_center: false,
            bring_to_top: false,
            pixel_perfect: false,
            alpha_threshold: 255,
            bounds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_start_up_and_out() {
        let c = ContactRecord::new(4);
        assert!(c.is_up && !c.is_down);
        assert!(c.is_out && !c.is_over);
    }

    #[test]
    fn snap_rounds_to_the_nearest_cell() {
        let snap = SnapConfig::new(16.0, 16.0, false, true).unwrap();
        assert_eq!(snap.apply(Point::new(23.0, 25.0)), Point::new(16.0, 32.0));
    }

    #[test]
    fn snap_offset_is_taken_modulo_the_cell() {
        let snap = SnapConfig::new(10.0, 10.0, true, false)
            .unwrap()
            .with_offset(Vec2::new(23.0, 0.0));
        assert_eq!(snap.apply(Point::new(11.0, 4.0)), Point::new(13.0, 0.0));
    }

    #[test]
    fn zero_cell_is_rejected() {
        assert_eq!(
            SnapConfig::new(0.0, 8.0, true, false),
            Err(Error::InvalidSnapCell {
                width: 0.0,
                height: 8.0
            })
        );
    }

    #[test]
    fn dynamic_bounds_are_read_each_time() {
        let cell = std::rc::Rc::new(std::cell::Cell::new(Rect::new(0.0, 0.0, 1.0, 1.0)));
        let c = cell.clone();
        let bounds = DragBounds::dynamic(move || c.get());
        cell.set(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(bounds.rect().width(), 5.0);
    }
}
