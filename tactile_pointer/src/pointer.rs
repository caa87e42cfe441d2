// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single pointer contact: mouse, pen, or one finger.

use kurbo::{Point, Vec2};

use crate::registry::TargetId;

/// Number of simultaneous pointer contacts tracked.
pub const MAX_POINTERS: usize = 10;

/// State of one pointer contact.
///
/// Positions are in screen space. [`Pointer::world_position`] adds the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Pointer {
    /// Contact index in `0..MAX_POINTERS`.
    pub id: usize,
    /// Current screen position.
    pub position: Point,
    /// Screen position of the last press.
    pub position_down: Point,
    /// Pressed.
    pub is_down: bool,
    /// Released.
    pub is_up: bool,
    /// Game time of the last press.
    pub time_down: f64,
    /// Game time of the last release.
    pub time_up: f64,
    /// Has received at least one event.
    pub active: bool,
    /// Needs its hover target recomputed on the next frame.
    pub dirty: bool,
    /// Binding currently hovered, pressed, or dragged by this pointer.
    pub target: Option<TargetId>,
    /// Binding holding this pointer's pending or active drag. It keeps
    /// receiving the pointer after hover moves elsewhere.
    pub capture: Option<TargetId>,
}

impl Pointer {
    /// An idle pointer.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            position: Point::ORIGIN,
            position_down: Point::ORIGIN,
            is_down: false,
            is_up: true,
            time_down: 0.0,
            time_up: 0.0,
            active: false,
            dirty: false,
            target: None,
            capture: None,
        }
    }

    /// Position in world space for a camera scrolled to `camera`.
    pub fn world_position(&self, camera: Point) -> Point {
        self.position + camera.to_vec2()
    }

    /// Milliseconds held, or -1 while released.
    pub fn duration(&self, now: f64) -> f64 {
        if self.is_down {
            now - self.time_down
        } else {
            -1.0
        }
    }

    /// Distance moved since the last press.
    pub fn travel(&self) -> Vec2 {
        self.position - self.position_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_position_adds_camera_scroll() {
        let mut p = Pointer::new(0);
        p.position = Point::new(10.0, 20.0);
        assert_eq!(p.world_position(Point::new(100.0, 5.0)), Point::new(110.0, 25.0));
    }

    #[test]
    fn duration_is_negative_while_released() {
        let mut p = Pointer::new(3);
        assert_eq!(p.duration(50.0), -1.0);
        p.is_down = true;
        p.time_down = 20.0;
        assert_eq!(p.duration(50.0), 30.0);
    }
}
