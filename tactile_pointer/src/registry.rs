// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State shared by every binding: the interactive set, the cursor, the pixel
//! sampler, the clock, and the camera.

use kurbo::Point;
use tactile_core::PointerConfig;

use crate::sampler::{AlphaMasks, PixelSampler};

/// Identifies a binding in the [`Registry`] and in the host's world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(pub u32);

/// Cursor the host should display.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CursorStyle {
    /// The platform default.
    #[default]
    Default,
    /// A hand, shown while hovering a binding that asked for it.
    Hand,
}

/// Shared pointer-layer state.
///
/// Bindings are handed `&mut Registry` on every call; none of them keeps a
/// reference to it.
pub struct Registry {
    items: Vec<TargetId>,
    cursor: CursorStyle,
    sampler: Box<dyn PixelSampler>,
    time: f64,
    camera: Point,
    min_priority: i32,
    config: PointerConfig,
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("items", &self.items)
            .field("cursor", &self.cursor)
            .field("time", &self.time)
            .field("camera", &self.camera)
            .field("min_priority", &self.min_priority)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(PointerConfig::default())
    }
}

impl Registry {
    /// An empty registry sampling from an empty [`AlphaMasks`].
    pub fn new(config: PointerConfig) -> Self {
        Self::with_sampler(config, AlphaMasks::new())
    }

    /// An empty registry with a host-provided sampler.
    pub fn with_sampler(config: PointerConfig, sampler: impl PixelSampler + 'static) -> Self {
        Self {
            items: Vec::new(),
            cursor: CursorStyle::Default,
            sampler: Box::new(sampler),
            time: 0.0,
            camera: Point::ORIGIN,
            min_priority: 0,
            config,
        }
    }

    /// Pointer configuration new bindings start from.
    pub fn config(&self) -> &PointerConfig {
        &self.config
    }

    /// Interactive bindings in registration order.
    pub fn items(&self) -> &[TargetId] {
        &self.items
    }

    /// True if `id` is registered.
    pub fn contains(&self, id: TargetId) -> bool {
        self.items.contains(&id)
    }

    /// Register a binding. Registering twice keeps the original position.
    pub fn add(&mut self, id: TargetId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.items.push(id);
        true
    }

    /// Deregister a binding.
    pub fn remove(&mut self, id: TargetId) -> bool {
        let before = self.items.len();
        self.items.retain(|&i| i != id);
        self.items.len() != before
    }

    /// Cursor the host should display.
    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Set the cursor.
    pub fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    /// The shared pixel sampler.
    pub fn sampler_mut(&mut self) -> &mut dyn PixelSampler {
        &mut *self.sampler
    }

    /// Replace the shared pixel sampler.
    pub fn set_sampler(&mut self, sampler: impl PixelSampler + 'static) {
        self.sampler = Box::new(sampler);
    }

    /// Current game time in milliseconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance the clock. Call once per frame before routing pointer events.
    pub fn set_time(&mut self, now: f64) {
        self.time = now;
    }

    /// Camera scroll: world position of the screen's top-left corner.
    pub fn camera(&self) -> Point {
        self.camera
    }

    /// Scroll the camera.
    pub fn set_camera(&mut self, camera: Point) {
        self.camera = camera;
    }

    /// Bindings below this priority are ignored.
    pub fn min_priority(&self) -> i32 {
        self.min_priority
    }

    /// Ignore bindings below `priority`.
    pub fn set_min_priority(&mut self, priority: i32) {
        self.min_priority = priority;
    }
}
