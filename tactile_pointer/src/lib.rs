// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tactile Pointer: hover, press and drag for scene objects.
//!
//! ## Overview
//!
//! - [`InteractionBinding`] attaches pointer interaction to one object. It
//!   keeps a [`ContactRecord`] per pointer, runs the drag machine with its
//!   distance and time thresholds, and raises [`PointerEvent`]s.
//! - [`Registry`] is the state bindings share: the set of registered
//!   bindings, the cursor style, the camera, the clock, and a
//!   [`PixelSampler`] for pixel-perfect tests.
//! - [`PointerManager`] owns the [`Pointer`]s and decides which binding each
//!   pointer targets, preferring higher priority and then later render order.
//!
//! Objects live in the host's scene. The host implements
//! [`InteractiveObject`] for them and [`InteractiveWorld`] to look bindings up
//! by [`TargetId`]. A `BTreeMap<TargetId, (InteractionBinding<O>, O)>` works
//! out of the box.
//!
//! ## Minimal example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use kurbo::{Affine, Point, Rect, Vec2};
//! use tactile_pointer::{
//!     Capabilities, DragOptions, InteractionBinding, InteractiveObject, PointerManager,
//!     Registry, TargetId,
//! };
//!
//! struct Card {
//!     position: Point,
//! }
//!
//! impl InteractiveObject for Card {
//!     fn position(&self) -> Point { self.position }
//!     fn set_position(&mut self, position: Point) { self.position = position; }
//!     fn world_transform(&self) -> Affine { Affine::translate(self.position.to_vec2()) }
//!     fn local_bounds(&self) -> Rect { Rect::new(0.0, 0.0, 60.0, 90.0) }
//!     fn world_scale(&self) -> Vec2 { Vec2::new(1.0, 1.0) }
//!     fn render_order(&self) -> u32 { 0 }
//!     fn visible(&self) -> bool { true }
//!     fn parent_visible(&self) -> bool { true }
//!     fn capabilities(&self) -> Capabilities { Capabilities::DRAG }
//! }
//!
//! let mut registry = Registry::default();
//! let card = Card { position: Point::new(100.0, 100.0) };
//! let mut binding = InteractionBinding::new(TargetId(7), registry.config());
//! binding.start(&mut registry, 0, true);
//! assert!(binding.enable_drag(&card, DragOptions::default()));
//!
//! let mut world = BTreeMap::new();
//! world.insert(TargetId(7), (binding, card));
//!
//! let mut pointers = PointerManager::new();
//! pointers.pointer_move(&mut world, &mut registry, 0, Point::new(110.0, 120.0));
//! pointers.pointer_down(&mut world, &mut registry, 0, Point::new(110.0, 120.0));
//! pointers.pointer_move(&mut world, &mut registry, 0, Point::new(150.0, 120.0));
//! pointers.pointer_up(&mut world, &mut registry, 0, Point::new(150.0, 120.0));
//!
//! assert_eq!(world[&TargetId(7)].1.position, Point::new(140.0, 100.0));
//! ```

mod binding;
mod manager;
mod object;
mod pointer;
mod registry;
mod sampler;
mod state;

#[cfg(test)]
mod testing;

pub use binding::{InteractionBinding, PointerChannel, PointerEvent};
pub use manager::{InteractiveWorld, ManagerChannel, PointerInput, PointerManager};
pub use object::{Capabilities, InteractiveObject, TextureFrame, TextureId};
pub use pointer::{MAX_POINTERS, Pointer};
pub use registry::{CursorStyle, Registry, TargetId};
pub use sampler::{AlphaMask, AlphaMasks, NoPixels, PixelSampler};
pub use state::{ContactRecord, DragBounds, DragOptions, DragState, SnapConfig};
