// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene-side view of an interactive object.
//!
//! Tactile does not own a display tree. Hosts implement [`InteractiveObject`]
//! for whatever they render, and pass it by `&mut` into every
//! [`InteractionBinding`](crate::InteractionBinding) call.

use kurbo::{Affine, Point, Rect, Vec2};

bitflags::bitflags! {
    /// Optional behaviors an object supports.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// The object may be moved by dragging.
        const DRAG            = 0b0000_0001;
        /// The object lives in screen space and moves with the camera.
        ///
        /// Drags write [`InteractiveObject::set_camera_offset`] instead of
        /// the position, and hit tests use screen coordinates.
        const FIXED_TO_CAMERA = 0b0000_0010;
        /// The object's texture is cropped.
        ///
        /// Pixel tests reject points outside [`TextureFrame::crop`] before
        /// sampling.
        const CROP            = 0b0000_0100;
        /// The object can be raised above its siblings.
        const BRING_TO_TOP    = 0b0000_1000;
        /// The object has a texture that can be sampled for alpha.
        const PIXEL_SOURCE    = 0b0001_0000;
    }
}

/// Identifies a texture for a [`PixelSampler`](crate::PixelSampler).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u32);

/// Where an object's visible pixels live inside its texture source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextureFrame {
    /// The texture source to sample.
    pub source: TextureId,
    /// Frame rectangle inside the source.
    pub frame: Rect,
    /// Anchor as a fraction of the frame size; `(0.5, 0.5)` is centered.
    pub anchor: Vec2,
    /// Offset of trimmed transparent margins, for packed atlases.
    pub trim: Option<Vec2>,
    /// Visible region in source coordinates, honored when the object has
    /// [`Capabilities::CROP`].
    pub crop: Rect,
}

impl TextureFrame {
    /// An untrimmed frame covering `frame`, anchored at its top-left corner.
    pub fn new(source: TextureId, frame: Rect) -> Self {
        Self {
            source,
            frame,
            anchor: Vec2::ZERO,
            trim: None,
            crop: frame,
        }
    }

    /// Builder: set the anchor.
    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    /// Builder: set the visible crop.
    pub fn with_crop(mut self, crop: Rect) -> Self {
        self.crop = crop;
        self
    }

    /// Builder: set the trim offset and visible crop.
    pub fn with_trim(mut self, trim: Vec2, crop: Rect) -> Self {
        self.trim = Some(trim);
        self.crop = crop;
        self
    }
}

/// What the pointer layer needs from a scene object.
///
/// Coordinates:
/// - [`world_transform`](Self::world_transform) maps local space to world
///   space, or to screen space for [`Capabilities::FIXED_TO_CAMERA`] objects.
/// - [`position`](Self::position) is in parent space. Drags move it by world
///   (or screen) deltas, so parents are expected to be unscaled.
/// - [`local_bounds`](Self::local_bounds) is the hit area in local space,
///   already offset by the anchor.
pub trait InteractiveObject {
    /// Position in parent space.
    fn position(&self) -> Point;
    /// Move the object in parent space.
    fn set_position(&mut self, position: Point);

    /// Local to world (or screen) transform.
    fn world_transform(&self) -> Affine;
    /// Hit area in local space.
    fn local_bounds(&self) -> Rect;
    /// Axis-aligned bounds in world (or screen) space.
    fn bounds(&self) -> Rect {
        self.world_transform().transform_rect_bbox(self.local_bounds())
    }
    /// Accumulated scale; a zero component makes the object unhittable.
    fn world_scale(&self) -> Vec2;
    /// Paint order; later-painted objects win ties.
    fn render_order(&self) -> u32;

    /// The object itself is visible.
    fn visible(&self) -> bool;
    /// The object is attached to the scene and its parent is visible.
    fn parent_visible(&self) -> bool;
    /// The parent asks for its children to be skipped by input.
    fn ignore_child_input(&self) -> bool {
        false
    }

    /// Optional behaviors this object supports.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Screen-space offset of a fixed-to-camera object.
    fn camera_offset(&self) -> Point {
        Point::ORIGIN
    }
    /// Move a fixed-to-camera object.
    fn set_camera_offset(&mut self, _offset: Point) {}

    /// Raise the object above its siblings.
    fn bring_to_top(&mut self) {}

    /// The texture region to sample for pixel-perfect hit tests.
    fn texture_frame(&self) -> Option<TextureFrame> {
        None
    }

    /// False once the object has been destroyed.
    ///
    /// Bindings re-check this after every listener they invoke.
    fn is_alive(&self) -> bool {
        true
    }
}
