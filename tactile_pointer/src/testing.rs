// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal scene object for unit tests.

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::object::{Capabilities, InteractiveObject, TextureFrame};

#[derive(Clone, Debug)]
pub(crate) struct Sprite {
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) camera_offset: Point,
    pub(crate) capabilities: Capabilities,
    pub(crate) render_order: u32,
    pub(crate) visible: bool,
    pub(crate) alive: bool,
    pub(crate) raised: u32,
    pub(crate) frame: Option<TextureFrame>,
}

impl Sprite {
    pub(crate) fn new(rect: Rect) -> Self {
        Self {
            position: rect.origin(),
            size: rect.size(),
            camera_offset: Point::ORIGIN,
            capabilities: Capabilities::empty(),
            render_order: 0,
            visible: true,
            alive: true,
            raised: 0,
            frame: None,
        }
    }

    pub(crate) fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub(crate) fn with_render_order(mut self, render_order: u32) -> Self {
        self.render_order = render_order;
        self
    }
}

impl InteractiveObject for Sprite {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn world_transform(&self) -> Affine {
        if self.capabilities.contains(Capabilities::FIXED_TO_CAMERA) {
            Affine::translate(self.camera_offset.to_vec2())
        } else {
            Affine::translate(self.position.to_vec2())
        }
    }

    fn local_bounds(&self) -> Rect {
        self.size.to_rect()
    }

    fn world_scale(&self) -> Vec2 {
        Vec2::new(1.0, 1.0)
    }

    fn render_order(&self) -> u32 {
        self.render_order
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn parent_visible(&self) -> bool {
        true
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn camera_offset(&self) -> Point {
        self.camera_offset
    }

    fn set_camera_offset(&mut self, offset: Point) {
        self.camera_offset = offset;
    }

    fn bring_to_top(&mut self) {
        self.raised += 1;
    }

    fn texture_frame(&self) -> Option<TextureFrame> {
        self.frame
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
