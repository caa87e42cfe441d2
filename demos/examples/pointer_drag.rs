// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragging cards on a snapping grid.
//!
//! Two overlapping cards are registered with a [`PointerManager`]. The top one
//! is pressed, dragged past its distance threshold, and dropped; it snaps to
//! a 32 unit grid on release.
//!
//! Run:
//! - `cargo run -p tactile_demos --example pointer_drag`
//! - `RUST_LOG=tactile_pointer=trace cargo run -p tactile_demos --example pointer_drag`

use std::collections::BTreeMap;

use kurbo::{Affine, Point, Rect, Vec2};
use tactile_core::PointerConfig;
use tactile_pointer::{
    Capabilities, CursorStyle, DragOptions, InteractionBinding, InteractiveObject, PointerEvent,
    PointerManager, Registry, TargetId,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

#[derive(Debug)]
struct Card {
    position: Point,
    layer: u32,
}

impl InteractiveObject for Card {
    fn position(&self) -> Point {
        self.position
    }
    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
    fn world_transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
    }
    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 64.0, 96.0)
    }
    fn world_scale(&self) -> Vec2 {
        Vec2::new(1.0, 1.0)
    }
    fn render_order(&self) -> u32 {
        self.layer
    }
    fn visible(&self) -> bool {
        true
    }
    fn parent_visible(&self) -> bool {
        true
    }
    fn capabilities(&self) -> Capabilities {
        Capabilities::DRAG
    }
}

fn main() {
    init_tracing();

    let config = PointerConfig {
        drag_distance_threshold: 8.0,
        ..PointerConfig::default()
    };
    let mut registry = Registry::new(config);
    let mut world = BTreeMap::new();

    for (id, x, layer) in [(1, 0.0, 1), (2, 32.0, 2)] {
        let card = Card {
            position: Point::new(x, 0.0),
            layer,
        };
        let mut binding = InteractionBinding::new(TargetId(id), registry.config());
        binding.start(&mut registry, 0, true);
        binding.enable_drag(&card, DragOptions::default());
        if let Err(err) = binding.enable_snap(32.0, 32.0, false, true, Vec2::ZERO) {
            tracing::error!(%err, "snap rejected");
        }
        binding.on_drag_stop(move |card: &mut Card, event: &PointerEvent| {
            println!("card {id} dropped at {:?} ({event:?})", card.position);
        });
        world.insert(TargetId(id), (binding, card));
    }

    let mut pointers = PointerManager::new();
    // Both cards cover x=40; the later-painted card 2 wins.
    pointers.pointer_move(&mut world, &mut registry, 0, Point::new(40.0, 10.0));
    assert_eq!(registry.cursor(), CursorStyle::Hand, "hovering shows the hand cursor");

    pointers.pointer_down(&mut world, &mut registry, 0, Point::new(40.0, 10.0));
    pointers.pointer_move(&mut world, &mut registry, 0, Point::new(44.0, 10.0));
    assert!(!world[&TargetId(2)].0.is_dragged(), "below the distance threshold");

    pointers.pointer_move(&mut world, &mut registry, 0, Point::new(60.0, 10.0));
    assert!(world[&TargetId(2)].0.is_dragged(), "threshold passed");
    pointers.pointer_move(&mut world, &mut registry, 0, Point::new(110.0, 55.0));
    pointers.pointer_up(&mut world, &mut registry, 0, Point::new(110.0, 55.0));

    let card = &world[&TargetId(2)].1;
    println!("card 2 rests at {:?}", card.position);
    assert_eq!(card.position, Point::new(96.0, 32.0), "snapped to the grid");
    assert_eq!(world[&TargetId(1)].1.position, Point::ORIGIN, "card 1 untouched");
}
