// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::BTreeMap;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Point, Rect, Vec2};
use tactile_core::PointerConfig;
use tactile_pointer::{
    AlphaMask, AlphaMasks, Capabilities, DragOptions, InteractionBinding, InteractiveObject,
    PointerManager, Registry, TargetId, TextureFrame, TextureId,
};

struct Tile {
    position: Point,
    order: u32,
    frame: Option<TextureFrame>,
}

impl InteractiveObject for Tile {
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
        Rect::new(0.0, 0.0, 30.0, 30.0)
    }
    fn world_scale(&self) -> Vec2 {
        Vec2::new(1.0, 1.0)
    }
    fn render_order(&self) -> u32 {
        self.order
    }
    fn visible(&self) -> bool {
        true
    }
    fn parent_visible(&self) -> bool {
        true
    }
    fn capabilities(&self) -> Capabilities {
        Capabilities::DRAG | Capabilities::PIXEL_SOURCE
    }
    fn texture_frame(&self) -> Option<TextureFrame> {
        self.frame
    }
}

type World = BTreeMap<TargetId, (InteractionBinding<Tile>, Tile)>;

/// An `n` by `n` grid of overlapping tiles; every `pixel_every`th one is pixel-perfect.
fn gen_grid(n: u32, pixel_every: u32) -> (World, Registry) {
    let mut masks = AlphaMasks::new();
    masks.insert(TextureId(0), AlphaMask::filled(30, 30, 255));
    let mut registry = Registry::with_sampler(PointerConfig::default(), masks);
    let mut world = World::new();
    for y in 0..n {
        for x in 0..n {
            let id = y * n + x;
            let pixel = pixel_every != 0 && id % pixel_every == 0;
            let tile = Tile {
                position: Point::new(f64::from(x) * 20.0, f64::from(y) * 20.0),
                order: id,
                frame: pixel.then(|| TextureFrame::new(TextureId(0), Rect::new(0.0, 0.0, 30.0, 30.0))),
            };
            let mut binding = InteractionBinding::new(TargetId(id), registry.config());
            binding.start(&mut registry, 0, false);
            binding.set_pixel_perfect(pixel, pixel, 128);
            binding.enable_drag(&tile, DragOptions::default());
            world.insert(TargetId(id), (binding, tile));
        }
    }
    (world, registry)
}

fn sweep(n: u32) -> Vec<Point> {
    let extent = f64::from(n) * 20.0;
    (0..64)
        .map(|i| {
            let t = f64::from(i) / 64.0;
            Point::new(t * extent, (1.0 - t) * extent)
        })
        .collect()
}

fn bench_hover(c: &mut Criterion) {
    let mut group = c.benchmark_group("hover");
    for &n in &[8_u32, 16, 32] {
        let path = sweep(n);
        group.throughput(Throughput::Elements(path.len() as u64));
        for (label, pixel_every) in [("geometry", 0), ("pixel_quarter", 4)] {
            group.bench_function(format!("{label}_n{}", n * n), |b| {
                let (mut world, mut registry) = gen_grid(n, pixel_every);
                let mut manager = PointerManager::new();
                b.iter(|| {
                    for &p in &path {
                        manager.pointer_move(&mut world, &mut registry, 0, p);
                    }
                    black_box(manager.pointer(0).and_then(|p| p.target));
                });
            });
        }
    }
    group.finish();
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag");
    let n = 16;
    let path = sweep(n);
    group.throughput(Throughput::Elements(path.len() as u64));
    group.bench_function(format!("press_drag_release_n{}", n * n), |b| {
        let (mut world, mut registry) = gen_grid(n, 0);
        let mut manager = PointerManager::new();
        b.iter(|| {
            let start = path[0];
            manager.pointer_move(&mut world, &mut registry, 0, start);
            manager.pointer_down(&mut world, &mut registry, 0, start);
            for &p in &path[1..] {
                manager.pointer_move(&mut world, &mut registry, 0, p);
            }
            let end = path[path.len() - 1];
            manager.pointer_up(&mut world, &mut registry, 0, end);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_hover, bench_drag);
criterion_main!(benches);
