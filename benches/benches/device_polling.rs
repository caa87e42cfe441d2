// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tactile_gamepad::{Gamepads, MAX_PADS, RawButton, RawGamepad};
use tactile_keyboard::{KeyCode, Keyboard, RawKeyEvent};

fn gen_devices(count: usize) -> Vec<Option<RawGamepad>> {
    (0..count)
        .map(|i| {
            let mut raw = RawGamepad::new(i, 16, 4);
            raw.id = format!("pad-{i}");
            Some(raw)
        })
        .collect()
}

/// Flip every button and sweep every axis so each poll has work to do.
fn churn(devices: &mut [Option<RawGamepad>], frame: usize) {
    let value = if frame % 2 == 0 { 1.0 } else { 0.0 };
    let sweep = (frame % 100) as f64 / 50.0 - 1.0;
    for raw in devices.iter_mut().flatten() {
        raw.timestamp = Some(frame as f64);
        for b in &mut raw.buttons {
            *b = RawButton::new(value);
        }
        for a in &mut raw.axes {
            *a = sweep;
        }
    }
}

fn bench_gamepads(c: &mut Criterion) {
    let mut group = c.benchmark_group("gamepads");
    for &n in &[1_usize, MAX_PADS] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("poll_changing_n{n}"), |b| {
            let mut gamepads = Gamepads::default();
            let mut devices = gen_devices(n);
            gamepads.update(&mut devices, 0.0);
            let mut frame = 0_usize;
            b.iter(|| {
                frame += 1;
                churn(&mut devices, frame);
                gamepads.update(&mut devices, frame as f64 * 16.0);
                black_box(gamepads.is_down(0));
            });
        });
        group.bench_function(format!("poll_idle_n{n}"), |b| {
            let mut gamepads = Gamepads::default();
            let mut devices = gen_devices(n);
            gamepads.update(&mut devices, 0.0);
            let mut now = 0.0;
            b.iter(|| {
                now += 16.0;
                gamepads.update(&mut devices, now);
                black_box(gamepads.pads_connected());
            });
        });
    }
    group.bench_function("replug", |b| {
        b.iter_batched(
            || (Gamepads::default(), gen_devices(MAX_PADS)),
            |(mut gamepads, mut devices)| {
                gamepads.update(&mut devices, 0.0);
                devices.swap(0, 3);
                devices[1] = None;
                gamepads.update(&mut devices, 16.0);
                black_box(gamepads.pads_connected());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_keyboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyboard");
    let codes: Vec<KeyCode> = ('A'..='Z').filter_map(KeyCode::from_char).collect();
    group.throughput(Throughput::Elements(codes.len() as u64));
    group.bench_function("press_hold_release_alphabet", |b| {
        let mut keyboard = Keyboard::default();
        for &code in &codes {
            keyboard.add_key(code);
        }
        let mut now = 0.0;
        b.iter(|| {
            for &code in &codes {
                keyboard.process_key_down(&RawKeyEvent::new(code, now));
            }
            for _ in 0..4 {
                now += 16.0;
                keyboard.update(now);
            }
            for &code in &codes {
                keyboard.process_key_up(&RawKeyEvent::new(code, now));
                black_box(keyboard.consume_just_down(code));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_gamepads, bench_keyboard);
criterion_main!(benches);
