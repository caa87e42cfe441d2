// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard state from a scripted stream of host events.
//!
//! Feeds key-downs (with host auto-repeat), frame ticks and key-ups into a
//! [`Keyboard`], then reads the edge latches and hold durations.
//!
//! Run:
//! - `cargo run -p tactile_demos --example keyboard_basics`
//! - `RUST_LOG=tactile_keyboard=trace cargo run -p tactile_demos --example keyboard_basics`

use std::cell::Cell;
use std::rc::Rc;

use tactile_core::KeyboardConfig;
use tactile_keyboard::{KeyCode, KeyPress, Keyboard, Modifiers, RawKeyEvent};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

fn main() {
    init_tracing();

    let mut keyboard = Keyboard::new(KeyboardConfig::default());
    let cursors = keyboard.create_cursor_keys();
    let fire = KeyCode::SPACEBAR;

    let holds = Rc::new(Cell::new(0_u32));
    let h = holds.clone();
    keyboard
        .add_key(fire)
        .set_hold_callback(move |event| {
            h.set(event.repeats);
        });

    // Left arrow pressed with shift at t=0; the host repeats it at t=30.
    let left = RawKeyEvent::new(cursors.left, 0.0).with_modifiers(Modifiers::SHIFT);
    let captured = keyboard.process_key_down(&left);
    keyboard.process_key_down(&RawKeyEvent::new(cursors.left, 30.0));
    println!("left captured: {captured}");
    assert!(captured, "registered keys are captured");

    keyboard.process_key_down(&RawKeyEvent::new(fire, 16.0));
    for frame in 1..=5 {
        keyboard.update(f64::from(frame) * 16.0);
    }

    println!(
        "left down: {}, shift: {}",
        keyboard.is_down(cursors.left),
        keyboard.key(cursors.left).is_some_and(|k| k.shift())
    );
    assert!(keyboard.consume_just_down(cursors.left), "first read sees the edge");
    assert!(!keyboard.consume_just_down(cursors.left), "the latch was consumed");
    println!("fire held for {} frames", holds.get());
    assert_eq!(holds.get(), 5, "one hold tick per frame");

    keyboard.process_key_up(&RawKeyEvent::new(cursors.left, 100.0));
    keyboard.process_key_up(&RawKeyEvent::new(fire, 100.0));
    keyboard.process_key_press(&KeyPress { ch: 'q', time: 101.0 });

    println!(
        "left released recently: {}, last char: {:?}",
        keyboard.up_duration(cursors.left, 120.0),
        keyboard.last_char()
    );
    assert!(keyboard.consume_just_up(cursors.left), "release latched");
    assert_eq!(keyboard.last_char(), Some('q'), "press events record the character");
}
