// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical gamepad slots across unplug and replug.
//!
//! Simulates a platform device list in which the second controller is
//! unplugged and a new one appears, and shows that slots stay stable.
//!
//! Run:
//! - `cargo run -p tactile_demos --example gamepad_slots`
//! - `RUST_LOG=tactile_gamepad=debug cargo run -p tactile_demos --example gamepad_slots`

use std::cell::RefCell;
use std::rc::Rc;

use tactile_gamepad::codes::xbox360;
use tactile_gamepad::{Gamepads, PadEvent, RawButton, RawGamepad};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

fn controller(index: usize, id: &str) -> Option<RawGamepad> {
    let mut raw = RawGamepad::new(index, 16, 4);
    raw.id = id.to_owned();
    Some(raw)
}

fn main() {
    init_tracing();

    let mut gamepads = Gamepads::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = log.clone();
    gamepads.on_connect(move |_, event| l.borrow_mut().push(*event));
    let l = log.clone();
    gamepads.on_disconnect(move |_, event| l.borrow_mut().push(*event));

    let mut devices = vec![controller(0, "pad-a"), controller(1, "pad-b")];
    gamepads.update(&mut devices, 0.0);
    println!("connected: {}", gamepads.pads_connected());
    assert_eq!(gamepads.pads_connected(), 2, "both controllers bound");

    // Pad B is unplugged; its position in the raw list becomes a hole.
    devices[1] = None;
    gamepads.update(&mut devices, 16.0);
    assert_eq!(gamepads.pads_connected(), 1, "slot 1 released");

    // A new controller shows up at raw position 1 and takes the free slot.
    devices[1] = controller(1, "pad-c");
    if let Some(raw) = devices[1].as_mut() {
        raw.buttons[xbox360::START] = RawButton::new(1.0);
    }
    gamepads.update(&mut devices, 32.0);
    gamepads.update(&mut devices, 48.0);

    for event in log.borrow().iter() {
        println!("{event:?}");
    }
    assert!(
        matches!(log.borrow().last(), Some(PadEvent::Connected { pad: 1, .. })),
        "replugged controller reuses slot 1"
    );
    println!(
        "start held on any pad: {}",
        gamepads.is_down(xbox360::START)
    );
    assert!(gamepads.is_down(xbox360::START), "new controller is polled");
}
