// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tactile Gamepad: polled controllers with stable logical slots.
//!
//! ## Overview
//!
//! Platforms expose controllers as a positional list of snapshots that must be
//! read every frame. This crate turns that into edge events and queries:
//!
//! - [`GamepadSource`] hands over the raw list ([`RawGamepad`] snapshots).
//! - [`Gamepads`] owns four logical [`Pad`] slots. [`SlotMap`] keeps each
//!   slot bound to the same physical device for as long as it stays attached.
//! - [`Pad::poll_status`] diffs snapshots: button values of exactly 1 and 0
//!   are presses and releases, anything between is an analog change, and axes
//!   inside the dead zone read as 0.
//!
//! Absence of controllers is a normal state. Nothing in this crate fails.
//!
//! ## Minimal example
//!
//! ```
//! use tactile_gamepad::{codes::xbox360, Gamepads, RawButton, RawGamepad};
//!
//! let mut gamepads = Gamepads::default();
//! let mut devices = vec![Some(RawGamepad::new(0, 16, 4))];
//! gamepads.update(&mut devices, 0.0);
//! assert_eq!(gamepads.pads_connected(), 1);
//!
//! if let Some(raw) = devices[0].as_mut() {
//!     raw.buttons[xbox360::A] = RawButton::new(1.0);
//!     raw.axes[xbox360::STICK_LEFT_X] = 0.1;
//! }
//! gamepads.update(&mut devices, 16.0);
//!
//! let pad = gamepads.pad(0).unwrap();
//! assert!(pad.is_down(xbox360::A));
//! assert!(pad.just_pressed(xbox360::A, 100.0));
//! // Inside the default dead zone of 0.26.
//! assert_eq!(pad.axis(xbox360::STICK_LEFT_X), Some(0.0));
//! ```

pub mod codes;

mod button;
mod gamepads;
mod pad;
mod raw;
mod slots;

pub use button::{ButtonChannel, ButtonEvent, GamepadButton};
pub use gamepads::Gamepads;
pub use pad::{Pad, PadChannel, PadEvent, PadSignals};
pub use raw::{GamepadSource, NoGamepads, RawButton, RawGamepad};
pub use slots::{MAX_PADS, Reconciliation, SlotMap};
