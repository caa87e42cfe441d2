// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tactile Keyboard: per-key state with edge latches, hold ticks, and capture.
//!
//! ## Overview
//!
//! - [`Key`] tracks one key: up/down, press and release times, hold duration,
//!   a per-frame repeat counter, and two one-shot latches.
//! - [`Keyboard`] owns the keys, routes raw host notifications to them, and
//!   keeps the set of captured keys whose events the host should swallow.
//!
//! ## Edge latches are consumed
//!
//! [`Key::consume_just_down`] and [`Key::consume_just_up`] clear the latch they
//! read. Only one observer per edge sees `true`; that is the contract, not an
//! accident. Code that needs several observers should subscribe to
//! [`Key::on_down`] / [`Key::on_up`] instead.
//!
//! ## Minimal example
//!
//! ```
//! use tactile_keyboard::{Keyboard, KeyCode, RawKeyEvent};
//!
//! let mut keyboard = Keyboard::default();
//! keyboard.add_key(KeyCode::SPACEBAR);
//!
//! // The host forwards raw events as they arrive...
//! let prevent_default = keyboard.process_key_down(&RawKeyEvent::new(KeyCode::SPACEBAR, 1000.0));
//! assert!(prevent_default);
//! // ...auto-repeat is ignored...
//! keyboard.process_key_down(&RawKeyEvent::new(KeyCode::SPACEBAR, 1033.0));
//!
//! // ...and ticks held keys once per frame.
//! keyboard.update(1040.0);
//!
//! assert!(keyboard.is_down(KeyCode::SPACEBAR));
//! assert!(keyboard.consume_just_down(KeyCode::SPACEBAR));
//! assert!(!keyboard.consume_just_down(KeyCode::SPACEBAR));
//! ```

mod key;
mod keyboard;
mod types;

pub use key::{Key, KeyChannel};
pub use keyboard::{CursorKeys, Keyboard, KeyboardChannel, KeyboardEvent};
pub use types::{KeyCode, KeyEvent, KeyPress, Modifiers, RawKeyEvent};
