// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tactile Core: building blocks shared by the Tactile input crates.
//!
//! ## Overview
//!
//! The keyboard, gamepad, and pointer crates all need the same three things:
//!
//! - A way to publish typed events to any number of listeners. [`Signal`] is a
//!   single listener list; [`EventTable`] is an enum-keyed table of signals
//!   that are constructed lazily the first time someone subscribes.
//! - A notion of game time. All Tactile APIs take the host's monotonic clock as
//!   an `f64` of milliseconds; [`time::OneShot`] schedules a single deadline
//!   against it.
//! - Tunables. [`InputConfig`] groups the thresholds used by every device and
//!   validates them, reporting problems as [`Error`].
//!
//! ## Event tables
//!
//! ```
//! use tactile_core::{Channel, EventTable};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! enum Door { Opened, Closed }
//!
//! impl Channel for Door {
//!     const COUNT: usize = 2;
//!     fn index(self) -> usize { self as usize }
//! }
//!
//! let mut table: EventTable<Door, u32> = EventTable::new();
//! assert!(!table.is_constructed(Door::Opened));
//!
//! let seen = std::rc::Rc::new(std::cell::Cell::new(0));
//! let sink = seen.clone();
//! table.subscribe(Door::Opened, move |_, n| sink.set(sink.get() + *n));
//!
//! assert_eq!(table.emit(Door::Opened, &3), 1);
//! assert_eq!(table.emit(Door::Closed, &5), 0);
//! assert_eq!(seen.get(), 3);
//! ```
//!
//! ## Threading
//!
//! Everything here is single threaded and run-to-completion. Listeners are
//! plain `FnMut` closures; they are not required to be `Send`.

pub mod config;
pub mod error;
pub mod signal;
pub mod time;

pub use config::{GamepadConfig, InputConfig, KeyboardConfig, PointerConfig};
pub use error::{Error, Result};
pub use signal::{Channel, EventTable, Signal, SlotId};
