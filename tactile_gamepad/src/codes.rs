// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Button and axis codes for common controller layouts.
//!
//! Codes are positions in [`RawGamepad::buttons`](crate::RawGamepad::buttons)
//! and [`RawGamepad::axes`](crate::RawGamepad::axes) under the standard
//! mapping.

/// Xbox 360 style controller, standard mapping.
pub mod xbox360 {
    #![allow(missing_docs, reason = "Button names are self-describing.")]

    pub const A: usize = 0;
    pub const B: usize = 1;
    pub const X: usize = 2;
    pub const Y: usize = 3;
    pub const LEFT_BUMPER: usize = 4;
    pub const RIGHT_BUMPER: usize = 5;
    /// Analog; reports float values while partly pulled.
    pub const LEFT_TRIGGER: usize = 6;
    /// Analog; reports float values while partly pulled.
    pub const RIGHT_TRIGGER: usize = 7;
    pub const BACK: usize = 8;
    pub const START: usize = 9;
    pub const STICK_LEFT_BUTTON: usize = 10;
    pub const STICK_RIGHT_BUTTON: usize = 11;
    pub const DPAD_UP: usize = 12;
    pub const DPAD_DOWN: usize = 13;
    pub const DPAD_LEFT: usize = 14;
    pub const DPAD_RIGHT: usize = 15;

    pub const STICK_LEFT_X: usize = 0;
    pub const STICK_LEFT_Y: usize = 1;
    pub const STICK_RIGHT_X: usize = 2;
    pub const STICK_RIGHT_Y: usize = 3;
}
