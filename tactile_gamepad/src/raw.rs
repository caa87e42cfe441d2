// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw controller snapshots as reported by the platform.

/// One button as reported by the platform.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RawButton {
    /// Analog value in `0.0..=1.0`; digital buttons report exactly 0 or 1.
    pub value: f64,
    /// The platform's own pressed flag. Informational; diffing uses `value`.
    pub pressed: bool,
}

impl RawButton {
    /// A button with the given value, pressed when it reads 1.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            pressed: value >= 1.0,
        }
    }
}

/// A controller snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGamepad {
    /// The platform's device index. Stable while the device stays attached.
    pub index: usize,
    /// Human-readable device identifier.
    pub id: String,
    /// Platform timestamp of the snapshot, if the platform provides one.
    ///
    /// Polls that see the same timestamp twice skip diffing.
    pub timestamp: Option<f64>,
    /// Buttons in the platform's order.
    pub buttons: Vec<RawButton>,
    /// Axes in the platform's order, each in `-1.0..=1.0`.
    pub axes: Vec<f64>,
}

impl RawGamepad {
    /// A snapshot with `buttons` released buttons and `axes` centered axes.
    pub fn new(index: usize, buttons: usize, axes: usize) -> Self {
        Self {
            index,
            id: String::new(),
            timestamp: None,
            buttons: vec![RawButton::default(); buttons],
            axes: vec![0.0; axes],
        }
    }
}

/// Supplies the platform's device list once per frame.
///
/// The list is positional and may contain holes. Only the first
/// [`MAX_PADS`](crate::MAX_PADS) positions are considered.
pub trait GamepadSource {
    /// The current device list, or `None` if the platform has no gamepad support.
    fn raw_gamepads(&mut self) -> Option<&[Option<RawGamepad>]>;
}

impl GamepadSource for Vec<Option<RawGamepad>> {
    fn raw_gamepads(&mut self) -> Option<&[Option<RawGamepad>]> {
        Some(self)
    }
}

/// A source for platforms without gamepad support.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoGamepads;

impl GamepadSource for NoGamepads {
    fn raw_gamepads(&mut self) -> Option<&[Option<RawGamepad>]> {
        None
    }
}
