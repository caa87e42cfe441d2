// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single gamepad button.
//!
//! Buttons hold no polling logic. Their [`Pad`](crate::Pad) diffs raw
//! snapshots and calls the `process_*` methods on each change.

use tactile_core::time::within;
use tactile_core::{Channel, EventTable, SlotId};

/// Signals raised by a [`GamepadButton`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ButtonChannel {
    /// Value reached 1.
    Down,
    /// Value reached 0.
    Up,
    /// Value changed to something strictly between 0 and 1.
    Float,
}

impl Channel for ButtonChannel {
    const COUNT: usize = 3;
    fn index(self) -> usize {
        self as usize
    }
}

/// Payload of a button signal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ButtonEvent {
    /// Logical pad slot.
    pub pad: usize,
    /// Button code (position in the pad's button list).
    pub button: usize,
    /// New value.
    pub value: f64,
    /// Game time of the change.
    pub time: f64,
}

/// State of one button on one pad.
pub struct GamepadButton {
    pad: usize,
    code: usize,
    value: f64,
    is_down: bool,
    time_down: f64,
    time_up: f64,
    repeats: u32,
    signals: EventTable<ButtonChannel, ButtonEvent>,
}

impl core::fmt::Debug for GamepadButton {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GamepadButton")
            .field("pad", &self.pad)
            .field("code", &self.code)
            .field("value", &self.value)
            .field("is_down", &self.is_down)
            .field("time_down", &self.time_down)
            .field("time_up", &self.time_up)
            .field("repeats", &self.repeats)
            .finish_non_exhaustive()
    }
}

impl GamepadButton {
    /// Create a released button.
    pub fn new(pad: usize, code: usize) -> Self {
        Self {
            pad,
            code,
            value: 0.0,
            is_down: false,
            time_down: f64::NEG_INFINITY,
            time_up: f64::NEG_INFINITY,
            repeats: 0,
            signals: EventTable::new(),
        }
    }

    /// Button code.
    pub fn code(&self) -> usize {
        self.code
    }

    /// Logical pad slot owning this button.
    pub fn pad(&self) -> usize {
        self.pad
    }

    /// Last observed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// True while held.
    pub fn is_down(&self) -> bool {
        self.is_down
    }

    /// True while released.
    pub fn is_up(&self) -> bool {
        !self.is_down
    }

    /// Game time of the last press.
    pub fn time_down(&self) -> f64 {
        self.time_down
    }

    /// Game time of the last release.
    pub fn time_up(&self) -> f64 {
        self.time_up
    }

    /// Number of presses since the last reset.
    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Milliseconds held, or 0 while released.
    pub fn duration(&self, now: f64) -> f64 {
        if self.is_down {
            now - self.time_down
        } else {
            0.0
        }
    }

    /// Subscribe to presses.
    pub fn on_down(&mut self, listener: impl FnMut(&mut (), &ButtonEvent) + 'static) -> SlotId {
        self.signals.subscribe(ButtonChannel::Down, listener)
    }

    /// Subscribe to releases.
    pub fn on_up(&mut self, listener: impl FnMut(&mut (), &ButtonEvent) + 'static) -> SlotId {
        self.signals.subscribe(ButtonChannel::Up, listener)
    }

    /// Subscribe to analog changes.
    pub fn on_float(&mut self, listener: impl FnMut(&mut (), &ButtonEvent) + 'static) -> SlotId {
        self.signals.subscribe(ButtonChannel::Float, listener)
    }

    fn emit(&mut self, channel: ButtonChannel, now: f64) {
        let event = ButtonEvent {
            pad: self.pad,
            button: self.code,
            value: self.value,
            time: now,
        };
        self.signals.emit(channel, &event);
    }

    /// Record a press.
    pub fn process_button_down(&mut self, value: f64, now: f64) {
        self.is_down = true;
        self.time_down = now;
        self.repeats = self.repeats.saturating_add(1);
        self.value = value;
        self.emit(ButtonChannel::Down, now);
    }

    /// Record a release.
    pub fn process_button_up(&mut self, value: f64, now: f64) {
        self.is_down = false;
        self.time_up = now;
        self.value = value;
        self.emit(ButtonChannel::Up, now);
    }

    /// Record an analog change that is neither a press nor a release.
    pub fn process_button_float(&mut self, value: f64, now: f64) {
        self.value = value;
        self.emit(ButtonChannel::Float, now);
    }

    /// True if held and pressed less than `window` ms ago.
    pub fn just_pressed(&self, window: f64, now: f64) -> bool {
        self.is_down && within(now, self.time_down, window)
    }

    /// True if released less than `window` ms ago.
    pub fn just_released(&self, window: f64, now: f64) -> bool {
        !self.is_down && within(now, self.time_up, window)
    }

    /// Return to the released state at value 0. Listeners are kept.
    pub fn reset(&mut self, now: f64) {
        self.is_down = false;
        self.time_down = now;
        self.value = 0.0;
        self.repeats = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn press_release_timeline() {
        let mut b = GamepadButton::new(0, 3);
        assert!(!b.just_released(250.0, 0.0));
        b.process_button_down(1.0, 100.0);
        assert!(b.is_down());
        assert!(b.just_pressed(250.0, 200.0));
        assert!(!b.just_pressed(250.0, 350.0));
        assert_eq!(b.duration(150.0), 50.0);
        b.process_button_up(0.0, 400.0);
        assert!(b.is_up());
        assert!(b.just_released(250.0, 500.0));
        assert_eq!(b.duration(500.0), 0.0);
        assert_eq!(b.repeats(), 1);
    }

    #[test]
    fn float_changes_value_only() {
        let mut b = GamepadButton::new(1, 6);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        b.on_float(move |_, e| s.borrow_mut().push((e.pad, e.button, e.value)));
        b.process_button_float(0.4, 10.0);
        assert!(!b.is_down());
        assert_eq!(b.value(), 0.4);
        assert_eq!(*seen.borrow(), vec![(1, 6, 0.4)]);
    }

    #[test]
    fn reset_clears_press_state() {
        let mut b = GamepadButton::new(0, 0);
        b.process_button_down(1.0, 5.0);
        b.reset(6.0);
        assert!(b.is_up());
        assert_eq!(b.value(), 0.0);
        assert_eq!(b.repeats(), 0);
    }
}
