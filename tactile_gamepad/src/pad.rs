// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One logical controller slot.
//!
//! ## Polling, not callbacks
//!
//! Platforms do not report gamepad edges; they expose a snapshot that must be
//! read every frame. [`Pad::poll_status`] diffs the new snapshot against the
//! values stored from the previous one and raises an event for every change:
//!
//! - a button whose value became exactly 1 is a press,
//! - exactly 0 is a release,
//! - anything strictly between is an analog ("float") change.
//!
//! Axes are passed through the dead zone first, so drift around the center
//! never produces events.
//!
//! Every event is raised three times, from the inside out: on the
//! [`GamepadButton`]'s own signals (buttons only), on the pad's signals, and on
//! the dispatcher-wide signals handed in by [`Gamepads`](crate::Gamepads).

use tactile_core::{Channel, Error, EventTable, GamepadConfig, Result, SlotId};

use crate::button::GamepadButton;
use crate::raw::RawGamepad;

/// Pad-level signals.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PadChannel {
    /// A raw device was bound to the slot.
    Connect,
    /// The slot lost its raw device.
    Disconnect,
    /// A button was pressed.
    Down,
    /// A button was released.
    Up,
    /// A button changed to an analog value.
    Float,
    /// An axis changed.
    Axis,
}

impl Channel for PadChannel {
    const COUNT: usize = 6;
    fn index(self) -> usize {
        self as usize
    }
}

/// Payload of a pad-level signal. `pad` is always the logical slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PadEvent {
    /// A raw device was bound.
    Connected {
        /// Logical slot.
        pad: usize,
        /// Raw device index now backing the slot.
        raw_index: usize,
    },
    /// The raw device went away.
    Disconnected {
        /// Logical slot.
        pad: usize,
    },
    /// Button value became 1.
    ButtonDown {
        /// Logical slot.
        pad: usize,
        /// Button code.
        button: usize,
        /// New value.
        value: f64,
    },
    /// Button value became 0.
    ButtonUp {
        /// Logical slot.
        pad: usize,
        /// Button code.
        button: usize,
        /// New value.
        value: f64,
    },
    /// Button value changed to something strictly between 0 and 1.
    ButtonFloat {
        /// Logical slot.
        pad: usize,
        /// Button code.
        button: usize,
        /// New value.
        value: f64,
    },
    /// Axis value changed (after the dead zone).
    Axis {
        /// Logical slot.
        pad: usize,
        /// Axis code.
        axis: usize,
        /// New value.
        value: f64,
    },
}

impl PadEvent {
    /// Channel this event is raised on.
    pub fn channel(&self) -> PadChannel {
        match self {
            Self::Connected { .. } => PadChannel::Connect,
            Self::Disconnected { .. } => PadChannel::Disconnect,
            Self::ButtonDown { .. } => PadChannel::Down,
            Self::ButtonUp { .. } => PadChannel::Up,
            Self::ButtonFloat { .. } => PadChannel::Float,
            Self::Axis { .. } => PadChannel::Axis,
        }
    }
}

/// Signal table shared by pads and the dispatcher.
pub type PadSignals = EventTable<PadChannel, PadEvent>;

pub(crate) fn check_dead_zone(dead_zone: f64) -> Result<()> {
    if dead_zone.is_finite() && (0.0..1.0).contains(&dead_zone) {
        Ok(())
    } else {
        Err(Error::InvalidDeadZone(dead_zone))
    }
}

fn raise(local: &mut PadSignals, global: &mut PadSignals, event: PadEvent) {
    let channel = event.channel();
    local.emit(channel, &event);
    global.emit(channel, &event);
}

/// One logical controller slot.
pub struct Pad {
    slot: usize,
    connected: bool,
    raw_index: Option<usize>,
    id: String,
    dead_zone: f64,
    just_window: f64,
    buttons: Vec<GamepadButton>,
    axes: Vec<f64>,
    prev_timestamp: Option<f64>,
    signals: PadSignals,
}

impl core::fmt::Debug for Pad {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pad")
            .field("slot", &self.slot)
            .field("connected", &self.connected)
            .field("raw_index", &self.raw_index)
            .field("id", &self.id)
            .field("dead_zone", &self.dead_zone)
            .field("buttons", &self.buttons.len())
            .field("axes", &self.axes)
            .finish_non_exhaustive()
    }
}

impl Pad {
    /// Create a disconnected slot.
    pub fn new(slot: usize, config: &GamepadConfig) -> Self {
        Self {
            slot,
            connected: false,
            raw_index: None,
            id: String::new(),
            dead_zone: config.dead_zone,
            just_window: config.just_window,
            buttons: Vec::new(),
            axes: Vec::new(),
            prev_timestamp: None,
            signals: PadSignals::new(),
        }
    }

    /// Logical slot index.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// True while a raw device backs this slot.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Raw device index, only while connected.
    pub fn raw_index(&self) -> Option<usize> {
        self.raw_index
    }

    /// Identifier of the bound device (empty while disconnected).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current dead zone.
    pub fn dead_zone(&self) -> f64 {
        self.dead_zone
    }

    /// Change the dead zone for subsequent polls. Must lie in `[0, 1)`.
    pub fn set_dead_zone(&mut self, dead_zone: f64) -> Result<()> {
        check_dead_zone(dead_zone)?;
        self.dead_zone = dead_zone;
        Ok(())
    }

    /// Apply the dead zone: magnitudes at or below it read as 0.
    pub fn normalize_axis(&self, value: f64) -> f64 {
        if value > self.dead_zone || value < -self.dead_zone {
            value
        } else {
            0.0
        }
    }

    /// Subscribe to connects.
    pub fn on_connect(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Connect, listener)
    }

    /// Subscribe to disconnects.
    pub fn on_disconnect(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Disconnect, listener)
    }

    /// Subscribe to button presses.
    pub fn on_down(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Down, listener)
    }

    /// Subscribe to button releases.
    pub fn on_up(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Up, listener)
    }

    /// Subscribe to analog button changes.
    pub fn on_float(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Float, listener)
    }

    /// Subscribe to axis changes.
    pub fn on_axis(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Axis, listener)
    }

    /// Access the pad's signal table directly.
    pub fn signals_mut(&mut self) -> &mut PadSignals {
        &mut self.signals
    }

    /// Bind a raw device, rebuilding the button and axis lists from it.
    ///
    /// The connect signal fires only if the slot was disconnected.
    pub fn connect(&mut self, raw: &RawGamepad, global: &mut PadSignals) {
        let was_connected = self.connected;
        self.connected = true;
        self.raw_index = Some(raw.index);
        self.id.clone_from(&raw.id);
        self.prev_timestamp = None;
        self.buttons = (0..raw.buttons.len())
            .map(|code| GamepadButton::new(self.slot, code))
            .collect();
        self.axes = raw.axes.iter().map(|&v| self.normalize_axis(v)).collect();
        if !was_connected {
            tracing::debug!(slot = self.slot, raw = raw.index, id = %raw.id, "gamepad connected");
            raise(
                &mut self.signals,
                global,
                PadEvent::Connected {
                    pad: self.slot,
                    raw_index: raw.index,
                },
            );
        }
    }

    /// Unbind the raw device and drop the button and axis lists.
    ///
    /// The disconnect signal fires only if the slot was connected.
    pub fn disconnect(&mut self, global: &mut PadSignals) {
        let was_connected = self.connected;
        self.connected = false;
        self.raw_index = None;
        self.id.clear();
        self.prev_timestamp = None;
        self.buttons.clear();
        self.axes.clear();
        if was_connected {
            tracing::debug!(slot = self.slot, "gamepad disconnected");
            raise(
                &mut self.signals,
                global,
                PadEvent::Disconnected { pad: self.slot },
            );
        }
    }

    /// Diff a fresh snapshot against the stored state and raise change events.
    ///
    /// Does nothing while disconnected, or when the snapshot carries the same
    /// timestamp as the previous poll.
    pub fn poll_status(&mut self, raw: &RawGamepad, now: f64, global: &mut PadSignals) {
        if !self.connected {
            return;
        }
        if raw.timestamp.is_some() && raw.timestamp == self.prev_timestamp {
            return;
        }

        for (button, raw_button) in self.buttons.iter_mut().zip(&raw.buttons) {
            let value = raw_button.value;
            if value == button.value() {
                continue;
            }
            let (pad, code) = (self.slot, button.code());
            let event = if value == 1.0 {
                button.process_button_down(value, now);
                PadEvent::ButtonDown {
                    pad,
                    button: code,
                    value,
                }
            } else if value == 0.0 {
                button.process_button_up(value, now);
                PadEvent::ButtonUp {
                    pad,
                    button: code,
                    value,
                }
            } else {
                button.process_button_float(value, now);
                PadEvent::ButtonFloat {
                    pad,
                    button: code,
                    value,
                }
            };
            raise(&mut self.signals, global, event);
        }

        let dead_zone = self.dead_zone;
        for (axis, (stored, &value)) in self.axes.iter_mut().zip(&raw.axes).enumerate() {
            let value = if value > dead_zone || value < -dead_zone {
                value
            } else {
                0.0
            };
            if value == *stored {
                continue;
            }
            *stored = value;
            raise(
                &mut self.signals,
                global,
                PadEvent::Axis {
                    pad: self.slot,
                    axis,
                    value,
                },
            );
        }

        self.prev_timestamp = raw.timestamp;
    }

    /// Access a button. `None` while disconnected or for unknown codes.
    pub fn button(&self, code: usize) -> Option<&GamepadButton> {
        self.buttons.get(code)
    }

    /// Access a button mutably, for example to subscribe to it.
    pub fn button_mut(&mut self, code: usize) -> Option<&mut GamepadButton> {
        self.buttons.get_mut(code)
    }

    /// Number of buttons on the bound device.
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Current (dead-zoned) axis value. `None` while disconnected or for unknown codes.
    pub fn axis(&self, code: usize) -> Option<f64> {
        self.axes.get(code).copied()
    }

    /// Number of axes on the bound device.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// True if the button is held. Unknown buttons read false.
    pub fn is_down(&self, code: usize) -> bool {
        self.button(code).is_some_and(GamepadButton::is_down)
    }

    /// True if the button is released. Unknown buttons read false.
    pub fn is_up(&self, code: usize) -> bool {
        self.button(code).is_some_and(GamepadButton::is_up)
    }

    /// Current button value. `None` for unknown buttons.
    pub fn button_value(&self, code: usize) -> Option<f64> {
        self.button(code).map(GamepadButton::value)
    }

    /// True if the button was pressed within the configured window.
    pub fn just_pressed(&self, code: usize, now: f64) -> bool {
        self.just_pressed_within(code, self.just_window, now)
    }

    /// True if the button was pressed less than `window` ms ago.
    pub fn just_pressed_within(&self, code: usize, window: f64, now: f64) -> bool {
        self.button(code)
            .is_some_and(|b| b.just_pressed(window, now))
    }

    /// True if the button was released within the configured window.
    pub fn just_released(&self, code: usize, now: f64) -> bool {
        self.just_released_within(code, self.just_window, now)
    }

    /// True if the button was released less than `window` ms ago.
    pub fn just_released_within(&self, code: usize, window: f64, now: f64) -> bool {
        self.button(code)
            .is_some_and(|b| b.just_released(window, now))
    }

    /// Release every button and center every axis. The binding is kept.
    pub fn reset(&mut self, now: f64) {
        for button in &mut self.buttons {
            button.reset(now);
        }
        self.axes.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawButton;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn connected_pad() -> (Pad, PadSignals, RawGamepad) {
        let mut pad = Pad::new(1, &GamepadConfig::default());
        let mut global = PadSignals::new();
        let raw = RawGamepad::new(0, 4, 2);
        pad.connect(&raw, &mut global);
        (pad, global, raw)
    }

    fn record(signals: &mut PadSignals) -> Rc<RefCell<Vec<PadEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for channel in [
            PadChannel::Connect,
            PadChannel::Disconnect,
            PadChannel::Down,
            PadChannel::Up,
            PadChannel::Float,
            PadChannel::Axis,
        ] {
            let l = log.clone();
            signals.subscribe(channel, move |_, e| l.borrow_mut().push(*e));
        }
        log
    }

    #[test]
    fn disconnected_pad_has_no_buttons_or_axes() {
        let pad = Pad::new(0, &GamepadConfig::default());
        assert!(!pad.connected());
        assert_eq!(pad.button_count(), 0);
        assert_eq!(pad.axis(0), None);
        assert!(!pad.is_down(0));
        assert!(!pad.is_up(0));
        assert_eq!(pad.raw_index(), None);
    }

    #[test]
    fn button_values_dispatch_down_float_up() {
        let (mut pad, mut global, mut raw) = connected_pad();
        let log = record(&mut global);

        raw.buttons[2] = RawButton::new(1.0);
        pad.poll_status(&raw, 10.0, &mut global);
        raw.buttons[2] = RawButton::new(0.5);
        pad.poll_status(&raw, 20.0, &mut global);
        raw.buttons[2] = RawButton::new(0.0);
        pad.poll_status(&raw, 30.0, &mut global);

        assert_eq!(
            *log.borrow(),
            vec![
                PadEvent::ButtonDown { pad: 1, button: 2, value: 1.0 },
                PadEvent::ButtonFloat { pad: 1, button: 2, value: 0.5 },
                PadEvent::ButtonUp { pad: 1, button: 2, value: 0.0 },
            ]
        );
        assert!(pad.just_released(2, 100.0));
        assert!(!pad.is_down(2));
    }

    #[test]
    fn axis_inside_dead_zone_is_silent() {
        let (mut pad, mut global, mut raw) = connected_pad();
        let log = record(&mut global);

        raw.axes[0] = 0.20;
        pad.poll_status(&raw, 10.0, &mut global);
        assert_eq!(pad.axis(0), Some(0.0));
        assert!(log.borrow().is_empty());

        raw.axes[0] = -0.8;
        pad.poll_status(&raw, 20.0, &mut global);
        assert_eq!(pad.axis(0), Some(-0.8));
        raw.axes[0] = 0.1;
        pad.poll_status(&raw, 30.0, &mut global);
        assert_eq!(
            *log.borrow(),
            vec![
                PadEvent::Axis { pad: 1, axis: 0, value: -0.8 },
                PadEvent::Axis { pad: 1, axis: 0, value: 0.0 },
            ]
        );
    }

    #[test]
    fn repeated_timestamp_skips_diffing() {
        let (mut pad, mut global, mut raw) = connected_pad();
        raw.timestamp = Some(5.0);
        pad.poll_status(&raw, 10.0, &mut global);
        raw.buttons[0] = RawButton::new(1.0);
        pad.poll_status(&raw, 11.0, &mut global);
        assert!(!pad.is_down(0));
        raw.timestamp = Some(6.0);
        pad.poll_status(&raw, 12.0, &mut global);
        assert!(pad.is_down(0));
    }

    #[test]
    fn connect_and_disconnect_fire_once_each() {
        let mut pad = Pad::new(2, &GamepadConfig::default());
        let mut global = PadSignals::new();
        let local = record(pad.signals_mut());
        let raw = RawGamepad::new(7, 2, 2);

        pad.connect(&raw, &mut global);
        pad.connect(&raw, &mut global);
        pad.disconnect(&mut global);
        pad.disconnect(&mut global);

        assert_eq!(
            *local.borrow(),
            vec![
                PadEvent::Connected { pad: 2, raw_index: 7 },
                PadEvent::Disconnected { pad: 2 },
            ]
        );
        assert_eq!(pad.button_count(), 0);
        assert_eq!(pad.axis_count(), 0);
    }

    #[test]
    fn per_button_listeners_see_presses() {
        let (mut pad, mut global, mut raw) = connected_pad();
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        if let Some(b) = pad.button_mut(3) {
            b.on_down(move |_, _| *h.borrow_mut() += 1);
        }
        raw.buttons[3] = RawButton::new(1.0);
        pad.poll_status(&raw, 1.0, &mut global);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn reset_releases_and_centers() {
        let (mut pad, mut global, mut raw) = connected_pad();
        raw.buttons[0] = RawButton::new(1.0);
        raw.axes[1] = 0.9;
        pad.poll_status(&raw, 1.0, &mut global);
        pad.reset(2.0);
        assert!(!pad.is_down(0));
        assert_eq!(pad.axis(1), Some(0.0));
        assert!(pad.connected());
    }
}
