// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single key's state machine.
//!
//! ## States
//!
//! A key is either up or down. Host auto-repeat arrives as further key-down
//! notifications while the key is already down; those are filtered here so the
//! down signal fires exactly once per physical press.
//!
//! ## Edge latches
//!
//! Every down transition sets a `just_down` latch and every up transition a
//! `just_up` latch. They stay set until read with [`Key::consume_just_down`] or
//! [`Key::consume_just_up`]. The read is destructive: only the first observer
//! after an edge sees `true`. This lets a game loop poll for single-frame edges
//! without missing any, at the price of a single consumer per edge.

use tactile_core::time::within;
use tactile_core::{Channel, EventTable, SlotId};

use crate::types::{KeyCode, KeyEvent, Modifiers, RawKeyEvent};

/// Edge signals raised by a [`Key`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyChannel {
    /// The key went down.
    Down,
    /// The key went up.
    Up,
}

impl Channel for KeyChannel {
    const COUNT: usize = 2;
    fn index(self) -> usize {
        self as usize
    }
}

type HoldCallback = Box<dyn FnMut(&KeyEvent)>;

/// State of one keyboard key.
pub struct Key {
    code: KeyCode,
    enabled: bool,
    is_down: bool,
    time_down: f64,
    time_up: f64,
    duration: f64,
    repeats: u32,
    modifiers: Modifiers,
    just_down: bool,
    just_up: bool,
    signals: EventTable<KeyChannel, KeyEvent>,
    hold: Option<HoldCallback>,
}

impl core::fmt::Debug for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Key")
            .field("code", &self.code)
            .field("enabled", &self.enabled)
            .field("is_down", &self.is_down)
            .field("time_down", &self.time_down)
            .field("time_up", &self.time_up)
            .field("duration", &self.duration)
            .field("repeats", &self.repeats)
            .field("hold", &self.hold.is_some())
            .finish_non_exhaustive()
    }
}

impl Key {
    /// Release time given to keys that have never been pressed, far enough in
    /// the past that `up_duration` reads false at startup.
    pub const NEVER_RELEASED: f64 = -2500.0;

    /// Create a key in the up state.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            enabled: true,
            is_down: false,
            time_down: 0.0,
            time_up: Self::NEVER_RELEASED,
            duration: 0.0,
            repeats: 0,
            modifiers: Modifiers::empty(),
            just_down: false,
            just_up: false,
            signals: EventTable::new(),
            hold: None,
        }
    }

    /// The key's code.
    pub fn code(&self) -> KeyCode {
        self.code
    }

    /// True while the key is held.
    pub fn is_down(&self) -> bool {
        self.is_down
    }

    /// True while the key is released.
    pub fn is_up(&self) -> bool {
        !self.is_down
    }

    /// Game time of the last down transition.
    pub fn time_down(&self) -> f64 {
        self.time_down
    }

    /// Game time of the last up transition.
    pub fn time_up(&self) -> f64 {
        self.time_up
    }

    /// Milliseconds held, refreshed by [`Key::update`] and on release.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of frames the key has been held since it went down.
    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Modifiers captured on the last down transition.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Alt was held on the last down transition.
    pub fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Control was held on the last down transition.
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Shift was held on the last down transition.
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Whether the key reacts to events.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the key. Disabling soft-resets it first.
    pub fn set_enabled(&mut self, enabled: bool, now: f64) {
        if enabled != self.enabled {
            if !enabled {
                self.reset(false, now);
            }
            self.enabled = enabled;
        }
    }

    /// Subscribe to down transitions.
    pub fn on_down(&mut self, listener: impl FnMut(&mut (), &KeyEvent) + 'static) -> SlotId {
        self.signals.subscribe(KeyChannel::Down, listener)
    }

    /// Subscribe to up transitions.
    pub fn on_up(&mut self, listener: impl FnMut(&mut (), &KeyEvent) + 'static) -> SlotId {
        self.signals.subscribe(KeyChannel::Up, listener)
    }

    /// Access the key's signal table directly.
    pub fn signals_mut(&mut self) -> &mut EventTable<KeyChannel, KeyEvent> {
        &mut self.signals
    }

    /// Install the callback run every frame while the key is held.
    ///
    /// It runs from [`Key::update`], once per frame per held key, so keep it cheap.
    pub fn set_hold_callback(&mut self, callback: impl FnMut(&KeyEvent) + 'static) {
        self.hold = Some(Box::new(callback));
    }

    /// Remove the hold callback.
    pub fn clear_hold_callback(&mut self) {
        self.hold = None;
    }

    /// Returns true if a hold callback is installed.
    pub fn has_hold_callback(&self) -> bool {
        self.hold.is_some()
    }

    fn snapshot(&self, time: f64) -> KeyEvent {
        KeyEvent {
            code: self.code,
            modifiers: self.modifiers,
            time,
            duration: self.duration,
            repeats: self.repeats,
        }
    }

    /// Handle a key-down notification.
    ///
    /// Returns true if this was a new press (the down signal fired).
    pub fn process_key_down(&mut self, event: &RawKeyEvent) -> bool {
        if !self.enabled || self.is_down {
            return false;
        }
        self.modifiers = event.modifiers;
        self.is_down = true;
        self.time_down = event.time;
        self.duration = 0.0;
        self.repeats = 0;
        self.just_down = true;
        let snapshot = self.snapshot(event.time);
        self.signals.emit(KeyChannel::Down, &snapshot);
        true
    }

    /// Handle a key-up notification.
    ///
    /// Returns true if this released a held key (the up signal fired).
    pub fn process_key_up(&mut self, event: &RawKeyEvent) -> bool {
        if !self.enabled || !self.is_down {
            return false;
        }
        self.is_down = false;
        self.time_up = event.time;
        self.duration = event.time - self.time_down;
        self.just_up = true;
        let snapshot = self.snapshot(event.time);
        self.signals.emit(KeyChannel::Up, &snapshot);
        true
    }

    /// Per-frame tick: refresh the hold duration and run the hold callback.
    pub fn update(&mut self, now: f64) {
        if !self.enabled || !self.is_down {
            return;
        }
        self.duration = now - self.time_down;
        self.repeats = self.repeats.saturating_add(1);
        let snapshot = self.snapshot(now);
        if let Some(hold) = self.hold.as_mut() {
            hold(&snapshot);
        }
    }

    /// Read and clear the `just_down` latch.
    pub fn consume_just_down(&mut self) -> bool {
        core::mem::take(&mut self.just_down)
    }

    /// Read and clear the `just_up` latch.
    pub fn consume_just_up(&mut self) -> bool {
        core::mem::take(&mut self.just_up)
    }

    /// True if the key is down and has been held for less than `window` ms.
    ///
    /// Uses the duration refreshed by the last [`Key::update`].
    pub fn down_duration(&self, window: f64) -> bool {
        self.is_down && self.duration < window
    }

    /// True if the key is up and was released less than `window` ms ago.
    pub fn up_duration(&self, window: f64, now: f64) -> bool {
        !self.is_down && within(now, self.time_up, window)
    }

    /// Return the key to the up state.
    ///
    /// A soft reset clears transient state and re-enables the key. A hard reset
    /// also drops every down/up listener and the hold callback.
    pub fn reset(&mut self, hard: bool, now: f64) {
        self.is_down = false;
        self.time_up = now;
        self.duration = 0.0;
        self.repeats = 0;
        self.enabled = true;
        self.just_down = false;
        self.just_up = false;
        if hard {
            self.signals.clear();
            self.hold = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ev(t: f64) -> RawKeyEvent {
        RawKeyEvent::new(KeyCode::A, t)
    }

    #[test]
    fn starts_up_with_past_release() {
        let k = Key::new(KeyCode::A);
        assert!(k.is_up());
        assert!(!k.is_down());
        assert!(!k.up_duration(50.0, 0.0));
    }

    #[test]
    fn auto_repeat_fires_down_once() {
        let downs = Rc::new(RefCell::new(0));
        let mut k = Key::new(KeyCode::A);
        let d = downs.clone();
        k.on_down(move |_, _| *d.borrow_mut() += 1);
        assert!(k.process_key_down(&ev(10.0)));
        assert!(!k.process_key_down(&ev(40.0)));
        assert!(!k.process_key_down(&ev(70.0)));
        assert_eq!(*downs.borrow(), 1);
        assert_eq!(k.time_down(), 10.0);
    }

    #[test]
    fn up_records_duration() {
        let mut k = Key::new(KeyCode::A);
        k.process_key_down(&ev(100.0));
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        k.on_up(move |_, e| *s.borrow_mut() = Some(e.duration));
        assert!(k.process_key_up(&ev(350.0)));
        assert_eq!(k.duration(), 250.0);
        assert_eq!(*seen.borrow(), Some(250.0));
        assert!(!k.process_key_up(&ev(400.0)));
    }

    #[test]
    fn just_down_survives_until_consumed_once() {
        let mut k = Key::new(KeyCode::A);
        k.process_key_down(&ev(0.0));
        k.process_key_up(&ev(10.0));
        k.process_key_down(&ev(20.0));
        assert!(k.consume_just_down());
        assert!(!k.consume_just_down());
        assert!(k.consume_just_up());
        assert!(!k.consume_just_up());
    }

    #[test]
    fn hold_callback_ticks_while_held() {
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let mut k = Key::new(KeyCode::A);
        let t = ticks.clone();
        k.set_hold_callback(move |e: &KeyEvent| t.borrow_mut().push((e.repeats, e.duration)));
        k.update(5.0);
        k.process_key_down(&ev(100.0));
        k.update(116.0);
        k.update(132.0);
        k.process_key_up(&ev(140.0));
        k.update(148.0);
        assert_eq!(*ticks.borrow(), vec![(1, 16.0), (2, 32.0)]);
        assert_eq!(k.repeats(), 2);
    }

    #[test]
    fn modifiers_captured_on_press() {
        let mut k = Key::new(KeyCode::A);
        k.process_key_down(&ev(0.0).with_modifiers(Modifiers::SHIFT | Modifiers::CTRL));
        assert!(k.shift());
        assert!(k.ctrl());
        assert!(!k.alt());
    }

    #[test]
    fn duration_windows() {
        let mut k = Key::new(KeyCode::A);
        k.process_key_down(&ev(0.0));
        k.update(30.0);
        assert!(k.down_duration(50.0));
        k.update(60.0);
        assert!(!k.down_duration(50.0));
        k.process_key_up(&ev(70.0));
        assert!(k.up_duration(50.0, 100.0));
        assert!(!k.up_duration(50.0, 120.0));
    }

    #[test]
    fn disabled_key_ignores_events_and_soft_resets() {
        let mut k = Key::new(KeyCode::A);
        k.process_key_down(&ev(0.0));
        k.set_enabled(false, 5.0);
        assert!(k.is_up());
        assert!(!k.consume_just_down());
        assert!(!k.process_key_down(&ev(10.0)));
        k.set_enabled(true, 20.0);
        assert!(k.process_key_down(&ev(30.0)));
    }

    #[test]
    fn soft_reset_keeps_listeners_hard_reset_drops_them() {
        let downs = Rc::new(RefCell::new(0));
        let mut k = Key::new(KeyCode::A);
        let d = downs.clone();
        k.on_down(move |_, _| *d.borrow_mut() += 1);
        k.set_hold_callback(|_: &KeyEvent| {});

        k.reset(false, 0.0);
        k.process_key_down(&ev(1.0));
        assert_eq!(*downs.borrow(), 1);
        assert!(k.has_hold_callback());

        k.reset(true, 2.0);
        assert!(k.is_up());
        k.process_key_down(&ev(3.0));
        assert_eq!(*downs.borrow(), 1);
        assert!(!k.has_hold_callback());
    }
}
