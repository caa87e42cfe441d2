// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The keyboard dispatcher: key registry, capture set, and global callbacks.
//!
//! ## Flow
//!
//! The host forwards every raw notification as it arrives:
//! [`Keyboard::process_key_down`], [`Keyboard::process_key_up`], and
//! [`Keyboard::process_key_press`]. Each one runs to completion, including any
//! listeners it triggers, before returning, so callbacks fire in arrival order.
//! Once per frame the host calls [`Keyboard::update`] to tick held keys.
//!
//! Keys are created lazily: either explicitly via [`Keyboard::add_key`], or
//! implicitly the first time the host reports an event for them.

use std::collections::{BTreeMap, BTreeSet};

use tactile_core::{Channel, EventTable, KeyboardConfig, SlotId};

use crate::key::Key;
use crate::types::{KeyCode, KeyPress, RawKeyEvent};

/// Global keyboard signals.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyboardChannel {
    /// Any key-down notification reached an enabled keyboard.
    Down,
    /// Any key-up notification reached an enabled keyboard.
    Up,
    /// A character-producing press.
    Press,
}

impl Channel for KeyboardChannel {
    const COUNT: usize = 3;
    fn index(self) -> usize {
        self as usize
    }
}

/// Payload of a global keyboard signal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KeyboardEvent {
    /// Raw key-down, including host auto-repeats.
    Down(RawKeyEvent),
    /// Raw key-up.
    Up(RawKeyEvent),
    /// Character press.
    Press(KeyPress),
}

/// The four arrow keys, as registered by [`Keyboard::create_cursor_keys`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CursorKeys {
    /// Up arrow.
    pub up: KeyCode,
    /// Down arrow.
    pub down: KeyCode,
    /// Left arrow.
    pub left: KeyCode,
    /// Right arrow.
    pub right: KeyCode,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum LastEvent {
    Key,
    Press(KeyPress),
}

/// Keyboard dispatcher.
///
/// Owns every [`Key`], routes raw notifications to them, and decides which keys
/// the host should stop from reaching the rest of the page or application
/// (the capture set).
pub struct Keyboard {
    keys: BTreeMap<KeyCode, Key>,
    captures: BTreeSet<KeyCode>,
    enabled: bool,
    signals: EventTable<KeyboardChannel, KeyboardEvent>,
    last_code: Option<KeyCode>,
    last_event: Option<LastEvent>,
    config: KeyboardConfig,
}

impl core::fmt::Debug for Keyboard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Keyboard")
            .field("keys", &self.keys.len())
            .field("captures", &self.captures)
            .field("enabled", &self.enabled)
            .field("last_code", &self.last_code)
            .finish_non_exhaustive()
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new(KeyboardConfig::default())
    }
}

impl Keyboard {
    /// Create an enabled keyboard with no keys.
    pub fn new(config: KeyboardConfig) -> Self {
        Self {
            keys: BTreeMap::new(),
            captures: BTreeSet::new(),
            enabled: true,
            signals: EventTable::new(),
            last_code: None,
            last_event: None,
            config,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    /// Whether raw notifications are processed.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Resume processing raw notifications.
    pub fn start(&mut self) {
        self.enabled = true;
    }

    /// Ignore raw notifications until [`Keyboard::start`]. Key state is kept.
    pub fn stop(&mut self) {
        self.enabled = false;
    }

    /// Register a key (and capture it). Returns the existing key if present.
    pub fn add_key(&mut self, code: KeyCode) -> &mut Key {
        if !self.keys.contains_key(&code) {
            tracing::debug!(code = code.0, "key registered");
            self.captures.insert(code);
        }
        self.keys.entry(code).or_insert_with(|| Key::new(code))
    }

    /// Register several named keys, returning the name → code map.
    pub fn add_keys<'a>(
        &mut self,
        keys: impl IntoIterator<Item = (&'a str, KeyCode)>,
    ) -> BTreeMap<&'a str, KeyCode> {
        keys.into_iter()
            .map(|(name, code)| {
                self.add_key(code);
                (name, code)
            })
            .collect()
    }

    /// Register and capture the four arrow keys.
    pub fn create_cursor_keys(&mut self) -> CursorKeys {
        let keys = CursorKeys {
            up: KeyCode::UP,
            down: KeyCode::DOWN,
            left: KeyCode::LEFT,
            right: KeyCode::RIGHT,
        };
        for code in [keys.up, keys.down, keys.left, keys.right] {
            self.add_key(code);
        }
        keys
    }

    /// Remove a key and its capture. Returns the removed key.
    pub fn remove_key(&mut self, code: KeyCode) -> Option<Key> {
        let key = self.keys.remove(&code)?;
        self.captures.remove(&code);
        Some(key)
    }

    /// Access a registered key.
    pub fn key(&self, code: KeyCode) -> Option<&Key> {
        self.keys.get(&code)
    }

    /// Access a registered key mutably.
    pub fn key_mut(&mut self, code: KeyCode) -> Option<&mut Key> {
        self.keys.get_mut(&code)
    }

    /// Capture a key: its raw events should not propagate past the host.
    pub fn add_key_capture(&mut self, code: KeyCode) {
        self.captures.insert(code);
    }

    /// Capture several keys.
    pub fn add_key_captures(&mut self, codes: impl IntoIterator<Item = KeyCode>) {
        self.captures.extend(codes);
    }

    /// Stop capturing a key.
    pub fn remove_key_capture(&mut self, code: KeyCode) {
        self.captures.remove(&code);
    }

    /// Stop capturing every key.
    pub fn clear_captures(&mut self) {
        self.captures.clear();
    }

    /// Returns true if the key is captured.
    pub fn is_captured(&self, code: KeyCode) -> bool {
        self.captures.contains(&code)
    }

    /// Subscribe to every raw key-down.
    pub fn on_down(&mut self, listener: impl FnMut(&mut (), &KeyboardEvent) + 'static) -> SlotId {
        self.signals.subscribe(KeyboardChannel::Down, listener)
    }

    /// Subscribe to every raw key-up.
    pub fn on_up(&mut self, listener: impl FnMut(&mut (), &KeyboardEvent) + 'static) -> SlotId {
        self.signals.subscribe(KeyboardChannel::Up, listener)
    }

    /// Subscribe to character presses.
    pub fn on_press(&mut self, listener: impl FnMut(&mut (), &KeyboardEvent) + 'static) -> SlotId {
        self.signals.subscribe(KeyboardChannel::Press, listener)
    }

    /// Access the global signal table directly.
    pub fn signals_mut(&mut self) -> &mut EventTable<KeyboardChannel, KeyboardEvent> {
        &mut self.signals
    }

    /// Handle a raw key-down.
    ///
    /// Returns true if the host should prevent the event's default action
    /// (the key is captured). Disabled keyboards never capture.
    pub fn process_key_down(&mut self, event: &RawKeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        let code = event.code;
        let pressed = self
            .keys
            .entry(code)
            .or_insert_with(|| Key::new(code))
            .process_key_down(event);
        if pressed {
            tracing::trace!(code = code.0, time = event.time, "key down");
        }
        self.last_code = Some(code);
        self.last_event = Some(LastEvent::Key);
        self.signals
            .emit(KeyboardChannel::Down, &KeyboardEvent::Down(*event));
        self.captures.contains(&code)
    }

    /// Handle a raw key-up. Returns true if the host should prevent default.
    pub fn process_key_up(&mut self, event: &RawKeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        let code = event.code;
        let released = self
            .keys
            .entry(code)
            .or_insert_with(|| Key::new(code))
            .process_key_up(event);
        if released {
            tracing::trace!(code = code.0, time = event.time, "key up");
        }
        self.last_event = Some(LastEvent::Key);
        self.signals
            .emit(KeyboardChannel::Up, &KeyboardEvent::Up(*event));
        self.captures.contains(&code)
    }

    /// Handle a character press.
    pub fn process_key_press(&mut self, press: &KeyPress) {
        if !self.enabled {
            return;
        }
        self.last_event = Some(LastEvent::Press(*press));
        self.signals
            .emit(KeyboardChannel::Press, &KeyboardEvent::Press(*press));
    }

    /// Per-frame tick for every held key.
    pub fn update(&mut self, now: f64) {
        for key in self.keys.values_mut() {
            key.update(now);
        }
    }

    /// Reset every key (see [`Key::reset`]).
    pub fn reset(&mut self, hard: bool, now: f64) {
        self.last_event = None;
        for key in self.keys.values_mut() {
            key.reset(hard, now);
        }
    }

    /// The most recently pressed key.
    pub fn last_key(&self) -> Option<&Key> {
        self.keys.get(&self.last_code?)
    }

    /// The character of the last event, if that event was a character press.
    pub fn last_char(&self) -> Option<char> {
        match self.last_event? {
            LastEvent::Press(press) => Some(press.ch),
            LastEvent::Key => None,
        }
    }

    /// True if the key is held. Unknown keys read false.
    pub fn is_down(&self, code: KeyCode) -> bool {
        self.keys.get(&code).is_some_and(Key::is_down)
    }

    /// True if the key went down less than the configured window ago.
    pub fn down_duration(&self, code: KeyCode) -> bool {
        self.down_duration_within(code, self.config.duration_window)
    }

    /// True if the key went down less than `window` ms ago. Unknown keys read false.
    pub fn down_duration_within(&self, code: KeyCode, window: f64) -> bool {
        self.keys
            .get(&code)
            .is_some_and(|k| k.down_duration(window))
    }

    /// True if the key was released less than the configured window ago.
    pub fn up_duration(&self, code: KeyCode, now: f64) -> bool {
        self.up_duration_within(code, self.config.duration_window, now)
    }

    /// True if the key was released less than `window` ms ago. Unknown keys read false.
    pub fn up_duration_within(&self, code: KeyCode, window: f64, now: f64) -> bool {
        self.keys
            .get(&code)
            .is_some_and(|k| k.up_duration(window, now))
    }

    /// Read and clear a key's `just_down` latch. Unknown keys read false.
    pub fn consume_just_down(&mut self, code: KeyCode) -> bool {
        self.keys.get_mut(&code).is_some_and(Key::consume_just_down)
    }

    /// Read and clear a key's `just_up` latch. Unknown keys read false.
    pub fn consume_just_up(&mut self, code: KeyCode) -> bool {
        self.keys.get_mut(&code).is_some_and(Key::consume_just_up)
    }
}
