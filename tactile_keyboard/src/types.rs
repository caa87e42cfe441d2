// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key codes, modifier flags, and the raw events the host feeds in.

/// A physical key code as reported by the host platform.
///
/// The associated constants follow the common DOM `keyCode` numbering, but any
/// stable `u32` scheme works as long as the host is consistent.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct KeyCode(pub u32);

#[allow(missing_docs, reason = "Key names are self-describing.")]
impl KeyCode {
    pub const BACKSPACE: Self = Self(8);
    pub const TAB: Self = Self(9);
    pub const ENTER: Self = Self(13);
    pub const SHIFT: Self = Self(16);
    pub const CONTROL: Self = Self(17);
    pub const ALT: Self = Self(18);
    pub const ESC: Self = Self(27);
    pub const SPACEBAR: Self = Self(32);
    pub const PAGE_UP: Self = Self(33);
    pub const PAGE_DOWN: Self = Self(34);
    pub const END: Self = Self(35);
    pub const HOME: Self = Self(36);
    pub const LEFT: Self = Self(37);
    pub const UP: Self = Self(38);
    pub const RIGHT: Self = Self(39);
    pub const DOWN: Self = Self(40);
    pub const INSERT: Self = Self(45);
    pub const DELETE: Self = Self(46);
    pub const ZERO: Self = Self(48);
    pub const ONE: Self = Self(49);
    pub const TWO: Self = Self(50);
    pub const THREE: Self = Self(51);
    pub const A: Self = Self(65);
    pub const D: Self = Self(68);
    pub const S: Self = Self(83);
    pub const W: Self = Self(87);
    pub const F1: Self = Self(112);
}

impl KeyCode {
    /// Code for an ASCII letter or digit, upper-casing letters.
    ///
    /// Returns `None` for anything else.
    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            Some(Self(u32::from(c)))
        } else {
            None
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held when an event was generated.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt / Option.
        const ALT   = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Shift.
        const SHIFT = 0b0100;
        /// Meta / Command / Windows.
        const META  = 0b1000;
    }
}

/// A raw key-down or key-up notification from the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawKeyEvent {
    /// Physical key.
    pub code: KeyCode,
    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,
    /// Game time of the event, in milliseconds.
    pub time: f64,
}

impl RawKeyEvent {
    /// Event with no modifiers.
    pub fn new(code: KeyCode, time: f64) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            time,
        }
    }

    /// Replace the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A character-producing key press from the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyPress {
    /// Character produced by the press.
    pub ch: char,
    /// Game time of the event, in milliseconds.
    pub time: f64,
}

/// Snapshot of a key handed to key listeners and hold callbacks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyEvent {
    /// The key.
    pub code: KeyCode,
    /// Modifiers captured on the last down transition.
    pub modifiers: Modifiers,
    /// Game time of the transition (or of the hold tick).
    pub time: f64,
    /// Milliseconds held; on release, the full hold duration.
    pub duration: f64,
    /// Frames the key has been held.
    pub repeats: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_char_maps_letters_and_digits() {
        assert_eq!(KeyCode::from_char('a'), Some(KeyCode::A));
        assert_eq!(KeyCode::from_char('W'), Some(KeyCode::W));
        assert_eq!(KeyCode::from_char('1'), Some(KeyCode::ONE));
        assert_eq!(KeyCode::from_char('-'), None);
    }
}
