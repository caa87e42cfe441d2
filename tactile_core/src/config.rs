// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable thresholds for every input device.
//!
//! ## Usage
//!
//! Build an [`InputConfig`] (usually via `Default`), optionally override
//! fields, then call [`InputConfig::validate`] or [`InputConfig::sanitized`]
//! before handing the sections to the device crates.
//!
//! With the `serde` feature every struct derives `Serialize`/`Deserialize`
//! with `#[serde(default)]`, so a partial document only overrides what it names.
//!
//! ```
//! use tactile_core::InputConfig;
//!
//! let mut config = InputConfig::default();
//! config.gamepad.dead_zone = 0.15;
//! assert!(config.validate().is_ok());
//!
//! config.gamepad.dead_zone = 1.2;
//! assert!(config.validate().is_err());
//! assert_eq!(config.sanitized().gamepad.dead_zone, 0.26);
//! ```

use crate::error::{Error, Result};

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// Pointer interaction thresholds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointerConfig {
    /// Distance in pixels a pressed pointer must travel before a drag starts.
    pub drag_distance_threshold: f64,
    /// Milliseconds a pointer must stay pressed before a drag starts.
    pub drag_time_threshold: f64,
    /// Minimum alpha (0–255) a sampled texel needs to count as a hit.
    pub pixel_perfect_alpha: u8,
    /// Default window for `just_over`, `just_pressed`, and friends.
    pub just_window: f64,
}

impl PointerConfig {
    /// Default window for pointer `just_*` queries, in milliseconds.
    pub const DEFAULT_JUST_WINDOW: f64 = 500.0;

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        if !non_negative(self.drag_distance_threshold) {
            return Err(Error::InvalidDragDistance(self.drag_distance_threshold));
        }
        if !non_negative(self.drag_time_threshold) {
            return Err(Error::InvalidDragTime(self.drag_time_threshold));
        }
        if !non_negative(self.just_window) {
            return Err(Error::InvalidWindow(self.just_window));
        }
        Ok(())
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            drag_distance_threshold: 0.0,
            drag_time_threshold: 0.0,
            pixel_perfect_alpha: 255,
            just_window: Self::DEFAULT_JUST_WINDOW,
        }
    }
}

/// Keyboard thresholds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeyboardConfig {
    /// Default window for `down_duration` and `up_duration`, in milliseconds.
    pub duration_window: f64,
}

impl KeyboardConfig {
    /// Default window for key duration queries, in milliseconds.
    pub const DEFAULT_DURATION_WINDOW: f64 = 50.0;

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        if !non_negative(self.duration_window) {
            return Err(Error::InvalidWindow(self.duration_window));
        }
        Ok(())
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            duration_window: Self::DEFAULT_DURATION_WINDOW,
        }
    }
}

/// Gamepad thresholds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GamepadConfig {
    /// Axis magnitude at or below which a stick reads as neutral.
    pub dead_zone: f64,
    /// Default window for button `just_pressed`/`just_released`, in milliseconds.
    pub just_window: f64,
}

impl GamepadConfig {
    /// Default axis dead zone.
    pub const DEFAULT_DEAD_ZONE: f64 = 0.26;
    /// Default window for button `just_*` queries, in milliseconds.
    pub const DEFAULT_JUST_WINDOW: f64 = 250.0;

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        if !(self.dead_zone.is_finite() && (0.0..1.0).contains(&self.dead_zone)) {
            return Err(Error::InvalidDeadZone(self.dead_zone));
        }
        if !non_negative(self.just_window) {
            return Err(Error::InvalidWindow(self.just_window));
        }
        Ok(())
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            dead_zone: Self::DEFAULT_DEAD_ZONE,
            just_window: Self::DEFAULT_JUST_WINDOW,
        }
    }
}

/// Configuration for every Tactile device.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// Pointer section.
    pub pointer: PointerConfig,
    /// Keyboard section.
    pub keyboard: KeyboardConfig,
    /// Gamepad section.
    pub gamepad: GamepadConfig,
}

impl InputConfig {
    /// Check every section, reporting the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.pointer.validate()?;
        self.keyboard.validate()?;
        self.gamepad.validate()
    }

    /// Replace every invalid section with its defaults, logging what was dropped.
    pub fn sanitized(mut self) -> Self {
        if let Err(err) = self.pointer.validate() {
            tracing::warn!(%err, "pointer config rejected, using defaults");
            self.pointer = PointerConfig::default();
        }
        if let Err(err) = self.keyboard.validate() {
            tracing::warn!(%err, "keyboard config rejected, using defaults");
            self.keyboard = KeyboardConfig::default();
        }
        if let Err(err) = self.gamepad.validate() {
            tracing::warn!(%err, "gamepad config rejected, using defaults");
            self.gamepad = GamepadConfig::default();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = InputConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.pointer.pixel_perfect_alpha, 255);
        assert_eq!(config.gamepad.dead_zone, 0.26);
        assert_eq!(config.keyboard.duration_window, 50.0);
    }

    #[test]
    fn first_invalid_field_is_reported() {
        let mut config = InputConfig::default();
        config.pointer.drag_time_threshold = -1.0;
        config.gamepad.dead_zone = f64::NAN;
        assert_eq!(config.validate(), Err(Error::InvalidDragTime(-1.0)));
    }

    #[test]
    fn sanitized_only_resets_broken_sections() {
        let mut config = InputConfig::default();
        config.pointer.drag_distance_threshold = 12.0;
        config.keyboard.duration_window = f64::INFINITY;
        let clean = config.sanitized();
        assert_eq!(clean.pointer.drag_distance_threshold, 12.0);
        assert_eq!(clean.keyboard, KeyboardConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_document_overrides_named_fields() {
        let config: InputConfig =
            serde_json::from_str(r#"{ "gamepad": { "dead_zone": 0.1 } }"#).unwrap();
        assert_eq!(config.gamepad.dead_zone, 0.1);
        assert_eq!(config.gamepad.just_window, 250.0);
        assert_eq!(config.pointer, PointerConfig::default());
    }
}
