// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.
//!
//! Runtime input queries never fail; out-of-range lookups return sentinels.
//! Only configuration can be rejected.

/// A rejected configuration value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// Drag distance threshold was negative or not finite.
    #[error("drag distance threshold must be finite and non-negative, got {0}")]
    InvalidDragDistance(f64),
    /// Drag time threshold was negative or not finite.
    #[error("drag time threshold must be finite and non-negative, got {0} ms")]
    InvalidDragTime(f64),
    /// A duration window was negative or not finite.
    #[error("duration window must be finite and non-negative, got {0} ms")]
    InvalidWindow(f64),
    /// Gamepad dead zone outside `[0, 1)`.
    #[error("dead zone must lie in [0, 1), got {0}")]
    InvalidDeadZone(f64),
    /// Snap grid cell with a non-positive side.
    #[error("snap cell must have positive sides, got {width}x{height}")]
    InvalidSnapCell {
        /// Requested cell width.
        width: f64,
        /// Requested cell height.
        height: f64,
    },
}

/// Result alias for Tactile configuration.
pub type Result<T, E = Error> = core::result::Result<T, E>;
