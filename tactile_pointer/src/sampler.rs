// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alpha sampling for pixel-perfect hit tests.

use std::collections::BTreeMap;

use crate::object::TextureId;

/// Reads the alpha of a single texel.
///
/// One sampler is shared by every binding through the
/// [`Registry`](crate::Registry). Access is always sequential.
pub trait PixelSampler {
    /// Alpha of the texel at `(x, y)` in `source`, or `None` when the source is
    /// unknown or the point lies outside it.
    fn sample_alpha(&mut self, source: TextureId, x: f64, y: f64) -> Option<u8>;
}

/// A sampler that never finds a texel. Pixel-perfect tests always fail.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoPixels;

impl PixelSampler for NoPixels {
    fn sample_alpha(&mut self, _source: TextureId, _x: f64, _y: f64) -> Option<u8> {
        None
    }
}

/// The alpha channel of one texture, kept in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl AlphaMask {
    /// Wrap row-major alpha values. Returns `None` if the length does not match.
    pub fn new(width: usize, height: usize, alpha: Vec<u8>) -> Option<Self> {
        (alpha.len() == width.checked_mul(height)?).then_some(Self {
            width,
            height,
            alpha,
        })
    }

    /// A mask of one constant alpha.
    pub fn filled(width: usize, height: usize, alpha: u8) -> Self {
        Self {
            width,
            height,
            alpha: vec![alpha; width * height],
        }
    }

    /// Width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Alpha of the texel containing `(x, y)`.
    pub fn alpha_at(&self, x: f64, y: f64) -> Option<u8> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Coordinates are non-negative and bounds-checked below."
        )]
        let (col, row) = (x.floor() as usize, y.floor() as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        self.alpha.get(row * self.width + col).copied()
    }

    /// Overwrite one texel. Out-of-range writes are ignored.
    pub fn set_alpha(&mut self, col: usize, row: usize, alpha: u8) {
        if col < self.width && row < self.height {
            self.alpha[row * self.width + col] = alpha;
        }
    }
}

/// In-memory masks keyed by texture, for hosts without a GPU readback path.
#[derive(Clone, Debug, Default)]
pub struct AlphaMasks {
    masks: BTreeMap<TextureId, AlphaMask>,
}

impl AlphaMasks {
    /// No masks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the mask of `source`.
    pub fn insert(&mut self, source: TextureId, mask: AlphaMask) -> Option<AlphaMask> {
        self.masks.insert(source, mask)
    }

    /// Drop the mask of `source`.
    pub fn remove(&mut self, source: TextureId) -> Option<AlphaMask> {
        self.masks.remove(&source)
    }

    /// The mask of `source`.
    pub fn get(&self, source: TextureId) -> Option<&AlphaMask> {
        self.masks.get(&source)
    }
}

impl PixelSampler for AlphaMasks {
    fn sample_alpha(&mut self, source: TextureId, x: f64, y: f64) -> Option<u8> {
        self.masks.get(&source)?.alpha_at(x, y)
    }
}
