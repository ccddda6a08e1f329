/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Encoder and decoder options
//!
//! The same option structs are shared by every crate under the `kmr`
//! umbrella so a host can configure one value and reuse it across
//! codecs.
//!
//! Values outside the documented parameter ranges are clamped on
//! ingress, never rejected, which lets hosts pass arbitrary UI values.

use crate::colorspace::ColorSpace;

/// Smallest usable block size for the nodal grid
pub const MIN_BLOCK_SIZE: u8 = 2;
/// Largest number of low bits the quantizer may discard
pub const MAX_DISCARD_BITS: u8 = 6;

/// Encoder options
///
/// Carries the image geometry plus the knobs of the nodal skeleton.
/// Options not understood by a particular encoder are ignored, e.g.
/// the QOI residual encoder only reads the geometry.
#[derive(Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderOptions {
    width:        usize,
    height:       usize,
    colorspace:   ColorSpace,
    block_size:   u8,
    discard_bits: u8,
    smooth:       bool,
    num_threads:  u8
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            width:        0,
            height:       0,
            colorspace:   ColorSpace::RGBA,
            block_size:   8,
            discard_bits: 0,
            smooth:       true,
            num_threads:  4
        }
    }
}

impl EncoderOptions {
    /// Create new options for an image of the given dimensions
    ///
    /// The remaining knobs start from their defaults: block size 8,
    /// no discarded bits, smooth reconstruction, four threads.
    pub fn new(width: usize, height: usize) -> EncoderOptions {
        EncoderOptions {
            width,
            height,
            ..Default::default()
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    /// Nodal block size after ingress clamping, always in `[2,255]`
    pub const fn block_size(&self) -> u8 {
        self.block_size
    }

    /// Quantizer width after ingress clamping, always in `[0,6]`
    pub const fn discard_bits(&self) -> u8 {
        self.discard_bits
    }

    /// Whether preview reconstruction interpolates between nodes
    pub const fn smooth(&self) -> bool {
        self.smooth
    }

    /// Number of threads an encoder may use where the `threads`
    /// feature is enabled, `0` and `1` force single threaded encoding
    pub const fn num_threads(&self) -> u8 {
        self.num_threads
    }

    #[must_use]
    pub fn set_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn set_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn set_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }

    /// Set the side length of a nodal tile in pixels
    ///
    /// Values below [`MIN_BLOCK_SIZE`] are clamped up to it.
    #[must_use]
    pub fn set_block_size(mut self, block_size: u8) -> Self {
        self.block_size = block_size.max(MIN_BLOCK_SIZE);
        self
    }

    /// Set how many low bits each nodal value drops before storage
    ///
    /// `0` keeps the codec lossless. Values above
    /// [`MAX_DISCARD_BITS`] are clamped down to it.
    #[must_use]
    pub fn set_discard_bits(mut self, discard_bits: u8) -> Self {
        self.discard_bits = discard_bits.min(MAX_DISCARD_BITS);
        self
    }

    /// Set whether previews interpolate between nodes instead of
    /// filling each tile with a flat color
    #[must_use]
    pub fn set_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    #[must_use]
    pub fn set_num_threads(mut self, num_threads: u8) -> Self {
        self.num_threads = num_threads;
        self
    }
}

/// Decoder options
///
/// Shared restrictions every parser under the `kmr` umbrella
/// respects, e.g. dimension limits to prevent OOM on hostile input.
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    max_width:   usize,
    max_height:  usize,
    strict_mode: bool
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            max_width:   1 << 14,
            max_height:  1 << 14,
            strict_mode: false
        }
    }
}

impl DecoderOptions {
    /// Maximum width for which decoders will not try to decode
    /// images larger than the specified width
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// Maximum height for which decoders will not try to decode
    /// images larger than the specified height
    pub const fn max_height(&self) -> usize {
        self.max_height
    }

    /// Whether recoverable stream defects are errors
    ///
    /// When false such defects are logged and decoding continues.
    pub const fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    #[must_use]
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    #[must_use]
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    #[must_use]
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::EncoderOptions;

    #[test]
    fn out_of_range_values_clamp() {
        let options = EncoderOptions::new(10, 10)
            .set_block_size(0)
            .set_discard_bits(200);

        assert_eq!(options.block_size(), 2);
        assert_eq!(options.discard_bits(), 6);
    }
}
