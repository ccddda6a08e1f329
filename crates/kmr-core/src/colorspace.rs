/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image colorspace information

/// Colorspaces the kmr crates understand
///
/// The codec itself only ever stores RGBA rasters, the remaining
/// variants describe intermediate representations and CLI inputs.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ColorSpace {
    /// Red, Green, Blue
    RGB,
    /// Red, Green, Blue, Alpha
    RGBA,
    /// Luma and blue/red chroma, the nodal skeleton representation
    YCbCr,
    /// Grayscale
    Luma
}

impl ColorSpace {
    /// Number of color channels present for a certain colorspace
    ///
    /// E.g. RGBA returns 4 since a pixel is made of R, G, B and A samples
    pub const fn num_components(&self) -> usize {
        match self {
            Self::RGB | Self::YCbCr => 3,
            Self::RGBA => 4,
            Self::Luma => 1
        }
    }

    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::RGBA)
    }
}
