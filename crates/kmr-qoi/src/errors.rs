/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use kmr_core::bytestream::ZByteIoError;
use kmr_core::colorspace::ColorSpace;

/// Possible errors that may occur during decoding
pub enum QoiErrors {
    /// The stream does not start with the QOI magic bytes `qoif`
    WrongMagicBytes,
    /// The input buffer doesn't have enough bytes to fully
    /// reconstruct the image
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is the number of bytes actually left
    InsufficientData(usize, usize),
    /// The header contains an invalid channel count, the residual
    /// stream always stores `4`
    UnknownChannels(u8),
    /// The header contains an invalid colorspace value, should be
    /// `0` or `1`
    ///
    /// Ignored unless strict mode is set
    UnknownColorspace(u8),
    /// A header dimension exceeds the configured decoder limit
    ///
    /// # Arguments
    /// - 1st argument names the axis
    /// - 2nd argument is the value found in the header
    /// - 3rd argument is the configured limit
    TooLargeDimensions(&'static str, usize, usize),
    /// Too small output buffer for the decoded image
    TooSmallOutput(usize, usize),
    /// Generic message that does not need heap allocation
    GenericStatic(&'static str),
    IoErrors(ZByteIoError)
}

impl Debug for QoiErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            QoiErrors::WrongMagicBytes => {
                writeln!(f, "Wrong magic bytes, expected `qoif` as stream start")
            }
            QoiErrors::InsufficientData(expected, found) => {
                writeln!(
                    f,
                    "Insufficient data, required {expected} but remaining stream has {found}"
                )
            }
            QoiErrors::UnknownChannels(channels) => {
                writeln!(f, "Unknown channel count {channels}, residual streams store 4")
            }
            QoiErrors::UnknownColorspace(colorspace) => {
                writeln!(f, "Unknown colorspace value {colorspace}, expected 0 or 1")
            }
            QoiErrors::TooLargeDimensions(axis, found, limit) => {
                writeln!(f, "Image {axis} {found} greater than configured limit {limit}")
            }
            QoiErrors::TooSmallOutput(expected, found) => {
                writeln!(f, "Too small output, expected {expected} bytes but buffer holds {found}")
            }
            QoiErrors::GenericStatic(message) => {
                writeln!(f, "{message}")
            }
            QoiErrors::IoErrors(error) => {
                writeln!(f, "I/O error {:?}", error)
            }
        }
    }
}

impl Display for QoiErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QoiErrors {}

impl From<ZByteIoError> for QoiErrors {
    fn from(value: ZByteIoError) -> Self {
        QoiErrors::IoErrors(value)
    }
}

impl From<&'static str> for QoiErrors {
    fn from(value: &'static str) -> Self {
        QoiErrors::GenericStatic(value)
    }
}

/// Errors encountered during encoding
pub enum QoiEncodeErrors {
    /// The options carry a colorspace this encoder cannot store
    UnsupportedColorspace(ColorSpace),
    /// A dimension cannot be stored in the 32 bit header field
    TooLargeDimensions(usize),
    /// Pixel buffer length does not match `width * height * 4`
    ///
    /// # Arguments
    /// - 1st argument is the expected length
    /// - 2nd argument is the actual length
    WrongInputSize(usize, usize)
}

impl Debug for QoiEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            QoiEncodeErrors::UnsupportedColorspace(colorspace) => {
                writeln!(
                    f,
                    "Cannot encode {colorspace:?} pixels into a residual stream, only RGBA is supported"
                )
            }
            QoiEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimension {found}, the header stores dimensions as u32"
                )
            }
            QoiEncodeErrors::WrongInputSize(expected, found) => {
                writeln!(
                    f,
                    "Expected a pixel buffer of {expected} bytes but found {found}"
                )
            }
        }
    }
}

impl Display for QoiEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QoiEncodeErrors {}
