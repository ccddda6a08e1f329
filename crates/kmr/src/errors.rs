/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use kmr_core::bytestream::ZByteIoError;
use kmr_huffman::HuffmanDecodeErrors;
use kmr_qoi::{QoiEncodeErrors, QoiErrors};

/// Possible errors that may occur when decoding a `.kmr` container
pub enum KmrErrors {
    /// The container does not start with the magic bytes `KMR1`
    WrongMagicBytes,
    /// The container version is not one we can decode
    UnsupportedVersion(u8),
    /// The buffer is too short to hold a container header
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is the number of bytes present
    InsufficientData(usize, usize),
    /// The header and the four section lengths do not sum to the
    /// buffer length
    ///
    /// # Arguments
    /// - 1st argument is the total length the header promises
    /// - 2nd argument is the actual buffer length
    SectionLengthMismatch(usize, usize),
    /// A header dimension exceeds the configured decoder limit
    TooLargeDimensions(&'static str, usize, usize),
    /// The header declares a zero width or height
    ZeroDimension,
    /// The residual stream declares different dimensions than the
    /// container header
    ///
    /// # Arguments
    /// - 1st argument is `(width, height)` from the container header
    /// - 2nd argument is `(width, height)` from the residual stream
    DimensionMismatch((usize, usize), (usize, usize)),
    /// Decoding the residual stream failed
    Qoi(QoiErrors),
    /// Decoding a nodal skeleton stream failed
    Huffman(HuffmanDecodeErrors),
    /// Too small output buffer for the decoded image
    TooSmallOutput(usize, usize),
    IoErrors(ZByteIoError)
}

impl Debug for KmrErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            KmrErrors::WrongMagicBytes => {
                writeln!(f, "Wrong magic bytes, expected `KMR1` as container start")
            }
            KmrErrors::UnsupportedVersion(version) => {
                writeln!(f, "Unsupported container version {version}, expected 1")
            }
            KmrErrors::InsufficientData(expected, found) => {
                writeln!(
                    f,
                    "Insufficient data, a container header needs {expected} bytes but found {found}"
                )
            }
            KmrErrors::SectionLengthMismatch(expected, found) => {
                writeln!(
                    f,
                    "Section lengths promise a total of {expected} bytes but the buffer holds {found}"
                )
            }
            KmrErrors::TooLargeDimensions(axis, found, limit) => {
                writeln!(f, "Image {axis} {found} greater than configured limit {limit}")
            }
            KmrErrors::ZeroDimension => {
                writeln!(f, "The container declares a zero width or height")
            }
            KmrErrors::DimensionMismatch(header, qoi) => {
                writeln!(
                    f,
                    "Residual stream dimensions {qoi:?} do not match the container header {header:?}"
                )
            }
            KmrErrors::Qoi(error) => {
                writeln!(f, "Residual stream decoding failed: {error:?}")
            }
            KmrErrors::Huffman(error) => {
                writeln!(f, "Nodal stream decoding failed: {error:?}")
            }
            KmrErrors::TooSmallOutput(expected, found) => {
                writeln!(f, "Too small output, expected {expected} bytes but buffer holds {found}")
            }
            KmrErrors::IoErrors(error) => {
                writeln!(f, "I/O error {error:?}")
            }
        }
    }
}

impl Display for KmrErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KmrErrors {}

impl From<QoiErrors> for KmrErrors {
    fn from(value: QoiErrors) -> Self {
        KmrErrors::Qoi(value)
    }
}

impl From<HuffmanDecodeErrors> for KmrErrors {
    fn from(value: HuffmanDecodeErrors) -> Self {
        KmrErrors::Huffman(value)
    }
}

impl From<ZByteIoError> for KmrErrors {
    fn from(value: ZByteIoError) -> Self {
        KmrErrors::IoErrors(value)
    }
}

/// Errors encountered when encoding into a `.kmr` container
pub enum KmrEncodeErrors {
    /// The options declare a zero width or height
    ZeroDimension,
    /// A dimension exceeds the `2^31 - 1` the container supports
    TooLargeDimensions(usize),
    /// Pixel buffer length does not match `width * height * 4`
    WrongInputSize(usize, usize),
    /// An encoded section grew past what a header field can store
    TooLargeSection(usize),
    /// Encoding the residual stream failed
    Qoi(QoiEncodeErrors)
}

impl Debug for KmrEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            KmrEncodeErrors::ZeroDimension => {
                writeln!(f, "Cannot encode an image with a zero width or height")
            }
            KmrEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimension {found}, the container stores dimensions below 2^31"
                )
            }
            KmrEncodeErrors::WrongInputSize(expected, found) => {
                writeln!(
                    f,
                    "Expected a pixel buffer of {expected} bytes but found {found}"
                )
            }
            KmrEncodeErrors::TooLargeSection(found) => {
                writeln!(
                    f,
                    "Encoded section of {found} bytes cannot be stored in a u32 header field"
                )
            }
            KmrEncodeErrors::Qoi(error) => {
                writeln!(f, "Residual stream encoding failed: {error:?}")
            }
        }
    }
}

impl Display for KmrEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KmrEncodeErrors {}

impl From<QoiEncodeErrors> for KmrEncodeErrors {
    fn from(value: QoiEncodeErrors) -> Self {
        KmrEncodeErrors::Qoi(value)
    }
}
