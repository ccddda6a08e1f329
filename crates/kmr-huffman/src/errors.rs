/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// Possible errors that may occur when decoding a Huffman payload
pub enum HuffmanDecodeErrors {
    /// The `(symbol, length)` table header ended before the promised
    /// number of entries
    TruncatedTable,
    /// The table entries are not in canonical `(length, symbol)`
    /// order or carry a zero length
    InvalidTable(&'static str),
    /// The bitstream ended before the expected number of bytes was
    /// reconstructed
    TruncatedStream,
    /// A bit pattern matched no canonical code range
    InvalidCode,
    /// A run group would push the output past the expected length
    ///
    /// # Arguments
    /// - 1st argument is the length the run would have reached
    /// - 2nd argument is the expected output length
    RunOverflow(usize, usize)
}

impl Debug for HuffmanDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            HuffmanDecodeErrors::TruncatedTable => {
                writeln!(f, "Code table header ended before all entries were read")
            }
            HuffmanDecodeErrors::InvalidTable(reason) => {
                writeln!(f, "Invalid code table: {reason}")
            }
            HuffmanDecodeErrors::TruncatedStream => {
                writeln!(f, "Bitstream ended before the expected output length was reached")
            }
            HuffmanDecodeErrors::InvalidCode => {
                writeln!(f, "Encountered a bit pattern outside every canonical code range")
            }
            HuffmanDecodeErrors::RunOverflow(reached, expected) => {
                writeln!(
                    f,
                    "Run group overflows the output, would reach {reached} of expected {expected} bytes"
                )
            }
        }
    }
}

impl Display for HuffmanDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HuffmanDecodeErrors {}
