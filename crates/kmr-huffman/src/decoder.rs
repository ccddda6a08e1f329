/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;

use crate::bitio::BitReader;
use crate::errors::HuffmanDecodeErrors;
use crate::RLE_MARKER;

/// Canonical code ranges rebuilt from the `(symbol, length)` table
///
/// For every populated code length we track the first and last code,
/// plus where that length's symbols start in the table, which is all
/// a bit-at-a-time decoder needs.
struct CodeRanges {
    symbols:  Vec<u8>,
    min_code: Vec<u64>,
    max_code: Vec<Option<u64>>,
    offset:   Vec<usize>
}

impl CodeRanges {
    /// Read one symbol off the bitstream
    ///
    /// Accumulates bits MSB first until the value falls into a
    /// populated length's range.
    fn decode_symbol(&self, reader: &mut BitReader) -> Result<u8, HuffmanDecodeErrors> {
        let mut code = 0_u64;

        for length in 1..self.max_code.len() {
            code = (code << 1) | reader.read_bit()?;

            if let Some(max_code) = self.max_code[length] {
                if code <= max_code {
                    let index = self.offset[length] + (code - self.min_code[length]) as usize;
                    return Ok(self.symbols[index]);
                }
            }
        }
        Err(HuffmanDecodeErrors::InvalidCode)
    }
}

/// Entropy decoder for a nodal byte stream
///
/// The payload carries no own length, the caller supplies the number
/// of bytes the delta stream held (for a nodal grid that is
/// `grid width * grid height`), trailing pad bits are ignored.
///
/// # Example
/// ```
/// use kmr_huffman::{HuffmanDecoder, HuffmanEncoder};
///
/// let encoded = HuffmanEncoder::new(&[9, 8, 7]).encode();
/// let decoded = HuffmanDecoder::new(&encoded, 3).decode().unwrap();
/// assert_eq!(decoded, [9, 8, 7]);
/// ```
pub struct HuffmanDecoder<'a> {
    data:            &'a [u8],
    expected_length: usize
}

impl<'a> HuffmanDecoder<'a> {
    /// Create a new decoder over an encoded payload
    ///
    /// # Arguments
    /// - `data`: The encoded payload
    /// - `expected_length`: Number of bytes the decoder must produce
    pub const fn new(data: &'a [u8], expected_length: usize) -> HuffmanDecoder<'a> {
        HuffmanDecoder { data, expected_length }
    }

    /// Decode the payload, returning exactly the expected number of
    /// bytes or the error encountered on the way there
    pub fn decode(&self) -> Result<Vec<u8>, HuffmanDecodeErrors> {
        if self.expected_length == 0 {
            return Ok(Vec::new());
        }

        let (ranges, table_size) = self.parse_table()?;
        let mut reader = BitReader::new(&self.data[table_size..]);

        // undo the run length stage symbol by symbol
        let mut delta = Vec::with_capacity(self.expected_length);

        while delta.len() < self.expected_length {
            let symbol = ranges.decode_symbol(&mut reader)?;

            if symbol == RLE_MARKER {
                let run = usize::from(ranges.decode_symbol(&mut reader)?);
                let value = ranges.decode_symbol(&mut reader)?;

                if delta.len() + run > self.expected_length {
                    return Err(HuffmanDecodeErrors::RunOverflow(
                        delta.len() + run,
                        self.expected_length
                    ));
                }
                delta.resize(delta.len() + run, value);
            } else {
                delta.push(symbol);
            }
        }

        // undo the delta stage
        let mut out = Vec::with_capacity(self.expected_length);
        let mut previous = 0_u8;

        for difference in delta {
            previous = previous.wrapping_add(difference.wrapping_sub(128));
            out.push(previous);
        }
        Ok(out)
    }

    /// Parse the `(symbol, length)` table header and rebuild the
    /// canonical code ranges, returning them plus the header size
    fn parse_table(&self) -> Result<(CodeRanges, usize), HuffmanDecodeErrors> {
        let Some(count) = self.data.first() else {
            return Err(HuffmanDecodeErrors::TruncatedTable);
        };
        // 0 encodes a full 256 entry table
        let entries = if *count == 0 { 256 } else { usize::from(*count) };
        let table_size = 1 + 2 * entries;

        if self.data.len() < table_size {
            return Err(HuffmanDecodeErrors::TruncatedTable);
        }

        let mut symbols = Vec::with_capacity(entries);
        let mut lengths = Vec::with_capacity(entries);

        for pair in self.data[1..table_size].chunks_exact(2) {
            symbols.push(pair[0]);
            lengths.push(pair[1]);
        }

        // sized over all entries, a malformed table may not be sorted
        let max_length = usize::from(*lengths.iter().max().unwrap());

        let mut ranges = CodeRanges {
            symbols,
            min_code: vec![0; max_length + 1],
            max_code: vec![None; max_length + 1],
            offset:   vec![0; max_length + 1]
        };

        // replay the canonical progression the encoder used, noting
        // the first and last code of every populated length
        let mut previous_code = 0_u64;
        let mut previous_length = 0_u8;

        for (i, length) in lengths.iter().enumerate() {
            if *length == 0 {
                return Err(HuffmanDecodeErrors::InvalidTable("code length of zero"));
            }
            // codes accumulate in a u64, a table this deep cannot
            // come from any feasible input
            if *length > 64 {
                return Err(HuffmanDecodeErrors::InvalidTable("code length exceeds 64 bits"));
            }
            if i != 0 && (*length, ranges.symbols[i]) <= (previous_length, ranges.symbols[i - 1]) {
                return Err(HuffmanDecodeErrors::InvalidTable(
                    "entries not in (length, symbol) order"
                ));
            }

            let code = if i == 0 {
                0
            } else if *length == previous_length {
                previous_code + 1
            } else {
                (previous_code + 1) << (length - previous_length)
            };

            let slot = usize::from(*length);
            if ranges.max_code[slot].is_none() {
                ranges.min_code[slot] = code;
                ranges.offset[slot] = i;
            }
            ranges.max_code[slot] = Some(code);

            previous_code = code;
            previous_length = *length;
        }

        Ok((ranges, table_size))
    }
}
