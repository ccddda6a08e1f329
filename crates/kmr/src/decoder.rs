/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;

use kmr_core::bytestream::ZByteReader;
use kmr_core::log::trace;
use kmr_core::options::{DecoderOptions, MIN_BLOCK_SIZE};
use kmr_huffman::HuffmanDecoder;
use kmr_qoi::QoiDecoder;

use crate::constants::{KMR_HEADER_SIZE, KMR_MAGIC, KMR_VERSION};
use crate::errors::KmrErrors;
use crate::nodal::grid_dimensions;
use crate::paeth;

/// A `.kmr` container decoder
///
/// The decoder is initialized by calling [`new`] and either
/// [`decode_headers`] to parse the container header or [`decode`] to
/// return the reconstructed pixels. Parameters and section lengths
/// are accessible once the headers were parsed; the nodal skeleton
/// is decoded alongside the pixels and kept for inspection.
///
/// The pixel output is derived purely from the residual stream, the
/// skeleton streams are carried and verified but rebuilding the
/// preview from them is not needed to reconstruct pixels.
///
/// [`new`]: KmrDecoder::new
/// [`decode_headers`]: KmrDecoder::decode_headers
/// [`decode`]: KmrDecoder::decode
pub struct KmrDecoder<'a> {
    stream:          ZByteReader<'a>,
    options:         DecoderOptions,
    width:           usize,
    height:          usize,
    block_size:      u8,
    discard_bits:    u8,
    smooth:          bool,
    section_lengths: [usize; 4],
    decoded_headers: bool,
    nodes_y:         Vec<u8>,
    nodes_cb:        Vec<u8>,
    nodes_cr:        Vec<u8>
}

impl<'a> KmrDecoder<'a> {
    /// Create a new decoder with the default options
    ///
    /// # Arguments
    /// - `data`: A complete `.kmr` container
    pub fn new(data: &'a [u8]) -> KmrDecoder<'a> {
        KmrDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder that obeys the specified restrictions
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> KmrDecoder<'a> {
        KmrDecoder {
            stream: ZByteReader::new(data),
            options,
            width: 0,
            height: 0,
            block_size: 0,
            discard_bits: 0,
            smooth: false,
            section_lengths: [0; 4],
            decoded_headers: false,
            nodes_y: Vec::new(),
            nodes_cb: Vec::new(),
            nodes_cr: Vec::new()
        }
    }

    /// Parse and validate the fixed container header
    ///
    /// Checks the magic, the version, the dimension limits and that
    /// the four section lengths exactly add up to the buffer length.
    pub fn decode_headers(&mut self) -> Result<(), KmrErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        if self.stream.len() < KMR_HEADER_SIZE {
            return Err(KmrErrors::InsufficientData(KMR_HEADER_SIZE, self.stream.len()));
        }

        let magic = self.stream.get_u32_be();
        if magic != KMR_MAGIC {
            return Err(KmrErrors::WrongMagicBytes);
        }

        let version = self.stream.read_u8();
        if version != KMR_VERSION {
            return Err(KmrErrors::UnsupportedVersion(version));
        }

        self.block_size = self.stream.read_u8();
        self.discard_bits = self.stream.read_u8();
        // any non zero byte means smoothing was on
        self.smooth = self.stream.read_u8() != 0;

        let width = self.stream.get_u32_be() as usize;
        let height = self.stream.get_u32_be() as usize;

        if width == 0 || height == 0 {
            return Err(KmrErrors::ZeroDimension);
        }
        if width > self.options.max_width() {
            return Err(KmrErrors::TooLargeDimensions(
                "width",
                width,
                self.options.max_width()
            ));
        }
        if height > self.options.max_height() {
            return Err(KmrErrors::TooLargeDimensions(
                "height",
                height,
                self.options.max_height()
            ));
        }

        let mut total = KMR_HEADER_SIZE;
        for length in &mut self.section_lengths {
            *length = self.stream.get_u32_be() as usize;
            total += *length;
        }

        if total != self.stream.len() {
            return Err(KmrErrors::SectionLengthMismatch(total, self.stream.len()));
        }

        self.width = width;
        self.height = height;
        self.decoded_headers = true;

        trace!("kmr: image width {}", self.width);
        trace!("kmr: image height {}", self.height);
        trace!(
            "kmr: block size {}, discard bits {}, smooth {}",
            self.block_size,
            self.discard_bits,
            self.smooth
        );

        Ok(())
    }

    /// Return the number of bytes required to hold the decoded image
    ///
    /// # Returns
    /// - `Some(usize)`: Minimum size for a buffer needed to decode
    ///   the image
    /// - `None`: Indicates the headers were not decoded yet
    pub fn output_buffer_size(&self) -> Option<usize> {
        if self.decoded_headers {
            self.width
                .checked_mul(self.height)
                .and_then(|size| size.checked_mul(4))
        } else {
            None
        }
    }

    /// Decode the container returning the reconstructed RGBA bytes
    pub fn decode(&mut self) -> Result<Vec<u8>, KmrErrors> {
        self.decode_headers()?;

        let mut output = vec![0; self.output_buffer_size().unwrap()];
        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode the container into a caller provided output buffer
    ///
    /// Returns an error if the buffer cannot hold the decoded image
    pub fn decode_into(&mut self, pixels: &mut [u8]) -> Result<(), KmrErrors> {
        self.decode_headers()?;

        let output_size = self.output_buffer_size().unwrap();
        if pixels.len() < output_size {
            return Err(KmrErrors::TooSmallOutput(output_size, pixels.len()));
        }

        let [qoi_len, huf_y_len, huf_cb_len, huf_cr_len] = self.section_lengths;

        let qoi_slice = self.stream.get_as_ref(qoi_len)?;
        let huf_y = self.stream.get_as_ref(huf_y_len)?;
        let huf_cb = self.stream.get_as_ref(huf_cb_len)?;
        let huf_cr = self.stream.get_as_ref(huf_cr_len)?;

        // the skeleton is carried for inspection, pixels do not
        // depend on it
        let (grid_width, grid_height) = self.grid_dimensions().unwrap();
        let nodes = grid_width * grid_height;

        self.nodes_y = HuffmanDecoder::new(huf_y, nodes).decode()?;
        self.nodes_cb = HuffmanDecoder::new(huf_cb, nodes).decode()?;
        self.nodes_cr = HuffmanDecoder::new(huf_cr, nodes).decode()?;

        let mut qoi_decoder = QoiDecoder::new_with_options(qoi_slice, self.options);
        let residual = qoi_decoder.decode()?;

        let qoi_dimensions = qoi_decoder.dimensions().unwrap();
        if qoi_dimensions != (self.width, self.height) {
            return Err(KmrErrors::DimensionMismatch(
                (self.width, self.height),
                qoi_dimensions
            ));
        }

        paeth::reconstruct_into(&residual, &mut pixels[..output_size], self.width, self.height);

        trace!("kmr: finished decoding image");

        Ok(())
    }

    /// Return the width and height of the image, or `None` if the
    /// headers were not decoded yet
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            return Some((self.width, self.height));
        }
        None
    }

    /// Nodal block size as stored in the container
    pub const fn block_size(&self) -> Option<u8> {
        if self.decoded_headers {
            return Some(self.block_size);
        }
        None
    }

    /// Effective block size used for the nodal grid, the stored
    /// byte clamped into its documented range
    pub const fn effective_block_size(&self) -> Option<u8> {
        if self.decoded_headers {
            let block = self.block_size;
            return Some(if block < MIN_BLOCK_SIZE { MIN_BLOCK_SIZE } else { block });
        }
        None
    }

    /// Quantizer width as stored in the container
    pub const fn discard_bits(&self) -> Option<u8> {
        if self.decoded_headers {
            return Some(self.discard_bits);
        }
        None
    }

    /// Whether the preview was reconstructed with interpolation
    pub const fn smooth(&self) -> Option<bool> {
        if self.decoded_headers {
            return Some(self.smooth);
        }
        None
    }

    /// Lengths of the QOI, Huffman(Y), Huffman(Cb) and Huffman(Cr)
    /// sections in container order
    pub const fn section_lengths(&self) -> Option<[usize; 4]> {
        if self.decoded_headers {
            return Some(self.section_lengths);
        }
        None
    }

    /// Dimensions of the nodal grid described by the header
    pub fn grid_dimensions(&self) -> Option<(usize, usize)> {
        self.effective_block_size().map(|block| {
            grid_dimensions(self.width, self.height, usize::from(block))
        })
    }

    /// The decoded nodal grids in Y, Cb, Cr order
    ///
    /// Empty before [`decode`](Self::decode) ran.
    pub fn nodal_grids(&self) -> (&[u8], &[u8], &[u8]) {
        (&self.nodes_y, &self.nodes_cb, &self.nodes_cr)
    }
}
