/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::identity_op)]

use alloc::vec;
use alloc::vec::Vec;

use kmr_core::bytestream::ZByteReader;
use kmr_core::colorspace::ColorSpace;
use kmr_core::log::{error, trace};
use kmr_core::options::DecoderOptions;

use crate::constants::{
    color_hash, QOI_END_MARKER, QOI_HEADER_SIZE, QOI_MASK_2, QOI_OP_DIFF, QOI_OP_INDEX,
    QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN, QOI_PADDING
};
use crate::errors::QoiErrors;

/// A Quite OK Image decoder for RGBA streams
///
/// The decoder is initialized by calling [`new`] and either
/// [`decode_headers`] to parse the headers or [`decode`] to return
/// uncompressed pixels. Width and height are accessible once the
/// headers were parsed.
///
/// [`new`]: QoiDecoder::new
/// [`decode_headers`]: QoiDecoder::decode_headers
/// [`decode`]: QoiDecoder::decode
pub struct QoiDecoder<'a> {
    width:           usize,
    height:          usize,
    decoded_headers: bool,
    stream:          ZByteReader<'a>,
    options:         DecoderOptions
}

impl<'a> QoiDecoder<'a> {
    /// Create a new decoder with the default options
    ///
    /// # Arguments
    /// - `data`: The compressed qoi stream
    pub fn new(data: &'a [u8]) -> QoiDecoder<'a> {
        QoiDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder that obeys the specified restrictions
    ///
    /// E.g. can be used to set width and height limits to prevent
    /// OOM on hostile input
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> QoiDecoder<'a> {
        QoiDecoder {
            width: 0,
            height: 0,
            decoded_headers: false,
            stream: ZByteReader::new(data),
            options
        }
    }

    /// Parse the QOI header storing the image details into the
    /// decoder instance
    ///
    /// # Returns
    /// - On success: Nothing
    /// - On error: The error encountered, an instance of [QoiErrors]
    pub fn decode_headers(&mut self) -> Result<(), QoiErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        // the smallest valid stream is a header plus the end marker
        if self.stream.len() < QOI_HEADER_SIZE + QOI_PADDING {
            return Err(QoiErrors::InsufficientData(
                QOI_HEADER_SIZE + QOI_PADDING,
                self.stream.len()
            ));
        }

        let magic = self.stream.read_fixed_bytes_or_error::<4>()?;
        if &magic != b"qoif" {
            return Err(QoiErrors::WrongMagicBytes);
        }

        // length was confirmed above, the non failing reads suffice
        let width = self.stream.get_u32_be() as usize;
        let height = self.stream.get_u32_be() as usize;
        let channels = self.stream.read_u8();
        let colorspace = self.stream.read_u8();

        if width > self.options.max_width() {
            return Err(QoiErrors::TooLargeDimensions(
                "width",
                width,
                self.options.max_width()
            ));
        }
        if height > self.options.max_height() {
            return Err(QoiErrors::TooLargeDimensions(
                "height",
                height,
                self.options.max_height()
            ));
        }

        if channels != 4 {
            return Err(QoiErrors::UnknownChannels(channels));
        }
        if colorspace > 1 {
            if self.options.strict_mode() {
                return Err(QoiErrors::UnknownColorspace(colorspace));
            }
            error!("Unknown/invalid colorspace value {colorspace}, expected 0 or 1");
        }

        self.width = width;
        self.height = height;
        self.decoded_headers = true;

        trace!("qoi: image width {}", self.width);
        trace!("qoi: image height {}", self.height);

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
                .and_then(|size| size.checked_mul(ColorSpace::RGBA.num_components()))
        } else {
            None
        }
    }

    /// Decode the stream returning the uncompressed RGBA bytes
    ///
    /// The stream details, i.e. width and height, can be accessed by
    /// the [`dimensions`](Self::dimensions) method afterwards.
    pub fn decode(&mut self) -> Result<Vec<u8>, QoiErrors> {
        self.decode_headers()?;

        let mut output = vec![0; self.output_buffer_size().unwrap()];
        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode the stream into a caller provided output buffer
    ///
    /// Returns an error if the buffer cannot hold the decoded image
    ///
    /// # Arguments
    /// - `pixels`: Output buffer to which we will write decoded
    ///   pixels
    pub fn decode_into(&mut self, pixels: &mut [u8]) -> Result<(), QoiErrors> {
        self.decode_headers()?;

        let output_size = self.output_buffer_size().unwrap();
        if pixels.len() < output_size {
            return Err(QoiErrors::TooSmallOutput(output_size, pixels.len()));
        }

        let mut index = [[0_u8; 4]; 64];
        // starting pixel
        let mut px = [0, 0, 0, 255];

        let mut run = 0_usize;

        for pix_chunk in pixels[..output_size].chunks_exact_mut(4) {
            if run > 0 {
                run -= 1;
            } else {
                let chunk = self.stream.read_u8();

                if chunk == QOI_OP_RGB {
                    let bytes = self.stream.read_fixed_bytes_or_zero::<3>();
                    px[0..3].copy_from_slice(&bytes);
                } else if chunk == QOI_OP_RGBA {
                    px = self.stream.read_fixed_bytes_or_zero::<4>();
                } else if (chunk & QOI_MASK_2) == QOI_OP_INDEX {
                    px = index[usize::from(chunk) & 63];
                } else if (chunk & QOI_MASK_2) == QOI_OP_DIFF {
                    px[0] = px[0].wrapping_add(((chunk >> 4) & 0x03).wrapping_sub(2));
                    px[1] = px[1].wrapping_add(((chunk >> 2) & 0x03).wrapping_sub(2));
                    px[2] = px[2].wrapping_add(((chunk >> 0) & 0x03).wrapping_sub(2));
                } else if (chunk & QOI_MASK_2) == QOI_OP_LUMA {
                    let b2 = self.stream.read_u8();
                    let vg = (chunk & 0x3F).wrapping_sub(32);

                    px[0] = px[0].wrapping_add(vg.wrapping_sub(8).wrapping_add((b2 >> 4) & 0x0F));
                    px[1] = px[1].wrapping_add(vg);
                    px[2] = px[2].wrapping_add(vg.wrapping_sub(8).wrapping_add((b2 >> 0) & 0x0F));
                } else if (chunk & QOI_MASK_2) == QOI_OP_RUN {
                    run = usize::from(chunk & 0x3F);
                }

                // keep the running index synchronized with the
                // encoder's
                index[color_hash(px)] = px;
            }
            pix_chunk.copy_from_slice(&px);
        }

        let remaining = self.stream.read_fixed_bytes_or_error::<8>()?;
        if remaining != QOI_END_MARKER {
            if self.options.strict_mode() {
                return Err(QoiErrors::GenericStatic(
                    "Last bytes do not match the QOI end marker"
                ));
            }
            error!("Last bytes do not match the QOI end marker");
        }

        trace!("qoi: finished decoding image");

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
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kmr_core::options::{DecoderOptions, EncoderOptions};

    use crate::errors::QoiErrors;
    use crate::{QoiDecoder, QoiEncoder};

    fn round_trip(pixels: &[u8], width: usize, height: usize) {
        let encoded = QoiEncoder::new(pixels, EncoderOptions::new(width, height))
            .encode()
            .unwrap();
        let mut decoder = QoiDecoder::new(&encoded);
        let decoded = decoder.decode().unwrap();

        assert_eq!(decoder.dimensions(), Some((width, height)));
        assert_eq!(pixels, &decoded[..]);
    }

    #[test]
    fn gradient_round_trips() {
        let mut pixels = Vec::new();
        for i in 0..(16 * 16_u32) {
            pixels.extend_from_slice(&[i as u8, (i / 2) as u8, (i / 3) as u8, 255]);
        }
        round_trip(&pixels, 16, 16);
    }

    #[test]
    fn alpha_changes_round_trip() {
        let mut pixels = Vec::new();
        for i in 0..(8 * 8_u32) {
            pixels.extend_from_slice(&[128, 128, 128, (i * 4) as u8]);
        }
        round_trip(&pixels, 8, 8);
    }

    #[test]
    fn index_hits_round_trip() {
        // alternate between two colors so the second occurrence of
        // each comes out of the running index
        let mut pixels = Vec::new();
        for i in 0..(8 * 8_u32) {
            if i % 2 == 0 {
                pixels.extend_from_slice(&[200, 10, 30, 255]);
            } else {
                pixels.extend_from_slice(&[5, 90, 170, 255]);
            }
        }
        round_trip(&pixels, 8, 8);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let pixels = [0_u8; 4];
        let mut encoded = QoiEncoder::new(&pixels, EncoderOptions::new(1, 1))
            .encode()
            .unwrap();
        encoded[0] = b'X';

        let mut decoder = QoiDecoder::new(&encoded);
        assert!(matches!(
            decoder.decode(),
            Err(QoiErrors::WrongMagicBytes)
        ));
    }

    #[test]
    fn three_channel_streams_are_rejected() {
        let pixels = [0_u8; 4];
        let mut encoded = QoiEncoder::new(&pixels, EncoderOptions::new(1, 1))
            .encode()
            .unwrap();
        // channel byte lives right after magic and dimensions
        encoded[12] = 3;

        let mut decoder = QoiDecoder::new(&encoded);
        assert!(matches!(
            decoder.decode(),
            Err(QoiErrors::UnknownChannels(3))
        ));
    }

    #[test]
    fn short_streams_are_rejected() {
        let mut decoder = QoiDecoder::new(b"qoif");
        assert!(matches!(
            decoder.decode_headers(),
            Err(QoiErrors::InsufficientData(_, _))
        ));
    }

    #[test]
    fn truncated_streams_surface_an_error() {
        let mut pixels = Vec::new();
        for i in 0..(8 * 8_u32) {
            pixels.extend_from_slice(&[i as u8, 0, 0, (i % 3) as u8]);
        }
        let encoded = QoiEncoder::new(&pixels, EncoderOptions::new(8, 8))
            .encode()
            .unwrap();

        let mut decoder = QoiDecoder::new(&encoded[..encoded.len() - 12]);
        assert!(decoder.decode().is_err());
    }

    #[test]
    fn dimension_limits_are_respected() {
        let pixels = [0_u8; 4 * 4];
        let encoded = QoiEncoder::new(&pixels, EncoderOptions::new(4, 1))
            .encode()
            .unwrap();

        let options = DecoderOptions::default().set_max_width(2);
        let mut decoder = QoiDecoder::new_with_options(&encoded, options);
        assert!(matches!(
            decoder.decode(),
            Err(QoiErrors::TooLargeDimensions("width", 4, 2))
        ));
    }
}
