/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use kmr_core::bytestream::ZByteWriter;
use kmr_core::log::trace;
use kmr_core::options::EncoderOptions;
use kmr_huffman::HuffmanEncoder;
use kmr_qoi::QoiEncoder;

use crate::constants::{KMR_HEADER_SIZE, KMR_MAGIC, KMR_VERSION};
use crate::errors::KmrEncodeErrors;
use crate::nodal::{extract_nodes, reconstruct_preview, NodalGrids};
use crate::paeth;

/// Largest width or height a container header can carry
const MAX_DIMENSION: usize = (1 << 31) - 1;

/// A `.kmr` container encoder
///
/// Splits the image into a coarse nodal skeleton and a per-pixel
/// residual against the preview rebuilt from that skeleton. With
/// `discard_bits` at 0 the preview is the image itself and decoding
/// returns the input byte for byte.
///
/// # Example
/// ```
/// use kmr::KmrEncoder;
/// use kmr_core::options::EncoderOptions;
///
/// let pixels = [128_u8; 4 * 8 * 8];
/// let options = EncoderOptions::new(8, 8).set_block_size(4);
///
/// let container = KmrEncoder::new(&pixels, options).encode().unwrap();
/// assert_eq!(&container[..4], b"KMR1");
/// ```
pub struct KmrEncoder<'a> {
    pixel_data: &'a [u8],
    options:    EncoderOptions
}

impl<'a> KmrEncoder<'a> {
    /// Create a new encoder
    ///
    /// # Arguments
    /// - `data`: RGBA pixels, row major, `4 * width * height` bytes
    /// - `options`: Geometry and skeleton parameters
    pub const fn new(data: &'a [u8], options: EncoderOptions) -> KmrEncoder<'a> {
        KmrEncoder {
            pixel_data: data,
            options
        }
    }

    /// Return the maximum size the container can reach
    ///
    /// Sums the fixed header, the residual stream worst case and the
    /// three nodal stream worst cases.
    pub fn max_size(&self) -> usize {
        let (grid_width, grid_height) = crate::nodal::grid_dimensions(
            self.options.width().max(1),
            self.options.height().max(1),
            usize::from(self.options.block_size())
        );
        let nodes = grid_width * grid_height;

        KMR_HEADER_SIZE
            + QoiEncoder::new(&[], self.options).max_size()
            + 3 * HuffmanEncoder::new(&[]).max_size().saturating_add(3 * nodes)
    }

    /// Encode the image, returning the complete container
    pub fn encode(&self) -> Result<Vec<u8>, KmrEncodeErrors> {
        let width = self.options.width();
        let height = self.options.height();

        if width == 0 || height == 0 {
            return Err(KmrEncodeErrors::ZeroDimension);
        }
        if width > MAX_DIMENSION {
            return Err(KmrEncodeErrors::TooLargeDimensions(width));
        }
        if height > MAX_DIMENSION {
            return Err(KmrEncodeErrors::TooLargeDimensions(height));
        }

        let expected_len = 4 * width * height;
        if self.pixel_data.len() != expected_len {
            return Err(KmrEncodeErrors::WrongInputSize(
                expected_len,
                self.pixel_data.len()
            ));
        }

        let block = usize::from(self.options.block_size());
        let discard_bits = self.options.discard_bits();

        let grids = extract_nodes(self.pixel_data, width, height, block, discard_bits);

        // with nothing discarded the skeleton is diagnostic only and
        // the image itself is the authoritative preview
        let residual = if discard_bits == 0 {
            paeth::residual(self.pixel_data, self.pixel_data, width, height)
        } else {
            let preview =
                reconstruct_preview(&grids, width, height, block, self.options.smooth());
            paeth::residual(&preview, self.pixel_data, width, height)
        };

        let qoi = QoiEncoder::new(&residual, self.options).encode()?;
        let (huf_y, huf_cb, huf_cr) = self.encode_nodes(&grids);

        trace!(
            "kmr: residual {} bytes, nodal {}+{}+{} bytes",
            qoi.len(),
            huf_y.len(),
            huf_cb.len(),
            huf_cr.len()
        );

        let mut out =
            Vec::with_capacity(KMR_HEADER_SIZE + qoi.len() + huf_y.len() + huf_cb.len() + huf_cr.len());
        let mut stream = ZByteWriter::new(&mut out);

        stream.write_u32_be(KMR_MAGIC);
        stream.write_u8(KMR_VERSION);
        stream.write_u8(self.options.block_size());
        stream.write_u8(discard_bits);
        stream.write_u8(u8::from(self.options.smooth()));
        stream.write_u32_be(width as u32);
        stream.write_u32_be(height as u32);
        stream.write_u32_be(section_length(&qoi)?);
        stream.write_u32_be(section_length(&huf_y)?);
        stream.write_u32_be(section_length(&huf_cb)?);
        stream.write_u32_be(section_length(&huf_cr)?);

        stream.write_all(&qoi);
        stream.write_all(&huf_y);
        stream.write_all(&huf_cb);
        stream.write_all(&huf_cr);

        Ok(out)
    }

    /// Entropy code the three nodal grids
    ///
    /// The streams are independent, with the `threads` feature and
    /// more than one configured thread they are computed on scoped
    /// threads; the output bytes are identical either way and the
    /// container always stores them in Y, Cb, Cr order.
    #[cfg(feature = "threads")]
    fn encode_nodes(&self, grids: &NodalGrids) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        if self.options.num_threads() > 1 {
            std::thread::scope(|scope| {
                let huf_y = scope.spawn(|| HuffmanEncoder::new(&grids.y).encode());
                let huf_cb = scope.spawn(|| HuffmanEncoder::new(&grids.cb).encode());
                let huf_cr = HuffmanEncoder::new(&grids.cr).encode();

                (huf_y.join().unwrap(), huf_cb.join().unwrap(), huf_cr)
            })
        } else {
            encode_nodes_sequential(grids)
        }
    }

    #[cfg(not(feature = "threads"))]
    fn encode_nodes(&self, grids: &NodalGrids) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        encode_nodes_sequential(grids)
    }
}

fn encode_nodes_sequential(grids: &NodalGrids) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    (
        HuffmanEncoder::new(&grids.y).encode(),
        HuffmanEncoder::new(&grids.cb).encode(),
        HuffmanEncoder::new(&grids.cr).encode()
    )
}

fn section_length(section: &[u8]) -> Result<u32, KmrEncodeErrors> {
    u32::try_from(section.len()).map_err(|_| KmrEncodeErrors::TooLargeSection(section.len()))
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kmr_core::options::EncoderOptions;

    use crate::errors::KmrEncodeErrors;
    use crate::KmrEncoder;

    #[test]
    fn zero_dimensions_are_rejected() {
        let result = KmrEncoder::new(&[], EncoderOptions::new(0, 4)).encode();
        assert!(matches!(result, Err(KmrEncodeErrors::ZeroDimension)));
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        let pixels = [0_u8; 4 * 3];
        let result = KmrEncoder::new(&pixels, EncoderOptions::new(2, 2)).encode();
        assert!(matches!(result, Err(KmrEncodeErrors::WrongInputSize(16, 12))));
    }

    #[test]
    fn lossy_decode_reproduces_the_preview_exactly() {
        // the preview is the authoritative image once bits were
        // discarded: decoded RGB must match it byte for byte while
        // alpha comes from the source
        use crate::nodal::{extract_nodes, reconstruct_preview};
        use crate::KmrDecoder;

        let (width, height) = (13_usize, 9_usize);
        let mut pixels = Vec::new();
        for i in 0..(width * height) as u32 {
            pixels.extend_from_slice(&[(i * 7) as u8, (i * 3) as u8, 255 - i as u8, (i * 11) as u8]);
        }

        for smooth in [true, false] {
            let options = EncoderOptions::new(width, height)
                .set_block_size(4)
                .set_discard_bits(3)
                .set_smooth(smooth);

            let grids = extract_nodes(&pixels, width, height, 4, 3);
            let preview = reconstruct_preview(&grids, width, height, 4, smooth);

            let container = KmrEncoder::new(&pixels, options).encode().unwrap();
            let decoded = KmrDecoder::new(&container).decode().unwrap();

            for offset in (0..decoded.len()).step_by(4) {
                assert_eq!(&decoded[offset..offset + 3], &preview[offset..offset + 3]);
                assert_eq!(decoded[offset + 3], pixels[offset + 3]);
            }
        }
    }

    #[test]
    fn container_length_matches_sections() {
        let mut pixels = Vec::new();
        for i in 0..(8 * 8_u32) {
            pixels.extend_from_slice(&[i as u8, (i * 3) as u8, (i * 5) as u8, 255]);
        }

        let container = KmrEncoder::new(&pixels, EncoderOptions::new(8, 8))
            .encode()
            .unwrap();

        let section = |offset: usize| -> usize {
            u32::from_be_bytes(container[offset..offset + 4].try_into().unwrap()) as usize
        };
        let total = 32 + section(16) + section(20) + section(24) + section(28);

        assert_eq!(container.len(), total);
    }
}
