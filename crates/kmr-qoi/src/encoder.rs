/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use kmr_core::bytestream::ZByteWriter;
use kmr_core::colorspace::ColorSpace;
use kmr_core::log::trace;
use kmr_core::options::EncoderOptions;

use crate::constants::{
    color_hash, QOI_END_MARKER, QOI_HEADER_SIZE, QOI_MAGIC, QOI_OP_DIFF, QOI_OP_INDEX,
    QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN, QOI_PADDING
};
use crate::QoiEncodeErrors;

/// Quite Ok Image encoder for RGBA pixels
///
/// The encoder walks the pixel buffer once, keeping the 64 entry
/// running index and emitting the shortest op that reproduces each
/// pixel. Output always declares four channels and the sRGB
/// colorspace byte.
///
/// # Example
/// ```
/// use kmr_core::options::EncoderOptions;
/// use kmr_qoi::QoiEncoder;
///
/// let pixels = [0_u8; 4 * 100 * 100];
/// let encoder = QoiEncoder::new(&pixels, EncoderOptions::new(100, 100));
/// let encoded = encoder.encode().unwrap();
/// ```
pub struct QoiEncoder<'a> {
    pixel_data: &'a [u8],
    options:    EncoderOptions
}

impl<'a> QoiEncoder<'a> {
    /// Create a new encoder
    ///
    /// # Arguments
    /// - `data`: Pixel data, its size must equal `width * height * 4`
    /// - `options`: Geometry for the data
    pub const fn new(data: &'a [u8], options: EncoderOptions) -> QoiEncoder<'a> {
        QoiEncoder {
            pixel_data: data,
            options
        }
    }

    /// Return the maximum possible size of the encoded stream
    ///
    /// The worst op per pixel is `QOI_OP_RGBA` at five bytes.
    pub fn max_size(&self) -> usize {
        QOI_HEADER_SIZE + 5 * self.options.width() * self.options.height() + QOI_PADDING
    }

    fn encode_headers(&self, writer: &mut ZByteWriter) -> Result<(), QoiEncodeErrors> {
        let options = &self.options;

        if options.colorspace() != ColorSpace::RGBA {
            return Err(QoiEncodeErrors::UnsupportedColorspace(options.colorspace()));
        }
        if (options.width() as u64) > u64::from(u32::MAX) {
            return Err(QoiEncodeErrors::TooLargeDimensions(options.width()));
        }
        if (options.height() as u64) > u64::from(u32::MAX) {
            return Err(QoiEncodeErrors::TooLargeDimensions(options.height()));
        }

        let expected_len = options.width() * options.height() * 4;
        if self.pixel_data.len() != expected_len {
            return Err(QoiEncodeErrors::WrongInputSize(
                expected_len,
                self.pixel_data.len()
            ));
        }

        writer.write_u32_be(QOI_MAGIC);
        writer.write_u32_be(options.width() as u32);
        writer.write_u32_be(options.height() as u32);
        // channels, always RGBA
        writer.write_u8(4);
        // colorspace, sRGB with linear alpha
        writer.write_u8(0);

        Ok(())
    }

    /// Encode the pixels, returning the complete stream including
    /// the end marker
    pub fn encode(&self) -> Result<Vec<u8>, QoiEncodeErrors> {
        let mut out = Vec::with_capacity(self.max_size());
        let mut stream = ZByteWriter::new(&mut out);

        self.encode_headers(&mut stream)?;

        let mut index = [[0_u8; 4]; 64];
        // starting pixel
        let mut px = [0, 0, 0, 255];
        let mut px_prev = [0, 0, 0, 255];

        let mut run: u8 = 0;

        for pix_chunk in self.pixel_data.chunks_exact(4) {
            px.copy_from_slice(pix_chunk);

            if px == px_prev {
                run += 1;

                if run == 62 {
                    stream.write_u8(QOI_OP_RUN | (run - 1));
                    run = 0;
                }
            } else {
                if run > 0 {
                    stream.write_u8(QOI_OP_RUN | (run - 1));
                    run = 0;
                }

                let index_pos = color_hash(px);

                if index[index_pos] == px {
                    stream.write_u8(QOI_OP_INDEX | (index_pos as u8));
                } else {
                    index[index_pos] = px;

                    if px[3] == px_prev[3] {
                        let vr = px[0].wrapping_sub(px_prev[0]);
                        let vg = px[1].wrapping_sub(px_prev[1]);
                        let vb = px[2].wrapping_sub(px_prev[2]);

                        let vg_r = vr.wrapping_sub(vg);
                        let vg_b = vb.wrapping_sub(vg);

                        // the wrapped bytes land outside 2..=253
                        // exactly when the signed diff is in [-2,1]
                        if !(2..=253).contains(&vr)
                            && !(2..=253).contains(&vg)
                            && !(2..=253).contains(&vb)
                        {
                            stream.write_u8(
                                QOI_OP_DIFF
                                    | vr.wrapping_add(2) << 4
                                    | vg.wrapping_add(2) << 2
                                    | vb.wrapping_add(2)
                            );
                        } else if !(32..=223).contains(&vg)
                            && !(8..=247).contains(&vg_r)
                            && !(8..=247).contains(&vg_b)
                        {
                            stream.write_u8(QOI_OP_LUMA | vg.wrapping_add(32));
                            stream.write_u8(vg_r.wrapping_add(8) << 4 | vg_b.wrapping_add(8));
                        } else {
                            stream.write_u8(QOI_OP_RGB);
                            stream.write_all(&px[0..3]);
                        }
                    } else {
                        stream.write_u8(QOI_OP_RGBA);
                        stream.write_all(&px);
                    }
                }
            }

            px_prev.copy_from_slice(&px);
        }
        if run > 0 {
            stream.write_u8(QOI_OP_RUN | (run - 1));
        }
        // trailing bytes
        stream.write_all(&QOI_END_MARKER);

        trace!("qoi: encoded {} pixels into {} bytes", self.pixel_data.len() / 4, stream.bytes_written());

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kmr_core::options::EncoderOptions;

    use crate::QoiEncoder;

    #[test]
    fn solid_color_stream_bytes() {
        // 2x2 solid red, one diff pixel then a run of three; red
        // after the implicit black start wraps to vr = -1 so the
        // first pixel fits QOI_OP_DIFF
        let pixels = [255_u8, 0, 0, 255].repeat(4);
        let encoder = QoiEncoder::new(&pixels, EncoderOptions::new(2, 2));
        let encoded = encoder.encode().unwrap();

        let mut expected: Vec<u8> = Vec::new();
        expected.extend_from_slice(b"qoif");
        expected.extend_from_slice(&[0, 0, 0, 2, 0, 0, 0, 2, 4, 0]);
        expected.push(0x40 | 1 << 4 | 2 << 2 | 2);
        expected.push(0xC0 | 2);
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);

        assert_eq!(encoded, expected);
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        let pixels = [0_u8; 7];
        let encoder = QoiEncoder::new(&pixels, EncoderOptions::new(2, 2));
        assert!(encoder.encode().is_err());
    }

    #[test]
    fn stream_never_exceeds_max_size() {
        // worst case input, every pixel changes alpha
        let mut pixels = Vec::new();
        for i in 0..64_u32 {
            pixels.extend_from_slice(&[(i * 7) as u8, (i * 13) as u8, (i * 29) as u8, i as u8]);
        }
        let encoder = QoiEncoder::new(&pixels, EncoderOptions::new(8, 8));
        let encoded = encoder.encode().unwrap();
        assert!(encoded.len() <= encoder.max_size());
    }
}
