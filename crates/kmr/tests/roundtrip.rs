/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use kmr::{KmrDecoder, KmrEncoder, KmrErrors};
use kmr_core::options::EncoderOptions;
use kmr_huffman::HuffmanEncoder;
use kmr_qoi::QoiEncoder;

/// Deterministic pixel noise so failures reproduce
fn noise_image(width: usize, height: usize, mut seed: u64) -> Vec<u8> {
    (0..4 * width * height)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed as u8
        })
        .collect()
}

#[test]
fn lossless_round_trip_over_parameter_grid() {
    for (width, height) in [(16_usize, 16_usize), (17, 13), (1, 1), (40, 3)] {
        let pixels = noise_image(width, height, 0xABCD_EF01_2345_6789);

        for block_size in [2_u8, 4, 8, 16, 32] {
            for smooth in [true, false] {
                let options = EncoderOptions::new(width, height)
                    .set_block_size(block_size)
                    .set_discard_bits(0)
                    .set_smooth(smooth);

                let container = KmrEncoder::new(&pixels, options).encode().unwrap();
                let mut decoder = KmrDecoder::new(&container);
                let decoded = decoder.decode().unwrap();

                assert_eq!(
                    pixels, decoded,
                    "lossless round trip failed for {width}x{height} b={block_size} s={smooth}"
                );
            }
        }
    }
}

#[test]
fn encoding_is_deterministic() {
    let pixels = noise_image(33, 21, 42);
    let options = EncoderOptions::new(33, 21).set_discard_bits(2);

    let first = KmrEncoder::new(&pixels, options).encode().unwrap();
    let second = KmrEncoder::new(&pixels, options).encode().unwrap();

    assert_eq!(first, second);
}

#[test]
fn container_length_is_header_plus_sections() {
    let pixels = noise_image(20, 20, 7);
    let container = KmrEncoder::new(&pixels, EncoderOptions::new(20, 20))
        .encode()
        .unwrap();

    let mut decoder = KmrDecoder::new(&container);
    decoder.decode_headers().unwrap();

    let sections: usize = decoder.section_lengths().unwrap().iter().sum();
    assert_eq!(container.len(), 32 + sections);
}

#[test]
fn grid_size_matches_ceil_division() {
    let pixels = noise_image(17, 9, 3);
    let options = EncoderOptions::new(17, 9).set_block_size(4);

    let container = KmrEncoder::new(&pixels, options).encode().unwrap();
    let mut decoder = KmrDecoder::new(&container);
    decoder.decode().unwrap();

    // ceil(17/4) x ceil(9/4)
    assert_eq!(decoder.grid_dimensions(), Some((5, 3)));

    let (nodes_y, nodes_cb, nodes_cr) = decoder.nodal_grids();
    assert_eq!(nodes_y.len(), 15);
    assert_eq!(nodes_cb.len(), 15);
    assert_eq!(nodes_cr.len(), 15);
}

#[test]
fn parameters_survive_the_container() {
    let pixels = noise_image(10, 10, 11);
    let options = EncoderOptions::new(10, 10)
        .set_block_size(16)
        .set_discard_bits(3)
        .set_smooth(false);

    let container = KmrEncoder::new(&pixels, options).encode().unwrap();
    let mut decoder = KmrDecoder::new(&container);
    decoder.decode_headers().unwrap();

    assert_eq!(decoder.dimensions(), Some((10, 10)));
    assert_eq!(decoder.block_size(), Some(16));
    assert_eq!(decoder.discard_bits(), Some(3));
    assert_eq!(decoder.smooth(), Some(false));
}

#[test]
fn alpha_is_exact_even_when_lossy() {
    let mut pixels = noise_image(12, 12, 99);
    // varied alpha
    for (i, chunk) in pixels.chunks_exact_mut(4).enumerate() {
        chunk[3] = (i * 5) as u8;
    }

    let options = EncoderOptions::new(12, 12).set_discard_bits(4);
    let container = KmrEncoder::new(&pixels, options).encode().unwrap();
    let decoded = KmrDecoder::new(&container).decode().unwrap();

    for (src, out) in pixels.chunks_exact(4).zip(decoded.chunks_exact(4)) {
        assert_eq!(src[3], out[3]);
    }
}

#[test]
fn checkerboard_flattens_to_uniform_gray() {
    // 4x4 checkerboard, every 2x2 tile averages to mid gray; with
    // two discarded bits and flat reconstruction the decoded image
    // is that gray everywhere
    let mut pixels = Vec::new();
    for y in 0..4 {
        for x in 0..4_usize {
            let v = if (x + y) % 2 == 0 { 0 } else { 255 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }

    let options = EncoderOptions::new(4, 4)
        .set_block_size(2)
        .set_discard_bits(2)
        .set_smooth(false);

    let container = KmrEncoder::new(&pixels, options).encode().unwrap();
    let decoded = KmrDecoder::new(&container).decode().unwrap();

    for chunk in decoded.chunks_exact(4) {
        assert_eq!(chunk, [128, 128, 128, 255]);
    }
}

#[test]
fn bad_magic_is_rejected() {
    let pixels = noise_image(4, 4, 1);
    let mut container = KmrEncoder::new(&pixels, EncoderOptions::new(4, 4))
        .encode()
        .unwrap();
    container[0] = b'X';

    let result = KmrDecoder::new(&container).decode();
    assert!(matches!(result, Err(KmrErrors::WrongMagicBytes)));
}

#[test]
fn unknown_version_is_rejected() {
    let pixels = noise_image(4, 4, 1);
    let mut container = KmrEncoder::new(&pixels, EncoderOptions::new(4, 4))
        .encode()
        .unwrap();
    container[4] = 2;

    let result = KmrDecoder::new(&container).decode();
    assert!(matches!(result, Err(KmrErrors::UnsupportedVersion(2))));
}

#[test]
fn truncated_container_is_rejected() {
    let pixels = noise_image(8, 8, 5);
    let container = KmrEncoder::new(&pixels, EncoderOptions::new(8, 8))
        .encode()
        .unwrap();

    let result = KmrDecoder::new(&container[..container.len() - 1]).decode();
    assert!(matches!(result, Err(KmrErrors::SectionLengthMismatch(_, _))));

    let result = KmrDecoder::new(&container[..16]).decode();
    assert!(matches!(result, Err(KmrErrors::InsufficientData(32, 16))));
}

#[test]
fn residual_dimension_mismatch_is_rejected() {
    // hand build a container whose header says 2x2 while the
    // residual stream says 3x3
    let residual = vec![0_u8; 4 * 3 * 3];
    let qoi = QoiEncoder::new(&residual, EncoderOptions::new(3, 3))
        .encode()
        .unwrap();
    // one node per channel for the 2x2 header with block size 2
    let huf = HuffmanEncoder::new(&[128]).encode();

    let mut container = Vec::new();
    container.extend_from_slice(b"KMR1");
    container.push(1);
    // block size, discard bits, smooth
    container.extend_from_slice(&[2, 0, 1]);
    container.extend_from_slice(&2_u32.to_be_bytes());
    container.extend_from_slice(&2_u32.to_be_bytes());
    container.extend_from_slice(&(qoi.len() as u32).to_be_bytes());
    for _ in 0..3 {
        container.extend_from_slice(&(huf.len() as u32).to_be_bytes());
    }
    container.extend_from_slice(&qoi);
    for _ in 0..3 {
        container.extend_from_slice(&huf);
    }

    let result = KmrDecoder::new(&container).decode();
    assert!(matches!(
        result,
        Err(KmrErrors::DimensionMismatch((2, 2), (3, 3)))
    ));
}

#[test]
fn tiny_block_sizes_are_clamped_on_read() {
    // a foreign container may carry a block byte below 2, the
    // decoder clamps before deriving the grid
    let pixels = noise_image(6, 6, 2);
    let options = EncoderOptions::new(6, 6).set_block_size(2);
    let mut container = KmrEncoder::new(&pixels, options).encode().unwrap();
    assert_eq!(container[5], 2);
    container[5] = 1;

    let mut decoder = KmrDecoder::new(&container);
    decoder.decode_headers().unwrap();
    assert_eq!(decoder.block_size(), Some(1));
    assert_eq!(decoder.effective_block_size(), Some(2));
    assert_eq!(decoder.grid_dimensions(), Some((3, 3)));
}
