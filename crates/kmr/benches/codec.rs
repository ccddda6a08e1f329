/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kmr::{KmrDecoder, KmrEncoder};
use kmr_core::options::EncoderOptions;

const SIDE: usize = 256;

fn test_image() -> Vec<u8> {
    let mut pixels = Vec::with_capacity(4 * SIDE * SIDE);
    for y in 0..SIDE {
        for x in 0..SIDE {
            pixels.extend_from_slice(&[
                (x * 255 / SIDE) as u8,
                (y * 255 / SIDE) as u8,
                ((x + y) % 256) as u8,
                255
            ]);
        }
    }
    pixels
}

fn bench_encode(c: &mut Criterion) {
    let pixels = test_image();

    c.bench_function("encode 256x256 lossless", |b| {
        let options = EncoderOptions::new(SIDE, SIDE).set_block_size(8);
        b.iter(|| {
            let encoder = KmrEncoder::new(black_box(&pixels), options);
            encoder.encode().unwrap()
        })
    });

    c.bench_function("encode 256x256 quantized smooth", |b| {
        let options = EncoderOptions::new(SIDE, SIDE)
            .set_block_size(8)
            .set_discard_bits(3)
            .set_smooth(true);
        b.iter(|| {
            let encoder = KmrEncoder::new(black_box(&pixels), options);
            encoder.encode().unwrap()
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let pixels = test_image();
    let options = EncoderOptions::new(SIDE, SIDE).set_block_size(8);
    let container = KmrEncoder::new(&pixels, options).encode().unwrap();

    c.bench_function("decode 256x256 lossless", |b| {
        b.iter(|| {
            let mut decoder = KmrDecoder::new(black_box(&container));
            decoder.decode().unwrap()
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
