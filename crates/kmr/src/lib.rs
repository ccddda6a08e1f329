/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Encoding and decoding the kmr image format
//!
//! kmr is a hybrid lossless/near-lossless codec for RGBA rasters. An
//! image is decomposed into two complementary streams packed into one
//! self describing `.kmr` container:
//!
//! - a nodal skeleton, one averaged YCbCr triple per BxB tile,
//!   entropy coded with delta + run length + canonical Huffman
//! - a per pixel residual of a Paeth predictor over the preview
//!   rebuilt from the skeleton, coded as a QOI stream
//!
//! With `discard_bits` at 0 the preview is the source image itself
//! and the codec is lossless; otherwise decoding reproduces the
//! quantized preview exactly.
//!
//! # Example
//! - Encode and decode an 8x8 image
//!
//! ```
//! use kmr::{KmrDecoder, KmrEncoder};
//! use kmr_core::options::EncoderOptions;
//!
//! let pixels: Vec<u8> = (0..4 * 8 * 8).map(|i| (i % 256) as u8).collect();
//! let options = EncoderOptions::new(8, 8).set_block_size(4);
//!
//! let container = KmrEncoder::new(&pixels, options).encode().unwrap();
//!
//! let mut decoder = KmrDecoder::new(&container);
//! let decoded = decoder.decode().unwrap();
//! assert_eq!(pixels, decoded);
//! ```
//!
//! # Features
//! - `std`: on by default, enables `std::error::Error` impls
//! - `threads`: encode the three nodal streams on scoped threads,
//!   output bytes are identical to the single threaded encoder

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use kmr_core;

pub mod constants;
mod decoder;
mod encoder;
mod errors;
mod nodal;
mod paeth;
