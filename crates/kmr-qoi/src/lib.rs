/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding the Quite Ok Image format
//!
//! [Format Specification](https://qoiformat.org/qoi-specification.pdf)
//!
//! The kmr container stores its Paeth residual image as a QOI stream,
//! so this implementation is fixed to what that stream looks like:
//! four channels, sRGB colorspace byte. Residual images are noisy
//! around zero which QOI's small-difference ops pick up well.
//!
//! # Example
//! ```
//! use kmr_core::options::EncoderOptions;
//! use kmr_qoi::{QoiDecoder, QoiEncoder};
//!
//! let pixels = [127_u8, 0, 255, 255];
//! let encoded = QoiEncoder::new(&pixels, EncoderOptions::new(1, 1))
//!     .encode()
//!     .unwrap();
//!
//! let mut decoder = QoiDecoder::new(&encoded);
//! let decoded = decoder.decode().unwrap();
//! assert_eq!(&decoded, &pixels);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use decoder::*;
pub use encoder::*;
pub use errors::*;

mod constants;
mod decoder;
mod encoder;
mod errors;
