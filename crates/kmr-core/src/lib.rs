/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Core routines shared by the kmr codec crates
//!
//! This crate provides the plumbing shared by the encoders and
//! decoders under the `kmr` umbrella
//!
//! It currently contains
//!
//! - A bytestream reader and writer with endian aware reads and writes
//! - Colorspace information shared by images
//! - Encoder and decoder options
//! - A re-export of the `log` crate so that all crates log through
//!   one facade
//!
//! The library is `#[no_std]` with the `alloc` crate needed for `Vec`
//! storage of decoded bytes.
//!
//! # Features
//!  - `std`: Enables `std::error::Error` implementations, on by default.
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use log;

pub mod bytestream;
pub mod colorspace;
pub mod options;
