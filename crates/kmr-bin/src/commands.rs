/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use kmr::{KmrDecoder, KmrEncoder};
use kmr_core::options::EncoderOptions;
use log::info;

pub fn encode(args: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let input = args.get_one::<PathBuf>("in").unwrap();
    let output = match args.get_one::<PathBuf>("out") {
        Some(path) => path.clone(),
        None => input.with_extension("kmr")
    };

    let (pixels, width, height) = read_png_rgba(input)?;
    info!("Input: {} ({width}x{height})", input.display());

    let options = EncoderOptions::new(width, height)
        .set_block_size(*args.get_one::<u8>("block-size").unwrap())
        .set_discard_bits(*args.get_one::<u8>("discard-bits").unwrap())
        .set_smooth(!args.get_flag("flat"));

    let container = KmrEncoder::new(&pixels, options).encode()?;

    info!(
        "Encoded {} pixel bytes into {} ({:.2}% of raw)",
        pixels.len(),
        container.len(),
        100.0 * container.len() as f64 / pixels.len() as f64
    );

    std::fs::write(&output, &container)?;
    info!("Wrote {}", output.display());

    Ok(())
}

pub fn decode(args: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let input = args.get_one::<PathBuf>("in").unwrap();
    let output = match args.get_one::<PathBuf>("out") {
        Some(path) => path.clone(),
        None => input.with_extension("png")
    };

    let container = std::fs::read(input)?;

    let mut decoder = KmrDecoder::new(&container);
    let pixels = decoder.decode()?;

    let (width, height) = decoder.dimensions().unwrap();
    let sections = decoder.section_lengths().unwrap();

    info!("Input: {} ({width}x{height})", input.display());
    info!(
        "Container: block size {}, discard bits {}, smooth {}",
        decoder.block_size().unwrap(),
        decoder.discard_bits().unwrap(),
        decoder.smooth().unwrap()
    );
    info!(
        "Sections: qoi {} bytes, nodal {}+{}+{} bytes",
        sections[0], sections[1], sections[2], sections[3]
    );

    write_png_rgba(&output, &pixels, width, height)?;
    info!("Wrote {}", output.display());

    Ok(())
}

/// Read a PNG and normalize it to 8 bit RGBA, gray and alpha-less
/// images get expanded
fn read_png_rgba(path: &Path) -> Result<(Vec<u8>, usize, usize), Box<dyn Error>> {
    let mut decoder = png::Decoder::new(File::open(path)?);
    decoder.set_transformations(png::Transformations::normalize_to_color8());

    let mut reader = decoder.read_info()?;
    let mut buffer = vec![0_u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buffer)?;

    let width = frame.width as usize;
    let height = frame.height as usize;
    let data = &buffer[..frame.buffer_size()];

    let pixels = match frame.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => expand_rgba(data, 3),
        png::ColorType::GrayscaleAlpha => expand_rgba(data, 2),
        png::ColorType::Grayscale => expand_rgba(data, 1),
        other => return Err(format!("unsupported png color type {other:?}").into())
    };

    Ok((pixels, width, height))
}

/// Expand gray or alpha-less samples into RGBA, missing alpha
/// defaults to opaque
fn expand_rgba(data: &[u8], channels: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 * data.len() / channels);

    for chunk in data.chunks_exact(channels) {
        match channels {
            1 => out.extend_from_slice(&[chunk[0], chunk[0], chunk[0], 255]),
            2 => out.extend_from_slice(&[chunk[0], chunk[0], chunk[0], chunk[1]]),
            _ => {
                out.extend_from_slice(&chunk[..3]);
                out.push(255);
            }
        }
    }
    out
}

fn write_png_rgba(
    path: &Path, pixels: &[u8], width: usize, height: usize
) -> Result<(), Box<dyn Error>> {
    let file = BufWriter::new(File::create(path)?);

    let mut encoder = png::Encoder::new(file, width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;

    Ok(())
}
