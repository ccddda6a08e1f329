/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Nodal skeleton extraction and preview reconstruction
//!
//! The skeleton samples one YCbCr triple per BxB tile, optionally
//! dropping low bits. A preview is rebuilt from the skeleton either
//! by flat-filling each tile or by bilinear interpolation between
//! the four enclosing nodes, and that preview is what the residual
//! stage actually encodes.

use alloc::vec;
use alloc::vec::Vec;

/// The three per-channel grids sampled from an image, row major
/// with the horizontal index moving fastest
pub struct NodalGrids {
    pub y:           Vec<u8>,
    pub cb:          Vec<u8>,
    pub cr:          Vec<u8>,
    pub grid_width:  usize,
    pub grid_height: usize
}

/// Round to nearest and clamp into a byte in one step
///
/// Relies on the saturating float to int cast, negative inputs give
/// 0 and inputs past 255 give 255.
#[inline(always)]
fn round_clamp(value: f32) -> u8 {
    (value + 0.5) as u8
}

#[inline]
pub(crate) fn rgb_to_ycbcr(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.1687 * r - 0.3313 * g + 0.5 * b + 128.0;
    let cr = 0.5 * r - 0.4187 * g - 0.0813 * b + 128.0;

    (y, cb, cr)
}

#[inline]
pub(crate) fn ycbcr_to_rgb(y: f32, cb: f32, cr: f32) -> [u8; 3] {
    let r = y + 1.402 * (cr - 128.0);
    let g = y - 0.34414 * (cb - 128.0) - 0.71414 * (cr - 128.0);
    let b = y + 1.772 * (cb - 128.0);

    [round_clamp(r), round_clamp(g), round_clamp(b)]
}

/// Number of nodal tiles along each axis for an image
pub(crate) const fn grid_dimensions(width: usize, height: usize, block: usize) -> (usize, usize) {
    (width.div_ceil(block), height.div_ceil(block))
}

/// Sample one averaged YCbCr node per BxB tile
///
/// Tiles at the right and bottom edge cover whatever pixels remain.
/// Each averaged channel is rounded, clamped to a byte and then
/// quantized by zeroing the lowest `discard_bits` bits.
pub(crate) fn extract_nodes(
    pixels: &[u8], width: usize, height: usize, block: usize, discard_bits: u8
) -> NodalGrids {
    let (grid_width, grid_height) = grid_dimensions(width, height, block);

    let mut grids = NodalGrids {
        y: Vec::with_capacity(grid_width * grid_height),
        cb: Vec::with_capacity(grid_width * grid_height),
        cr: Vec::with_capacity(grid_width * grid_height),
        grid_width,
        grid_height
    };

    for gy in 0..grid_height {
        let y0 = gy * block;
        let y1 = (y0 + block).min(height);

        for gx in 0..grid_width {
            let x0 = gx * block;
            let x1 = (x0 + block).min(width);

            let mut sum_y = 0.0_f64;
            let mut sum_cb = 0.0_f64;
            let mut sum_cr = 0.0_f64;

            for y in y0..y1 {
                for x in x0..x1 {
                    let offset = 4 * (y * width + x);
                    let (py, pcb, pcr) = rgb_to_ycbcr(
                        f32::from(pixels[offset]),
                        f32::from(pixels[offset + 1]),
                        f32::from(pixels[offset + 2])
                    );
                    sum_y += f64::from(py);
                    sum_cb += f64::from(pcb);
                    sum_cr += f64::from(pcr);
                }
            }

            let count = ((x1 - x0) * (y1 - y0)) as f64;

            let (node_y, node_cb, node_cr) = if count == 0.0 {
                // only reachable for pathological block sizes
                (0, 0, 0)
            } else {
                (
                    quantize(round_clamp((sum_y / count) as f32), discard_bits),
                    quantize(round_clamp((sum_cb / count) as f32), discard_bits),
                    quantize(round_clamp((sum_cr / count) as f32), discard_bits)
                )
            };
            grids.y.push(node_y);
            grids.cb.push(node_cb);
            grids.cr.push(node_cr);
        }
    }
    grids
}

/// Zero the lowest `bits` bits of a nodal value
#[inline(always)]
const fn quantize(value: u8, bits: u8) -> u8 {
    (value >> bits) << bits
}

/// Rebuild a full resolution RGBA preview from the skeleton
///
/// With `smooth` unset every tile is filled with the flat color of
/// its node, otherwise each pixel interpolates between the four
/// enclosing nodes. Preview alpha is always opaque, the residual
/// stage carries the source alpha separately.
pub(crate) fn reconstruct_preview(
    grids: &NodalGrids, width: usize, height: usize, block: usize, smooth: bool
) -> Vec<u8> {
    if smooth {
        reconstruct_bilinear(grids, width, height, block)
    } else {
        reconstruct_flat(grids, width, height, block)
    }
}

fn reconstruct_flat(grids: &NodalGrids, width: usize, height: usize, block: usize) -> Vec<u8> {
    let mut preview = vec![255_u8; 4 * width * height];

    for gy in 0..grids.grid_height {
        let y0 = gy * block;
        let y1 = (y0 + block).min(height);

        for gx in 0..grids.grid_width {
            let x0 = gx * block;
            let x1 = (x0 + block).min(width);

            let node = gy * grids.grid_width + gx;
            let rgb = ycbcr_to_rgb(
                f32::from(grids.y[node]),
                f32::from(grids.cb[node]),
                f32::from(grids.cr[node])
            );

            for y in y0..y1 {
                for x in x0..x1 {
                    let offset = 4 * (y * width + x);
                    preview[offset..offset + 3].copy_from_slice(&rgb);
                }
            }
        }
    }
    preview
}

fn reconstruct_bilinear(grids: &NodalGrids, width: usize, height: usize, block: usize) -> Vec<u8> {
    let mut preview = vec![255_u8; 4 * width * height];

    let node = |gx: usize, gy: usize| -> (f32, f32, f32) {
        let index = gy * grids.grid_width + gx;
        (
            f32::from(grids.y[index]),
            f32::from(grids.cb[index]),
            f32::from(grids.cr[index])
        )
    };

    for y in 0..height {
        let gy = y / block;
        let gy1 = (gy + 1).min(grids.grid_height - 1);

        // tile anchors, the lower anchor is clamped into the image
        // and may collapse onto the upper one at the bottom edge
        let y0 = gy * block;
        let y1 = ((gy + 1) * block).min(height - 1);
        let ty = if y1 > y0 { (y - y0) as f32 / (y1 - y0) as f32 } else { 0.0 };

        for x in 0..width {
            let gx = x / block;
            let gx1 = (gx + 1).min(grids.grid_width - 1);

            let x0 = gx * block;
            let x1 = ((gx + 1) * block).min(width - 1);
            let tx = if x1 > x0 { (x - x0) as f32 / (x1 - x0) as f32 } else { 0.0 };

            let (y00, cb00, cr00) = node(gx, gy);
            let (y10, cb10, cr10) = node(gx1, gy);
            let (y01, cb01, cr01) = node(gx, gy1);
            let (y11, cb11, cr11) = node(gx1, gy1);

            let lerp2 = |top_left: f32, top_right: f32, bottom_left: f32, bottom_right: f32| {
                let top = top_left + (top_right - top_left) * tx;
                let bottom = bottom_left + (bottom_right - bottom_left) * tx;
                top + (bottom - top) * ty
            };

            let rgb = ycbcr_to_rgb(
                lerp2(y00, y10, y01, y11),
                lerp2(cb00, cb10, cb01, cb11),
                lerp2(cr00, cr10, cr01, cr11)
            );

            let offset = 4 * (y * width + x);
            preview[offset..offset + 3].copy_from_slice(&rgb);
        }
    }
    preview
}
