//! Escape-time grayscale coloring.
//!
//! The mapping is fixed: `shade = 255 − ⌊n · 255 / max_iter⌋`, replicated
//! across R/G/B with opaque alpha. Points that never escape are black,
//! points that escape immediately (including formula failures) are white.

use rayon::prelude::*;

use crate::grid::IterationGrid;

/// Bytes per pixel in a [`PixelBuffer`].
pub const CHANNELS: usize = 4;

/// An RGBA8 pixel buffer, row-major, tightly packed.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// The RGBA bytes of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let offset = y as usize * self.stride() + x as usize * CHANNELS;
        &self.pixels[offset..offset + CHANNELS]
    }
}

/// The grayscale byte for an escape count of `n` out of `max_iter`.
///
/// A zero budget cannot come from a validated request, but a grid is
/// plain data; saturate to white instead of dividing by zero.
#[inline]
pub fn shade(n: u32, max_iter: u32) -> u8 {
    debug_assert!(n <= max_iter);
    if max_iter == 0 {
        return 255;
    }
    (255 - u64::from(n) * 255 / u64::from(max_iter)) as u8
}

/// Convert an iteration grid into an RGBA pixel buffer, row-parallel.
pub fn colorize(grid: &IterationGrid) -> PixelBuffer {
    let stride = grid.width as usize * CHANNELS;
    let mut pixels = vec![0u8; grid.height as usize * stride];

    pixels
        .par_chunks_mut(stride)
        .zip(grid.data.par_chunks(grid.width as usize))
        .for_each(|(pixel_row, count_row)| {
            for (rgba, &n) in pixel_row.chunks_exact_mut(CHANNELS).zip(count_row) {
                let v = shade(n, grid.max_iterations);
                rgba[0] = v;
                rgba[1] = v;
                rgba[2] = v;
                rgba[3] = 255;
            }
        });

    PixelBuffer {
        width: grid.width,
        height: grid.height,
        pixels,
    }
}
