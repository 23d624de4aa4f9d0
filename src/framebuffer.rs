//! Page raster.
//!
//! A SIMD-aligned RGBA pixel buffer that the raster device draws pages into.
//! Uses trueno for the vectorised statistics used to inspect rendered pages.

use crate::color::Rgba;
use crate::error::{Error, Result};
use trueno::Vector;

/// Alignment for SIMD operations (64 bytes for AVX-512).
const SIMD_ALIGNMENT: usize = 64;

/// Largest page edge accepted, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// SIMD-aligned framebuffer for one plot page.
///
/// Rows are padded to a 64-byte stride so that row fills vectorise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// RGBA pixels in row-major order, `stride` bytes per row.
    pixels: Vec<u8>,
    /// Stride in bytes (may include padding for alignment).
    stride: usize,
}

impl Framebuffer {
    /// Create a new framebuffer with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero or exceeds [`MAX_DIMENSION`].
    ///
    /// # Example
    ///
    /// ```
    /// use shadeplot::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert_eq!(fb.height(), 600);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + SIMD_ALIGNMENT - 1) & !(SIMD_ALIGNMENT - 1);
        let pixels = vec![0; stride * (height as usize)];

        Ok(Self {
            width,
            height,
            pixels,
            stride,
        })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the stride (row width in bytes, including any padding).
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Get the total number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Get a row of pixels as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        let end = start + (self.width as usize) * 4;
        Some(&self.pixels[start..end])
    }

    /// Clear the framebuffer to a solid color.
    ///
    /// Rows are filled from a 64-byte (16 pixel) pattern so the copy
    /// vectorises.
    pub fn clear(&mut self, color: Rgba) {
        let [r, g, b, a] = color.to_array();

        let pattern: [u8; 64] = {
            let mut p = [0u8; 64];
            for px in p.chunks_exact_mut(4) {
                px.copy_from_slice(&[r, g, b, a]);
            }
            p
        };

        for y in 0..self.height {
            let row_start = (y as usize) * self.stride;
            let row_end = row_start + (self.width as usize) * 4;
            let row = &mut self.pixels[row_start..row_end];

            let mut offset = 0;
            while offset + 64 <= row.len() {
                row[offset..offset + 64].copy_from_slice(&pattern);
                offset += 64;
            }
            for chunk in row[offset..].chunks_exact_mut(4) {
                chunk.copy_from_slice(&[r, g, b, a]);
            }
        }
    }

    /// Fill the half-open horizontal span `[x0, x1)` on row `y`.
    ///
    /// Spans are clipped to the buffer; fully outside spans are ignored.
    pub fn fill_span(&mut self, x0: i64, x1: i64, y: i64, color: Rgba) {
        if y < 0 || y >= i64::from(self.height) {
            return;
        }
        let x0 = x0.clamp(0, i64::from(self.width)) as usize;
        let x1 = x1.clamp(0, i64::from(self.width)) as usize;
        if x0 >= x1 {
            return;
        }

        let [r, g, b, a] = color.to_array();
        let start = (y as usize) * self.stride + x0 * 4;
        let end = (y as usize) * self.stride + x1 * 4;
        for chunk in self.pixels[start..end].chunks_exact_mut(4) {
            chunk.copy_from_slice(&[r, g, b, a]);
        }
    }

    /// Get the color at a specific pixel coordinate.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Set the color at a specific pixel coordinate.
    ///
    /// Does nothing if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Set a pixel given signed coordinates, ignoring anything off the page.
    #[inline]
    pub fn plot(&mut self, x: i64, y: i64, color: Rgba) {
        if x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height) {
            self.set_pixel(x as u32, y as u32, color);
        }
    }

    /// Count pixels that exactly match `color`.
    #[must_use]
    pub fn count_color(&self, color: Rgba) -> usize {
        let target = color.to_array();
        (0..self.height)
            .filter_map(|y| self.row(y))
            .map(|row| row.chunks_exact(4).filter(|px| *px == target).count())
            .sum()
    }

    /// Luminance statistics using SIMD-accelerated reduction.
    ///
    /// Returns (min_luminance, max_luminance, avg_luminance).
    #[must_use]
    pub fn luminance_stats(&self) -> (f32, f32, f32) {
        let mut luminances = Vec::with_capacity(self.pixel_count());

        for y in 0..self.height {
            if let Some(row) = self.row(y) {
                for chunk in row.chunks_exact(4) {
                    // ITU-R BT.709
                    let lum = 0.2126 * f32::from(chunk[0])
                        + 0.7152 * f32::from(chunk[1])
                        + 0.0722 * f32::from(chunk[2]);
                    luminances.push(lum);
                }
            }
        }

        let vec = Vector::from_vec(luminances);

        let min = vec.min().unwrap_or(0.0);
        let max = vec.max().unwrap_or(255.0);
        let mean = vec.mean().unwrap_or(127.5);

        (min, max, mean)
    }

    /// Calculate the byte index for a pixel coordinate.
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }

    /// Get pixel data as a compact buffer without stride padding.
    ///
    /// PNG encoding expects tightly-packed rows.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;

        if self.stride == row_bytes {
            return self.pixels[..row_bytes * (self.height as usize)].to_vec();
        }

        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for y in 0..self.height {
            let start = (y as usize) * self.stride;
            compact.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        compact
    }
}
