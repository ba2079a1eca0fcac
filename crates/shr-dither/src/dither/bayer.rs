//! Ordered dithering with Bayer threshold matrices.

use crate::color::Rgb;
use crate::error::ConvertError;
use crate::palette::Palette;

/// Strength of the threshold perturbation, in 8-bit channel units.
const PERTURBATION_SPAN: f32 = 32.0;

/// A Bayer threshold matrix of side 2, 4 or 8, values in `[0, 1)`.
///
/// Built by the recursive doubling construction: the rank matrix of side
/// `2n` replicates the side-`n` ranks scaled by four, offset by 0, 2, 3, 1
/// per quadrant.
#[derive(Debug, Clone, PartialEq)]
pub struct BayerMatrix {
    size: usize,
    thresholds: Vec<f32>,
}

impl BayerMatrix {
    /// Build the matrix for the given side length.
    ///
    /// Only 2, 4 and 8 are accepted.
    pub fn new(size: u32) -> Result<Self, ConvertError> {
        if !matches!(size, 2 | 4 | 8) {
            return Err(ConvertError::UnsupportedBayerSize(size));
        }
        let size = size as usize;
        let scale = (size * size) as f32;
        let thresholds = ranks(size).into_iter().map(|r| r as f32 / scale).collect();
        Ok(Self { size, thresholds })
    }

    /// Side length of the matrix.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Threshold for the pixel at absolute canvas position `(x, y)`.
    #[inline]
    pub fn threshold(&self, x: usize, y: usize) -> f32 {
        self.thresholds[(y % self.size) * self.size + (x % self.size)]
    }

    /// Quantize one scanline: each pixel is perturbed by its threshold,
    /// clamped to the byte range, and mapped to the nearest palette entry.
    ///
    /// `y` is the absolute scanline number; it keeps the tiling aligned
    /// across rows even though rows are processed independently.
    pub fn dither_row(&self, row: &[Rgb], y: usize, palette: &Palette) -> Vec<u8> {
        row.iter()
            .enumerate()
            .map(|(x, &pixel)| {
                let shift = (self.threshold(x, y) - 0.5) * PERTURBATION_SPAN;
                let source = pixel.to_f32();
                let perturbed = [
                    (source[0] + shift).clamp(0.0, 255.0),
                    (source[1] + shift).clamp(0.0, 255.0),
                    (source[2] + shift).clamp(0.0, 255.0),
                ];
                palette.nearest_f32(perturbed) as u8
            })
            .collect()
    }
}

/// Integer rank matrix for the recursive construction.
fn ranks(size: usize) -> Vec<u32> {
    if size == 2 {
        return vec![0, 2, 3, 1];
    }
    let n = size / 2;
    let half = ranks(n);
    let mut out = vec![0u32; size * size];
    for y in 0..size {
        for x in 0..size {
            let base = 4 * half[(y % n) * n + (x % n)];
            let offset = match (y >= n, x >= n) {
                (false, false) => 0,
                (false, true) => 2,
                (true, false) => 3,
                (true, true) => 1,
            };
            out[y * size + x] = base + offset;
        }
    }
    out
}
