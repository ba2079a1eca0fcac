//! Scanline palette assignment strategies.
//!
//! All strategies return at most 16 palettes plus the 200-entry mapping
//! that becomes the scan control bytes. When the hardware ceiling would be
//! exceeded, the incoming row falls back to the recorded palette with the
//! least summed squared error against its pixels.

use crate::canvas::{Canvas, HEIGHT};
use crate::color::Rgb;
use crate::palette::{Palette, PaletteSet, MAX_PALETTES, PALETTE_SIZE};

use super::median_cut::median_cut;

/// A palette set plus the scanline-to-palette mapping that drives the SCBs.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// The palettes, in assignment order.
    pub palettes: PaletteSet,
    /// One palette index per scanline, each below `palettes.len()`.
    pub scbs: Vec<u8>,
}

/// Record `palette` for a row: reuse an exact duplicate, append while a
/// slot is free, or fall back to the closest recorded palette.
fn insert_or_reuse(palettes: &mut PaletteSet, palette: Palette, row: &[Rgb]) -> u8 {
    if let Some(idx) = palettes.find_exact(&palette) {
        return idx;
    }
    if palettes.has_room() {
        return palettes.push(palette);
    }
    palettes.best_for_row(row)
}

/// One independent 16-color median cut per scanline, deduplicated.
///
/// Rows whose cuts land on byte-identical palettes share a slot. Once all
/// 16 slots are taken, later rows reuse the recorded palette with the
/// least error against their pixels.
pub fn per_scanline(canvas: &Canvas) -> Assignment {
    let mut palettes = PaletteSet::new();
    let mut scbs = vec![0u8; HEIGHT];
    for y in 0..HEIGHT {
        let row = canvas.row(y);
        let (colors, _) = median_cut(row, PALETTE_SIZE);
        scbs[y] = insert_or_reuse(&mut palettes, Palette::from_colors(&colors), row);
    }
    tracing::debug!(palettes = palettes.len(), "per-scanline assignment");
    Assignment { palettes, scbs }
}

/// One 256-color global cut, partitioned into 16 palettes of 16.
///
/// The megapalette is sliced in the order the cut produced it; every row
/// then picks the slice with the least total error against its pixels.
/// All 16 slices are kept whether or not a row selects them.
pub fn global(canvas: &Canvas) -> Assignment {
    let (colors, _) = median_cut(canvas.pixels(), MAX_PALETTES * PALETTE_SIZE);
    let mut palettes = PaletteSet::new();
    for chunk in colors.chunks_exact(PALETTE_SIZE) {
        palettes.push(Palette::from_colors(chunk));
    }

    let mut scbs = vec![0u8; HEIGHT];
    for y in 0..HEIGHT {
        scbs[y] = palettes.best_for_row(canvas.row(y));
    }
    tracing::debug!("global assignment across 16 partitions");
    Assignment { palettes, scbs }
}

/// Palette reuse with an error threshold: the anti-banding strategy.
///
/// Each row first tries the palette assigned to the row above and keeps it
/// when the total squared error stays within `error_threshold`. Runs of
/// similar rows therefore share one palette and one quantization, so no
/// seam appears at their boundaries. Rows over the threshold get a fresh
/// cut, deduplicated against the recorded palettes.
pub fn optimized(canvas: &Canvas, error_threshold: f64) -> Assignment {
    let mut palettes = PaletteSet::new();
    let mut scbs = vec![0u8; HEIGHT];
    for y in 0..HEIGHT {
        let row = canvas.row(y);
        if y > 0 {
            let prev = scbs[y - 1];
            if let Some(palette) = palettes.get(prev as usize) {
                if palette.row_error(row) <= error_threshold {
                    scbs[y] = prev;
                    continue;
                }
            }
        }
        let (colors, _) = median_cut(row, PALETTE_SIZE);
        scbs[y] = insert_or_reuse(&mut palettes, Palette::from_colors(&colors), row);
    }
    tracing::debug!(
        palettes = palettes.len(),
        threshold = error_threshold,
        "optimized assignment"
    );
    Assignment { palettes, scbs }
}
