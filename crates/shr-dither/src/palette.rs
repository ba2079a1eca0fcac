//! Hardware palettes and the per-image palette set.

use crate::color::{iigs, Rgb};
use crate::error::ConvertError;

/// Colors per hardware palette.
pub const PALETTE_SIZE: usize = 16;
/// Palette slots in the hardware and in the 3200 container.
pub const MAX_PALETTES: usize = 16;

/// One hardware palette: exactly 16 colors.
///
/// The hardware has no notion of a short palette; slots the quantizer could
/// not fill hold black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgb; PALETTE_SIZE],
}

impl Palette {
    /// The all-black palette used for unused container slots.
    pub const BLACK: Palette = Palette {
        entries: [Rgb::BLACK; PALETTE_SIZE],
    };

    /// Wrap a full entry array.
    pub const fn new(entries: [Rgb; PALETTE_SIZE]) -> Self {
        Self { entries }
    }

    /// Build a palette from up to 16 colors, padding with black.
    pub fn from_colors(colors: &[Rgb]) -> Self {
        debug_assert!(colors.len() <= PALETTE_SIZE);
        let mut entries = [Rgb::BLACK; PALETTE_SIZE];
        for (slot, &color) in entries.iter_mut().zip(colors) {
            *slot = color;
        }
        Self { entries }
    }

    /// All 16 entries.
    #[inline]
    pub fn entries(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.entries
    }

    /// One entry.
    #[inline]
    pub fn entry(&self, idx: usize) -> Rgb {
        self.entries[idx]
    }

    /// Index of the entry nearest to `target` in squared RGB distance.
    /// Ties resolve to the lowest index.
    pub fn nearest(&self, target: Rgb) -> usize {
        let mut best = 0;
        let mut best_dist = u32::MAX;
        for (i, &entry) in self.entries.iter().enumerate() {
            let dist = entry.distance_sq(target);
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }

    /// Nearest entry to a floating-point working value.
    ///
    /// Error diffusion works on values that may sit well outside the
    /// 0..=255 byte range; the distance is computed without clamping.
    pub fn nearest_f32(&self, target: [f32; 3]) -> usize {
        let mut best = 0;
        let mut best_dist = f32::INFINITY;
        for (i, &entry) in self.entries.iter().enumerate() {
            let dr = target[0] - entry.r as f32;
            let dg = target[1] - entry.g as f32;
            let db = target[2] - entry.b as f32;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }

    /// Total squared nearest-neighbor error of a pixel run against this
    /// palette.
    pub fn row_error(&self, row: &[Rgb]) -> f64 {
        row.iter()
            .map(|&pixel| {
                self.entries
                    .iter()
                    .map(|entry| entry.distance_sq(pixel))
                    .min()
                    .unwrap_or(0) as f64
            })
            .sum()
    }

    /// Snap every entry onto the IIgs 12-bit grid.
    pub fn snapped(&self) -> Palette {
        let mut entries = self.entries;
        for entry in &mut entries {
            *entry = iigs::snap(*entry);
        }
        Palette { entries }
    }
}

/// The ordered list of palettes assigned to an image, at most 16.
///
/// `len()` reports the number of palettes actually assigned; the packer
/// pads the remaining container slots with [`Palette::BLACK`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteSet {
    palettes: Vec<Palette>,
}

impl PaletteSet {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            palettes: Vec::new(),
        }
    }

    /// Wrap an existing palette list, enforcing the hardware ceiling.
    pub fn from_palettes(palettes: Vec<Palette>) -> Result<Self, ConvertError> {
        if palettes.len() > MAX_PALETTES {
            return Err(ConvertError::TooManyPalettes(palettes.len()));
        }
        Ok(Self { palettes })
    }

    /// Number of palettes actually assigned (not the container's 16 slots).
    #[inline]
    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    /// Whether no palette has been assigned yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// One palette by index.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Palette> {
        self.palettes.get(idx)
    }

    /// Iterate the assigned palettes in order.
    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.iter()
    }

    /// Whether another palette fits under the hardware ceiling.
    #[inline]
    pub fn has_room(&self) -> bool {
        self.palettes.len() < MAX_PALETTES
    }

    /// Append a palette and return its index.
    ///
    /// Callers check [`has_room()`](Self::has_room) first; the strategies
    /// fall back to reuse once the ceiling is reached.
    pub fn push(&mut self, palette: Palette) -> u8 {
        debug_assert!(self.has_room(), "palette ceiling exceeded");
        self.palettes.push(palette);
        (self.palettes.len() - 1) as u8
    }

    /// Index of an exact (byte-equal) duplicate, if one was already
    /// recorded.
    pub fn find_exact(&self, palette: &Palette) -> Option<u8> {
        self.palettes.iter().position(|p| p == palette).map(|i| i as u8)
    }

    /// Index of the recorded palette with the smallest summed squared
    /// error against `row`. This is the fallback once all 16 slots are
    /// taken; ties resolve to the lowest index.
    pub fn best_for_row(&self, row: &[Rgb]) -> u8 {
        let mut best = 0;
        let mut best_err = f64::INFINITY;
        for (i, palette) in self.palettes.iter().enumerate() {
            let err = palette.row_error(row);
            if err < best_err {
                best_err = err;
                best = i;
            }
        }
        best as u8
    }

    /// Snap every palette onto the IIgs 12-bit grid.
    pub fn snapped(&self) -> PaletteSet {
        PaletteSet {
            palettes: self.palettes.iter().map(|p| p.snapped()).collect(),
        }
    }

    /// The container's fixed 16 slots: assigned palettes first, then black.
    pub fn padded(&self) -> [Palette; MAX_PALETTES] {
        let mut slots = [Palette::BLACK; MAX_PALETTES];
        for (slot, palette) in slots.iter_mut().zip(&self.palettes) {
            *slot = *palette;
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone() -> Palette {
        Palette::from_colors(&[Rgb::BLACK, Rgb::WHITE])
    }

    #[test]
    fn test_from_colors_pads_with_black() {
        let palette = Palette::from_colors(&[Rgb::new(1, 2, 3)]);
        assert_eq!(palette.entry(0), Rgb::new(1, 2, 3));
        for i in 1..PALETTE_SIZE {
            assert_eq!(palette.entry(i), Rgb::BLACK);
        }
    }

    #[test]
    fn test_nearest_prefers_lowest_index_on_tie() {
        // Entries 1 and 2 are equidistant from the target; entry 1 wins.
        let palette = Palette::from_colors(&[
            Rgb::new(200, 200, 200),
            Rgb::new(90, 100, 100),
            Rgb::new(110, 100, 100),
        ]);
        assert_eq!(palette.nearest(Rgb::new(100, 100, 100)), 1);
    }

    #[test]
    fn test_nearest_f32_handles_excursions() {
        let palette = two_tone();
        assert_eq!(palette.nearest_f32([-40.0, -40.0, -40.0]), 0);
        assert_eq!(palette.nearest_f32([300.0, 300.0, 300.0]), 1);
    }

    #[test]
    fn test_row_error_zero_for_exact_rows() {
        let palette = two_tone();
        let row = vec![Rgb::BLACK, Rgb::WHITE, Rgb::BLACK];
        assert_eq!(palette.row_error(&row), 0.0);
    }

    #[test]
    fn test_row_error_sums_per_pixel_minimums() {
        let palette = two_tone();
        // (1,0,0) is 1 away from black squared; two of them.
        let row = vec![Rgb::new(1, 0, 0), Rgb::new(1, 0, 0)];
        assert_eq!(palette.row_error(&row), 2.0);
    }

    #[test]
    fn test_snapped_lands_on_grid() {
        let palette = Palette::from_colors(&[Rgb::new(200, 100, 50), Rgb::new(8, 9, 111)]);
        let snapped = palette.snapped();
        for &entry in snapped.entries() {
            assert!(iigs::on_grid(entry), "{entry:?} must lie on the grid");
        }
        // Snapping an already-snapped palette changes nothing.
        assert_eq!(snapped.snapped(), snapped);
    }

    #[test]
    fn test_set_dedup_and_ceiling() {
        let mut set = PaletteSet::new();
        for i in 0..MAX_PALETTES {
            assert!(set.has_room());
            set.push(Palette::from_colors(&[Rgb::new(i as u8, 0, 0)]));
        }
        assert!(!set.has_room());
        assert_eq!(set.len(), MAX_PALETTES);

        let existing = Palette::from_colors(&[Rgb::new(3, 0, 0)]);
        assert_eq!(set.find_exact(&existing), Some(3));
        assert_eq!(set.find_exact(&Palette::from_colors(&[Rgb::WHITE])), None);
    }

    #[test]
    fn test_best_for_row_minimizes_error() {
        let mut set = PaletteSet::new();
        set.push(Palette::from_colors(&[Rgb::new(255, 0, 0)]));
        set.push(Palette::from_colors(&[Rgb::new(0, 0, 255)]));
        let blue_row = vec![Rgb::new(0, 0, 250); 8];
        assert_eq!(set.best_for_row(&blue_row), 1);
    }

    #[test]
    fn test_padded_fills_with_black() {
        let mut set = PaletteSet::new();
        set.push(Palette::from_colors(&[Rgb::WHITE]));
        let slots = set.padded();
        assert_eq!(slots.len(), MAX_PALETTES);
        assert_eq!(slots[0].entry(0), Rgb::WHITE);
        for slot in &slots[1..] {
            assert_eq!(*slot, Palette::BLACK);
        }
    }

    #[test]
    fn test_from_palettes_rejects_overflow() {
        let too_many = vec![Palette::BLACK; MAX_PALETTES + 1];
        assert_eq!(
            PaletteSet::from_palettes(too_many).unwrap_err(),
            ConvertError::TooManyPalettes(MAX_PALETTES + 1)
        );
    }
}
