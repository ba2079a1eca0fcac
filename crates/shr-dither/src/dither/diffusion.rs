//! The error diffusion engine.

use crate::color::Rgb;
use crate::palette::Palette;

use super::kernel::Kernel;

/// Sliding error rows for the diffusion scan.
///
/// Only `max_dy + 1` rows are live at a time; advancing recycles the
/// oldest row as the new furthest one.
#[derive(Debug)]
struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    fn new(width: usize, depth: usize) -> Self {
        Self {
            rows: (0..depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Accumulated error for a pixel in the current row.
    #[inline]
    fn carried(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add an error share to a future pixel. Out-of-range targets are
    /// dropped.
    #[inline]
    fn add(&mut self, x: usize, dy: usize, error: [f32; 3]) {
        if x < self.width && dy < self.rows.len() {
            for c in 0..3 {
                self.rows[dy][x][c] += error[c];
            }
        }
    }

    fn advance(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Diffuse a region of pixels against a palette with the given kernel.
///
/// Pixels are visited row by row, left to right. Working values carry the
/// accumulated error without clamping: excursions below 0 and above 255
/// are part of the algorithm. Shares aimed outside the region are dropped,
/// so a height-1 region keeps all diffusion inside its own row.
pub fn diffuse(
    pixels: &[Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
) -> Vec<u8> {
    debug_assert_eq!(pixels.len(), width * height);

    let mut output = vec![0u8; pixels.len()];
    let mut errors = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let carried = errors.carried(x);
            let source = pixels[idx].to_f32();
            let working = [
                source[0] + carried[0],
                source[1] + carried[1],
                source[2] + carried[2],
            ];

            let chosen = palette.nearest_f32(working);
            output[idx] = chosen as u8;
            let target = palette.entry(chosen).to_f32();

            let error = [
                working[0] - target[0],
                working[1] - target[1],
                working[2] - target[2],
            ];
            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i32 + dx;
                if nx < 0 || nx as usize >= width {
                    continue;
                }
                if y + dy as usize >= height {
                    continue;
                }
                let share = weight as f32 / divisor;
                errors.add(
                    nx as usize,
                    dy as usize,
                    [error[0] * share, error[1] * share, error[2] * share],
                );
            }
        }
        errors.advance();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::kernel::{ATKINSON, FLOYD_STEINBERG};

    fn bw_palette() -> Palette {
        Palette::from_colors(&[Rgb::BLACK, Rgb::WHITE])
    }

    #[test]
    fn test_exact_colors_pass_through() {
        let palette = bw_palette();
        let pixels = vec![Rgb::BLACK, Rgb::WHITE, Rgb::BLACK, Rgb::WHITE];
        let result = diffuse(&pixels, 4, 1, &palette, &FLOYD_STEINBERG);
        assert_eq!(result, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_gray_row_mixes_both_entries() {
        let palette = bw_palette();
        let pixels = vec![Rgb::new(128, 128, 128); 64];
        let result = diffuse(&pixels, 64, 1, &palette, &FLOYD_STEINBERG);

        let whites = result.iter().filter(|&&i| i == 1).count();
        assert!(whites > 16, "expected a mix, got {whites} whites");
        assert!(whites < 48, "expected a mix, got {whites} whites");
    }

    #[test]
    fn test_multi_row_region_diffuses_downward() {
        // A region of two rows must differ from the same rows dithered
        // independently: the first row's error reaches the second.
        let palette = bw_palette();
        let pixels = vec![Rgb::new(100, 100, 100); 32];

        let joined = diffuse(&pixels, 16, 2, &palette, &FLOYD_STEINBERG);
        let top = diffuse(&pixels[..16], 16, 1, &palette, &FLOYD_STEINBERG);
        let bottom = diffuse(&pixels[16..], 16, 1, &palette, &FLOYD_STEINBERG);

        assert_eq!(&joined[..16], &top[..], "first rows see the same input");
        assert_ne!(
            &joined[16..],
            &bottom[..],
            "cross-row diffusion must change the second row"
        );
    }

    #[test]
    fn test_height_one_discards_row_shares() {
        // Atkinson aims 4 of 6 shares at rows below; over a single row they
        // are dropped. Two identical rows dithered separately must agree.
        let palette = bw_palette();
        let row = vec![Rgb::new(70, 70, 70); 40];
        let a = diffuse(&row, 40, 1, &palette, &ATKINSON);
        let b = diffuse(&row, 40, 1, &palette, &ATKINSON);
        assert_eq!(a, b);
    }

    #[test]
    fn test_working_values_may_leave_byte_range() {
        // A saturated row against a palette missing that color builds up
        // large positive error; the run must stay with the nearest entry
        // and never panic or wrap.
        let palette = Palette::from_colors(&[Rgb::BLACK, Rgb::new(40, 40, 40)]);
        let pixels = vec![Rgb::new(250, 250, 250); 16];
        let result = diffuse(&pixels, 16, 1, &palette, &FLOYD_STEINBERG);
        assert!(result.iter().all(|&i| i == 1));
    }

    #[test]
    fn test_deterministic() {
        let palette = Palette::from_colors(&[
            Rgb::BLACK,
            Rgb::WHITE,
            Rgb::new(255, 0, 0),
            Rgb::new(0, 0, 255),
        ]);
        let pixels: Vec<Rgb> = (0..60u32)
            .map(|i| Rgb::new((i * 9 % 256) as u8, (i * 5 % 256) as u8, (i * 3 % 256) as u8))
            .collect();
        let a = diffuse(&pixels, 20, 3, &palette, &FLOYD_STEINBERG);
        let b = diffuse(&pixels, 20, 3, &palette, &FLOYD_STEINBERG);
        assert_eq!(a, b);
    }
}
