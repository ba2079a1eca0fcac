//! Median-cut color quantization.

use crate::color::Rgb;

/// One bucket of pixels in the cut.
struct Bucket {
    pixels: Vec<Rgb>,
    /// A bucket with one pixel (or none) cannot be split again.
    splittable: bool,
}

impl Bucket {
    fn new(pixels: Vec<Rgb>) -> Self {
        Self {
            splittable: pixels.len() > 1,
            pixels,
        }
    }

    /// Sum over channels of (max - min): the bucket selection score.
    fn range_sum(&self) -> u32 {
        match channel_bounds(&self.pixels) {
            Some((min, max)) => (0..3).map(|c| (max[c] - min[c]) as u32).sum(),
            None => 0,
        }
    }

    /// Channel with the widest range; ties go to the lowest channel
    /// (R before G before B).
    fn widest_channel(&self) -> usize {
        let Some((min, max)) = channel_bounds(&self.pixels) else {
            return 0;
        };
        let mut widest = 0;
        for c in 1..3 {
            if max[c] - min[c] > max[widest] - min[widest] {
                widest = c;
            }
        }
        widest
    }

    /// Per-channel mean, rounded toward zero.
    fn mean(&self) -> Rgb {
        let n = self.pixels.len() as u64;
        if n == 0 {
            return Rgb::BLACK;
        }
        let mut sums = [0u64; 3];
        for pixel in &self.pixels {
            let channels = pixel.channels();
            for c in 0..3 {
                sums[c] += channels[c] as u64;
            }
        }
        Rgb::new(
            (sums[0] / n) as u8,
            (sums[1] / n) as u8,
            (sums[2] / n) as u8,
        )
    }
}

fn channel_bounds(pixels: &[Rgb]) -> Option<([u8; 3], [u8; 3])> {
    let first = pixels.first()?;
    let mut min = first.channels();
    let mut max = min;
    for pixel in &pixels[1..] {
        let channels = pixel.channels();
        for c in 0..3 {
            min[c] = min[c].min(channels[c]);
            max[c] = max[c].max(channels[c]);
        }
    }
    Some((min, max))
}

/// Index of the splittable bucket with the largest channel-sum range.
/// Ties go to list order.
fn widest_splittable(buckets: &[Bucket]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, bucket) in buckets.iter().enumerate() {
        if !bucket.splittable {
            continue;
        }
        let range = bucket.range_sum();
        if best.map_or(true, |(_, r)| range > r) {
            best = Some((i, range));
        }
    }
    best.map(|(i, _)| i)
}

/// Quantize a bag of pixels down to `k` representative colors.
///
/// Returns the `k`-entry palette (black-padded when the input cannot
/// sustain `k` buckets) and, for each input pixel, the index of its nearest
/// palette entry.
///
/// The cut keeps a bucket list, splitting the widest bucket at the lower
/// median of its widest channel until `k` buckets exist or nothing is left
/// to split. Each split removes the chosen bucket and appends its halves at
/// the end of the list, so entry order follows split order. Inputs with at
/// most `k` distinct colors skip the cut: each color becomes its own entry
/// in ascending `(R, G, B)` order.
pub fn median_cut(pixels: &[Rgb], k: usize) -> (Vec<Rgb>, Vec<u8>) {
    debug_assert!(k > 0 && k <= 256, "palette size {k} out of range");

    let mut distinct: Vec<Rgb> = pixels.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() <= k {
        let mut palette = distinct;
        palette.resize(k, Rgb::BLACK);
        let indices = map_to_nearest(pixels, &palette);
        return (palette, indices);
    }

    let mut buckets = vec![Bucket::new(pixels.to_vec())];
    while buckets.len() < k {
        let Some(chosen) = widest_splittable(&buckets) else {
            break;
        };
        let bucket = buckets.remove(chosen);
        let channel = bucket.widest_channel();
        let mut sorted = bucket.pixels;
        sorted.sort_by_key(|p| p.channels()[channel]);
        let upper = sorted.split_off(sorted.len() / 2);
        buckets.push(Bucket::new(sorted));
        buckets.push(Bucket::new(upper));
    }

    let mut palette: Vec<Rgb> = buckets.iter().map(Bucket::mean).collect();
    palette.resize(k, Rgb::BLACK);
    let indices = map_to_nearest(pixels, &palette);
    (palette, indices)
}

/// Index of the nearest palette color; ties resolve to the lowest index.
fn nearest_index(pixel: Rgb, palette: &[Rgb]) -> u8 {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, &color) in palette.iter().enumerate() {
        let dist = color.distance_sq(pixel);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best as u8
}

fn map_to_nearest(pixels: &[Rgb], palette: &[Rgb]) -> Vec<u8> {
    pixels.iter().map(|&p| nearest_index(p, palette)).collect()
}
