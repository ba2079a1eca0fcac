//! Color quantization: the median cut and the palette assignment
//! strategies built on it.
//!
//! The quantizer decides which 16-color palettes the image gets and which
//! palette each scanline renders with. Three strategies are available:
//!
//! - **per-scanline** (`median-cut`): an independent cut per row, exact
//!   duplicates shared
//! - **global**: one 256-color cut partitioned into 16 palettes
//! - **optimized**: palette reuse across adjacent rows within an error
//!   threshold, which suppresses horizontal banding in slow gradients

mod assign;
mod median_cut;

pub use assign::{global, optimized, per_scanline, Assignment};
pub use median_cut::median_cut;

use std::str::FromStr;

use crate::canvas::Canvas;
use crate::error::ConvertError;

/// Palette assignment strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantizeMethod {
    /// Independent median cut per scanline (`median-cut`).
    #[default]
    PerScanline,
    /// One global cut partitioned into 16 palettes (`global`).
    Global,
    /// Reuse-with-threshold (`optimized`); see [`optimized`].
    Optimized,
}

impl QuantizeMethod {
    /// Run the strategy over a canvas.
    ///
    /// `error_threshold` only affects [`Optimized`](Self::Optimized).
    pub fn assign(&self, canvas: &Canvas, error_threshold: f64) -> Assignment {
        match self {
            Self::PerScanline => per_scanline(canvas),
            Self::Global => global(canvas),
            Self::Optimized => optimized(canvas, error_threshold),
        }
    }
}

impl FromStr for QuantizeMethod {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "median-cut" => Ok(Self::PerScanline),
            "global" => Ok(Self::Global),
            "optimized" => Ok(Self::Optimized),
            _ => Err(ConvertError::UnknownAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(
            "median-cut".parse::<QuantizeMethod>().unwrap(),
            QuantizeMethod::PerScanline
        );
        assert_eq!(
            "GLOBAL".parse::<QuantizeMethod>().unwrap(),
            QuantizeMethod::Global
        );
        assert_eq!(
            "optimized".parse::<QuantizeMethod>().unwrap(),
            QuantizeMethod::Optimized
        );
    }

    #[test]
    fn test_parse_unknown_name() {
        assert_eq!(
            "octree".parse::<QuantizeMethod>().unwrap_err(),
            ConvertError::UnknownAlgorithm("octree".to_string())
        );
    }
}
