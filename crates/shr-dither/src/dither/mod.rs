//! Dithering: nearest-color, error diffusion, and ordered (Bayer).
//!
//! Every algorithm shares one contract: given a scanline and the palette
//! that row renders with, produce one palette index per pixel. The error
//! diffusion family runs through [`diffuse`] with per-algorithm kernel
//! tables; ordered dithering perturbs by a tiled Bayer threshold before a
//! nearest-color match.
//!
//! Rows are dithered independently. Each scanline may render with a
//! different palette, so diffusing error across rows would measure it
//! against the wrong colors; every row starts from a clean working buffer.

mod bayer;
mod diffusion;
mod kernel;

pub use bayer::BayerMatrix;
pub use diffusion::diffuse;
pub use kernel::{Kernel, ATKINSON, BURKES, FLOYD_STEINBERG, JARVIS_JUDICE_NINKE, STUCKI};

use std::str::FromStr;

use crate::color::Rgb;
use crate::error::ConvertError;
use crate::palette::Palette;

/// Dither algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    /// Plain nearest-color mapping, no dithering (`none`).
    None,
    /// Floyd-Steinberg error diffusion (`floyd-steinberg`).
    FloydSteinberg,
    /// Atkinson error diffusion, 6/8 propagation (`atkinson`).
    #[default]
    Atkinson,
    /// Jarvis-Judice-Ninke error diffusion (`jjn`).
    JarvisJudiceNinke,
    /// Stucki error diffusion (`stucki`).
    Stucki,
    /// Burkes error diffusion (`burkes`).
    Burkes,
    /// Ordered dithering against a Bayer matrix (`ordered` or `bayer`).
    Ordered,
}

impl DitherAlgorithm {
    /// The diffusion kernel behind this algorithm, for the error diffusion
    /// family.
    pub fn kernel(&self) -> Option<&'static Kernel> {
        match self {
            Self::FloydSteinberg => Some(&FLOYD_STEINBERG),
            Self::Atkinson => Some(&ATKINSON),
            Self::JarvisJudiceNinke => Some(&JARVIS_JUDICE_NINKE),
            Self::Stucki => Some(&STUCKI),
            Self::Burkes => Some(&BURKES),
            Self::None | Self::Ordered => None,
        }
    }
}

impl FromStr for DitherAlgorithm {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "floyd-steinberg" => Ok(Self::FloydSteinberg),
            "atkinson" => Ok(Self::Atkinson),
            "jjn" => Ok(Self::JarvisJudiceNinke),
            "stucki" => Ok(Self::Stucki),
            "burkes" => Ok(Self::Burkes),
            "ordered" | "bayer" => Ok(Self::Ordered),
            _ => Err(ConvertError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A ready-to-run ditherer: the tagged-variant dispatch over the family.
#[derive(Debug, Clone)]
pub enum Ditherer {
    /// Nearest palette entry per pixel.
    Nearest,
    /// Error diffusion with the given kernel.
    Diffusion(&'static Kernel),
    /// Ordered dithering against a Bayer matrix.
    Ordered(BayerMatrix),
}

impl Ditherer {
    /// Instantiate an algorithm, validating the Bayer size for `Ordered`.
    pub fn new(algorithm: DitherAlgorithm, bayer_size: u32) -> Result<Self, ConvertError> {
        Ok(match algorithm {
            DitherAlgorithm::None => Self::Nearest,
            DitherAlgorithm::FloydSteinberg => Self::Diffusion(&FLOYD_STEINBERG),
            DitherAlgorithm::Atkinson => Self::Diffusion(&ATKINSON),
            DitherAlgorithm::JarvisJudiceNinke => Self::Diffusion(&JARVIS_JUDICE_NINKE),
            DitherAlgorithm::Stucki => Self::Diffusion(&STUCKI),
            DitherAlgorithm::Burkes => Self::Diffusion(&BURKES),
            DitherAlgorithm::Ordered => Self::Ordered(BayerMatrix::new(bayer_size)?),
        })
    }

    /// Produce one palette index per pixel for scanline `y`.
    ///
    /// Every call starts from a fresh working buffer; diffusion never leaks
    /// across scanlines.
    pub fn dither_row(&self, row: &[Rgb], y: usize, palette: &Palette) -> Vec<u8> {
        match self {
            Self::Nearest => row.iter().map(|&p| palette.nearest(p) as u8).collect(),
            Self::Diffusion(kernel) => diffuse(row, row.len(), 1, palette, kernel),
            Self::Ordered(matrix) => matrix.dither_row(row, y, palette),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(
            "atkinson".parse::<DitherAlgorithm>().unwrap(),
            DitherAlgorithm::Atkinson
        );
        assert_eq!(
            "Floyd-Steinberg".parse::<DitherAlgorithm>().unwrap(),
            DitherAlgorithm::FloydSteinberg
        );
        assert_eq!(
            "bayer".parse::<DitherAlgorithm>().unwrap(),
            DitherAlgorithm::Ordered
        );
        assert_eq!(
            "ordered".parse::<DitherAlgorithm>().unwrap(),
            DitherAlgorithm::Ordered
        );
        assert_eq!(
            "none".parse::<DitherAlgorithm>().unwrap(),
            DitherAlgorithm::None
        );
    }

    #[test]
    fn test_parse_unknown_name() {
        assert_eq!(
            "riemersma".parse::<DitherAlgorithm>().unwrap_err(),
            ConvertError::UnknownAlgorithm("riemersma".to_string())
        );
    }

    #[test]
    fn test_kernel_mapping() {
        assert_eq!(DitherAlgorithm::Atkinson.kernel().unwrap().divisor, 8);
        assert_eq!(DitherAlgorithm::FloydSteinberg.kernel().unwrap().divisor, 16);
        assert_eq!(
            DitherAlgorithm::JarvisJudiceNinke.kernel().unwrap().divisor,
            48
        );
        assert_eq!(DitherAlgorithm::Stucki.kernel().unwrap().divisor, 42);
        assert_eq!(DitherAlgorithm::Burkes.kernel().unwrap().divisor, 32);
        assert!(DitherAlgorithm::None.kernel().is_none());
        assert!(DitherAlgorithm::Ordered.kernel().is_none());
    }

    #[test]
    fn test_new_validates_bayer_size() {
        assert!(Ditherer::new(DitherAlgorithm::Ordered, 4).is_ok());
        assert_eq!(
            Ditherer::new(DitherAlgorithm::Ordered, 5).unwrap_err(),
            ConvertError::UnsupportedBayerSize(5)
        );
        // The size is irrelevant for the other algorithms.
        assert!(Ditherer::new(DitherAlgorithm::Atkinson, 5).is_ok());
    }

    #[test]
    fn test_nearest_maps_each_pixel() {
        let palette = Palette::from_colors(&[Rgb::BLACK, Rgb::WHITE, Rgb::new(255, 0, 0)]);
        let ditherer = Ditherer::new(DitherAlgorithm::None, 8).unwrap();
        let row = vec![Rgb::new(250, 5, 5), Rgb::new(10, 10, 10), Rgb::new(240, 240, 240)];
        assert_eq!(ditherer.dither_row(&row, 0, &palette), vec![2, 0, 1]);
    }

    #[test]
    fn test_row_indices_in_range() {
        let palette = Palette::from_colors(&[Rgb::BLACK, Rgb::WHITE, Rgb::new(0, 200, 80)]);
        let row: Vec<Rgb> = (0..320u32)
            .map(|x| Rgb::new((x % 256) as u8, (x * 3 % 256) as u8, (x * 7 % 256) as u8))
            .collect();
        for algorithm in [
            DitherAlgorithm::None,
            DitherAlgorithm::FloydSteinberg,
            DitherAlgorithm::Atkinson,
            DitherAlgorithm::JarvisJudiceNinke,
            DitherAlgorithm::Stucki,
            DitherAlgorithm::Burkes,
            DitherAlgorithm::Ordered,
        ] {
            let ditherer = Ditherer::new(algorithm, 8).unwrap();
            let indices = ditherer.dither_row(&row, 3, &palette);
            assert_eq!(indices.len(), row.len());
            assert!(indices.iter().all(|&i| i < 16));
        }
    }
}
