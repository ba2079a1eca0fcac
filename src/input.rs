//! Image loading and resampling down to the 320x200 canvas.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use image::imageops::FilterType;
use image::DynamicImage;
use shr_dither::{Canvas, HEIGHT, WIDTH};
use thiserror::Error;

/// Resampling filter used when scaling to the canvas geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeFilter {
    /// Lanczos3 windowed sinc; best for photographs.
    #[default]
    Lanczos,
    /// Bilinear interpolation.
    Bilinear,
    /// Nearest neighbor; preserves hard pixel-art edges.
    Nearest,
}

/// Unrecognized resize filter name.
#[derive(Debug, Error)]
#[error("unknown resize filter {0:?} (expected lanczos, bilinear or nearest)")]
pub struct ParseFilterError(String);

impl ResizeFilter {
    fn as_filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Lanczos => FilterType::Lanczos3,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::Nearest => FilterType::Nearest,
        }
    }
}

impl FromStr for ResizeFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lanczos" => Ok(Self::Lanczos),
            "bilinear" => Ok(Self::Bilinear),
            "nearest" => Ok(Self::Nearest),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// Decode an image file and resample it to the canvas geometry.
pub fn load_canvas(path: &Path, aspect: f32, filter: ResizeFilter) -> anyhow::Result<Canvas> {
    let img = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "decoded input image"
    );
    canvas_from_image(&img, aspect, filter)
}

/// Resample a decoded image to 320x200 with pixel aspect correction.
///
/// Super Hi-Res 320-mode pixels are taller than they are wide. Stretching
/// by `aspect` (1.2 for the standard correction) before the final scale
/// keeps circles round on real hardware; an `aspect` of 1.0 resizes in one
/// step.
pub fn canvas_from_image(
    img: &DynamicImage,
    aspect: f32,
    filter: ResizeFilter,
) -> anyhow::Result<Canvas> {
    let ft = filter.as_filter_type();
    let rgb = if (aspect - 1.0).abs() > f32::EPSILON {
        let wide = (WIDTH as f32 * aspect).round() as u32;
        img.resize_exact(wide, HEIGHT as u32, ft)
            .resize_exact(WIDTH as u32, HEIGHT as u32, ft)
            .to_rgb8()
    } else {
        img.resize_exact(WIDTH as u32, HEIGHT as u32, ft).to_rgb8()
    };
    Ok(Canvas::from_rgb_bytes(rgb.as_raw())?)
}
