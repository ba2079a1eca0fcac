//! The conversion pipeline builder.

use crate::canvas::Canvas;
use crate::dither::{DitherAlgorithm, Ditherer};
use crate::error::ConvertError;
use crate::output::Shr3200;
use crate::quantize::QuantizeMethod;

/// Default reuse threshold for the optimized quantizer, as total squared
/// RGB error over one 320-pixel row.
pub const DEFAULT_ERROR_THRESHOLD: f64 = 2000.0;

/// Builder for the canvas-to-3200 conversion pipeline.
///
/// Configure once, then [`convert()`](Self::convert) any number of
/// canvases: the builder takes `&self` and conversions are deterministic.
///
/// # Example
///
/// ```
/// use shr_dither::{Canvas, DitherAlgorithm, QuantizeMethod, Rgb, ShrConverter};
///
/// let canvas = Canvas::filled(Rgb::new(40, 90, 160));
/// let image = ShrConverter::new()
///     .quantize(QuantizeMethod::Optimized)
///     .dither(DitherAlgorithm::FloydSteinberg)
///     .convert(&canvas)
///     .unwrap();
///
/// assert_eq!(image.to_bytes().len(), 32_768);
/// ```
#[derive(Debug, Clone)]
pub struct ShrConverter {
    quantize: QuantizeMethod,
    dither: DitherAlgorithm,
    bayer_size: u32,
    error_threshold: f64,
    linear_rgb: bool,
}

impl ShrConverter {
    /// Conversion with the defaults: per-scanline median cut, Atkinson
    /// dithering, 8x8 Bayer matrix, reuse threshold 2000, sRGB space.
    pub fn new() -> Self {
        Self {
            quantize: QuantizeMethod::PerScanline,
            dither: DitherAlgorithm::Atkinson,
            bayer_size: 8,
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            linear_rgb: false,
        }
    }

    /// Set the palette assignment strategy.
    #[inline]
    pub fn quantize(mut self, method: QuantizeMethod) -> Self {
        self.quantize = method;
        self
    }

    /// Set the dithering algorithm.
    #[inline]
    pub fn dither(mut self, algorithm: DitherAlgorithm) -> Self {
        self.dither = algorithm;
        self
    }

    /// Set the Bayer matrix side for ordered dithering (2, 4 or 8).
    ///
    /// Validated when the conversion runs.
    #[inline]
    pub fn bayer_size(mut self, size: u32) -> Self {
        self.bayer_size = size;
        self
    }

    /// Set the palette reuse threshold for the optimized strategy.
    #[inline]
    pub fn error_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = threshold;
        self
    }

    /// Process in linear light instead of gamma-encoded sRGB.
    #[inline]
    pub fn linear_rgb(mut self, enabled: bool) -> Self {
        self.linear_rgb = enabled;
        self
    }

    /// Run the pipeline: palette assignment, 12-bit snapping, per-row
    /// dithering, container assembly.
    ///
    /// Palettes are snapped to the IIgs grid *before* dithering, so the
    /// diffusion error is measured against the colors the hardware will
    /// actually display.
    pub fn convert(&self, canvas: &Canvas) -> Result<Shr3200, ConvertError> {
        let ditherer = Ditherer::new(self.dither, self.bayer_size)?;

        let linearized;
        let canvas = if self.linear_rgb {
            linearized = canvas.to_linear();
            &linearized
        } else {
            canvas
        };

        let assignment = self.quantize.assign(canvas, self.error_threshold);
        let palettes = assignment.palettes.snapped();
        tracing::debug!(
            quantize = ?self.quantize,
            dither = ?self.dither,
            palettes = palettes.len(),
            "palettes assigned and snapped to the 12-bit grid"
        );

        let mut indices = Vec::with_capacity(canvas.pixels().len());
        for (y, &scb) in assignment.scbs.iter().enumerate() {
            let Some(palette) = palettes.get(scb as usize) else {
                return Err(ConvertError::ScbOutOfRange {
                    row: y,
                    palette: scb,
                    available: palettes.len(),
                });
            };
            indices.extend(ditherer.dither_row(canvas.row(y), y, palette));
        }

        Shr3200::new(indices, assignment.scbs, palettes)
    }
}

impl Default for ShrConverter {
    fn default() -> Self {
        Self::new()
    }
}
