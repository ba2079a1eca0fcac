//! Conversion endpoints: raw image body in, 3200 blob or PNG preview out.

use axum::body::Bytes;
use axum::extract::Query;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use shr_dither::{convert::DEFAULT_ERROR_THRESHOLD, DitherAlgorithm, QuantizeMethod, Shr3200, ShrConverter};

use crate::error::ApiError;
use crate::input::{self, ResizeFilter};
use crate::preview;

/// Conversion knobs, mirroring the CLI flags. Every field is optional in
/// the query string.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertQuery {
    /// Dithering algorithm name (`atkinson`, `floyd-steinberg`, `jjn`,
    /// `stucki`, `burkes`, `ordered`, `none`).
    pub dither: String,
    /// Quantization strategy name (`median-cut`, `global`, `optimized`).
    pub quantize: String,
    /// Palette reuse threshold for `optimized`.
    pub error_threshold: f64,
    /// Bayer matrix side for `ordered` dithering.
    pub bayer_size: u32,
    /// Pixel aspect correction factor.
    pub aspect: f32,
    /// Resampling filter (`lanczos`, `bilinear`, `nearest`).
    pub filter: String,
    /// Process in linear light.
    pub linear: bool,
}

impl Default for ConvertQuery {
    fn default() -> Self {
        Self {
            dither: "atkinson".into(),
            quantize: "median-cut".into(),
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            bayer_size: 8,
            aspect: 1.2,
            filter: "lanczos".into(),
            linear: true,
        }
    }
}

impl ConvertQuery {
    /// Run the conversion described by this query on a raw image body.
    fn convert(&self, body: &[u8]) -> Result<Shr3200, ApiError> {
        let dither: DitherAlgorithm = self
            .dither
            .parse()
            .map_err(|e: shr_dither::ConvertError| ApiError::InvalidParameter(e.to_string()))?;
        let quantize: QuantizeMethod = self
            .quantize
            .parse()
            .map_err(|e: shr_dither::ConvertError| ApiError::InvalidParameter(e.to_string()))?;
        let filter: ResizeFilter = self
            .filter
            .parse()
            .map_err(|e: input::ParseFilterError| ApiError::InvalidParameter(e.to_string()))?;

        let img =
            image::load_from_memory(body).map_err(|e| ApiError::ImageDecode(e.to_string()))?;
        let canvas = input::canvas_from_image(&img, self.aspect, filter)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let converter = ShrConverter::new()
            .quantize(quantize)
            .dither(dither)
            .bayer_size(self.bayer_size)
            .error_threshold(self.error_threshold)
            .linear_rgb(self.linear);
        Ok(converter.convert(&canvas)?)
    }
}

/// `POST /api/convert` -- convert an uploaded image to a 3200 blob.
pub async fn handle_convert(
    Query(query): Query<ConvertQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    tracing::info!(
        bytes = body.len(),
        dither = %query.dither,
        quantize = %query.quantize,
        "convert request"
    );
    let image = query.convert(&body)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"image.3200\"",
            ),
        ],
        image.to_bytes(),
    )
        .into_response())
}

/// `POST /api/preview` -- convert and render a PNG preview of the result.
pub async fn handle_preview(
    Query(query): Query<ConvertQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    tracing::info!(bytes = body.len(), "preview request");
    let image = query.convert(&body)?;
    let png = preview::encode_png(&image).map_err(|e| ApiError::PreviewEncode(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
