use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shr_dither::ConvertError;
use thiserror::Error;

/// Errors returned by the HTTP conversion service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not decode image: {0}")]
    ImageDecode(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),

    #[error("preview encoding error: {0}")]
    PreviewEncode(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::ImageDecode(_) | ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Convert(e) => match e {
                ConvertError::UnknownAlgorithm(_) | ConvertError::UnsupportedBayerSize(_) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::PreviewEncode(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
