//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use codementor_protocols::{GatewayError, GenerateFailure};

/// Errors returned by the proxy endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request had no `contents` field.
    #[error("Missing contents")]
    MissingContents,

    /// The upstream model answered with a non-2xx status.
    #[error("Model error {status}")]
    Upstream { status: u16, detail: String },

    /// Anything else.
    #[error("internal server error")]
    Internal(String),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Status { status, message } => ApiError::Upstream {
                status,
                detail: message,
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingContents => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();
        let detail = match self {
            ApiError::Upstream { detail, .. } => Some(detail),
            _ => None,
        };
        (status, Json(GenerateFailure { error, detail })).into_response()
    }
}
