//! Model gateway errors.

use thiserror::Error;

/// Failure of the remote text-generation call itself.
///
/// Unrecognised response shapes are not errors; gateways fall back to a
/// serialized payload instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Gateway not configured: {0}")]
    NotConfigured(String),
}

impl GatewayError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
