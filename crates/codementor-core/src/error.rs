//! Core error types.

use thiserror::Error;

use codementor_protocols::{GatewayError, StoreError};

#[derive(Debug, Error)]
pub enum MentorError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_is_transparent() {
        let err = MentorError::from(GatewayError::Network("refused".to_string()));
        assert_eq!(err.to_string(), "Network error: refused");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = MentorError::from(StoreError::StorageError("locked".to_string()));
        assert_eq!(err.to_string(), "Storage error: locked");
    }
}
