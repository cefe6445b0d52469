//! Client error types

use board_engine::StoreError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Constraint violated on the server
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) if e.is_decode() => StoreError::InvalidResponse(e.to_string()),
            ClientError::Http(e) => StoreError::Unavailable(e.to_string()),
            ClientError::InvalidResponse(msg) => StoreError::InvalidResponse(msg),
            ClientError::Serialization(e) => StoreError::InvalidResponse(e.to_string()),
            ClientError::NotFound(msg) => StoreError::NotFound(msg),
            ClientError::Validation(msg) => StoreError::Validation(msg),
            ClientError::Conflict(msg) => StoreError::Conflict(msg),
            other @ (ClientError::Unauthorized
            | ClientError::Forbidden(_)
            | ClientError::Internal(_)
            | ClientError::Config(_)) => StoreError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_to_store_error() {
        assert_eq!(
            StoreError::from(ClientError::Conflict("fk".into())),
            StoreError::Conflict("fk".into())
        );
        assert_eq!(
            StoreError::from(ClientError::Unauthorized),
            StoreError::Backend("Authentication required".into())
        );
        assert!(matches!(
            StoreError::from(ClientError::InvalidResponse("empty".into())),
            StoreError::InvalidResponse(_)
        ));
    }
}
