//! Application error type

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error every board operation returns:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages (store messages are kept verbatim)
/// - Optional structured details for debugging
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (ids, context, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a detail entry
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref().and_then(|d| d.get(key))
    }

    /// Rejected before any remote call
    pub fn is_validation(&self) -> bool {
        self.code.is_validation()
    }

    /// Store failure or broken invariant
    pub fn is_remote(&self) -> bool {
        self.code.is_remote()
    }

    // ==================== Convenience constructors ====================

    /// Create a category not found error
    pub fn category_not_found(id: impl std::fmt::Display) -> Self {
        Self::with_message(ErrorCode::CategoryNotFound, format!("Category {} not found", id))
            .with_detail("category_id", id.to_string())
    }

    /// Create a topic not found error
    pub fn topic_not_found(id: impl std::fmt::Display) -> Self {
        Self::with_message(ErrorCode::TopicNotFound, format!("Topic {} not found", id))
            .with_detail("topic_id", id.to_string())
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a session not ready error
    pub fn not_ready() -> Self {
        Self::new(ErrorCode::SessionNotReady)
    }

    /// Create a store error keeping the underlying message
    pub fn store(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StoreError, msg)
    }

    /// Create an invariant violation error
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvariantViolation, msg)
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::DefaultCategoryProtected);
        assert_eq!(err.message, "The General category cannot be changed");
        assert!(err.details.is_none());
        assert!(err.is_validation());
    }

    #[test]
    fn test_with_detail() {
        let err = AppError::new(ErrorCode::TopicSetMismatch).with_detail("got", 7);
        assert_eq!(err.detail("got"), Some(&serde_json::json!(7)));
        assert_eq!(err.to_string(), "Topic ids do not match the category");
    }

    #[test]
    fn test_not_found_constructors() {
        let err = AppError::topic_not_found("t-1");
        assert_eq!(err.code, ErrorCode::TopicNotFound);
        assert_eq!(err.message, "Topic t-1 not found");
        assert_eq!(err.detail("topic_id"), Some(&serde_json::json!("t-1")));
    }

    #[test]
    fn test_store_error_is_remote() {
        let err = AppError::store("connection reset");
        assert!(err.is_remote());
        assert!(!err.is_validation());
        assert_eq!(err.message, "connection reset");

        let err = AppError::invariant("orders have gaps");
        assert_eq!(err.code, ErrorCode::InvariantViolation);
        assert!(err.is_remote());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let err = AppError::category_not_found("c-9");
        let json = serde_json::to_string(&err).unwrap();
        let back: AppError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
