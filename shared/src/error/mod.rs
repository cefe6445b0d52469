//! Unified error system for the content board
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 1xxx: Session errors
//! - 2xxx: Category errors
//! - 3xxx: Topic errors
//! - 9xxx: System / store errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::DefaultCategoryProtected);
//! assert!(err.is_validation());
//!
//! // Create an error with details
//! let err = AppError::new(ErrorCode::CategorySetMismatch)
//!     .with_detail("expected", 3);
//! assert!(err.is_validation());
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
