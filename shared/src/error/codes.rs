//! Unified error codes for the content board
//!
//! Error codes are organized by category:
//! - 1xxx: Session errors
//! - 2xxx: Category errors
//! - 3xxx: Topic errors
//! - 9xxx: System / store errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 1xxx: Session ====================
    /// No authenticated owner
    NotAuthenticated = 1001,
    /// Session has not finished loading
    SessionNotReady = 1002,
    /// Session worker has stopped
    SessionClosed = 1003,

    // ==================== 2xxx: Category ====================
    /// Category not found
    CategoryNotFound = 2001,
    /// Category name is empty
    CategoryNameEmpty = 2002,
    /// The default category already exists
    DefaultCategoryExists = 2003,
    /// The default category cannot be deleted or renamed
    DefaultCategoryProtected = 2004,
    /// The default category is missing from the board
    DefaultCategoryMissing = 2005,
    /// Reorder ids do not match the category set
    CategorySetMismatch = 2006,

    // ==================== 3xxx: Topic ====================
    /// Topic not found
    TopicNotFound = 3001,
    /// Topic title is empty
    TopicTitleEmpty = 3002,
    /// Reorder ids do not match the topics of the category
    TopicSetMismatch = 3003,

    // ==================== 9xxx: System ====================
    /// Remote store reported a failure
    StoreError = 9002,
    /// Remote store could not be reached
    StoreUnavailable = 9003,
    /// A board invariant was found broken
    InvariantViolation = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Rejected before any remote call; the board is untouched
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorCode::NotAuthenticated
                | ErrorCode::SessionNotReady
                | ErrorCode::CategoryNotFound
                | ErrorCode::CategoryNameEmpty
                | ErrorCode::DefaultCategoryExists
                | ErrorCode::DefaultCategoryProtected
                | ErrorCode::CategorySetMismatch
                | ErrorCode::TopicNotFound
                | ErrorCode::TopicTitleEmpty
                | ErrorCode::TopicSetMismatch
        )
    }

    /// Store failures, including broken invariants detected at runtime
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            ErrorCode::StoreError
                | ErrorCode::StoreUnavailable
                | ErrorCode::InvariantViolation
                | ErrorCode::DefaultCategoryMissing
        )
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // Session
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::SessionNotReady => "Board is not loaded yet",
            ErrorCode::SessionClosed => "Board session has been closed",

            // Category
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameEmpty => "Category name cannot be empty",
            ErrorCode::DefaultCategoryExists => "General category already exists",
            ErrorCode::DefaultCategoryProtected => "The General category cannot be changed",
            ErrorCode::DefaultCategoryMissing => "General category not found",
            ErrorCode::CategorySetMismatch => "Category ids do not match the board",

            // Topic
            ErrorCode::TopicNotFound => "Topic not found",
            ErrorCode::TopicTitleEmpty => "Topic title cannot be empty",
            ErrorCode::TopicSetMismatch => "Topic ids do not match the category",

            // System
            ErrorCode::StoreError => "Remote store operation failed",
            ErrorCode::StoreUnavailable => "Remote store is unavailable",
            ErrorCode::InvariantViolation => "Board invariant violated",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // Session
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::SessionNotReady),
            1003 => Ok(ErrorCode::SessionClosed),

            // Category
            2001 => Ok(ErrorCode::CategoryNotFound),
            2002 => Ok(ErrorCode::CategoryNameEmpty),
            2003 => Ok(ErrorCode::DefaultCategoryExists),
            2004 => Ok(ErrorCode::DefaultCategoryProtected),
            2005 => Ok(ErrorCode::DefaultCategoryMissing),
            2006 => Ok(ErrorCode::CategorySetMismatch),

            // Topic
            3001 => Ok(ErrorCode::TopicNotFound),
            3002 => Ok(ErrorCode::TopicTitleEmpty),
            3003 => Ok(ErrorCode::TopicSetMismatch),

            // System
            9002 => Ok(ErrorCode::StoreError),
            9003 => Ok(ErrorCode::StoreUnavailable),
            9004 => Ok(ErrorCode::InvariantViolation),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
