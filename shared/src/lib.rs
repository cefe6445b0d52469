//! Shared types for the content board
//!
//! Common types used across the engine, store adapters and the CLI:
//! entity models, wire payloads, the unified error system and small
//! utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Category, EntityKind, SortOrderItem, Topic, DEFAULT_CATEGORY_NAME};
