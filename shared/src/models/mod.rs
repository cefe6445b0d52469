//! Data models
//!
//! Shared between the engine, store adapters and the CLI.
//! All IDs are UUIDs; `sort_order` is serialized as `order` on the wire.

pub mod category;
pub mod sort_order;
pub mod topic;

// Re-exports
pub use category::*;
pub use sort_order::*;
pub use topic::*;
