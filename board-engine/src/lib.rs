//! Board engine
//!
//! Keeps a local mirror of one owner's categories and topics consistent
//! with a remote store: dense zero-based ordering per group, a guaranteed
//! "General" category, and write-then-publish mutations.
//!
//! - [`ordering`]: pure order computations
//! - [`default_group`]: default category planning
//! - [`engine`]: the synchronization engine and its snapshots
//! - [`session`]: serialized access to one engine from many callers
//! - [`store`]: the store contract and an in-memory implementation

pub mod config;
pub mod default_group;
pub mod engine;
pub mod logger;
pub mod ordering;
pub mod session;
pub mod store;

pub use config::SessionConfig;
pub use engine::{BoardSnapshot, CategoryAdded, ContentEngine, SessionState, SnapshotHandle};
pub use session::BoardSession;
pub use store::{ContentStore, MemoryStore, StoreError, StoreOp, StoreResult};
