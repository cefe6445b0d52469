//! Remote store adapter
//!
//! The board is persisted by an external store that offers plain CRUD on
//! categories and topics plus a batch reorder. Every call succeeds or fails
//! on its own; there are no transactions across calls.

mod memory;

pub use memory::{MemoryStore, StoreOp};

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, CategoryCreate, CategoryId, CategoryUpdate, EntityKind, OwnerId, SortOrderItem,
    Topic, TopicCreate, TopicId, TopicUpdate,
};
use thiserror::Error;

/// Store error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store error: {0}")]
    Backend(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => {
                AppError::with_message(ErrorCode::StoreUnavailable, err.to_string())
            }
            _ => AppError::store(err.to_string()),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Operations every backing store must expose
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn fetch_categories(&self, owner: OwnerId) -> StoreResult<Vec<Category>>;
    async fn fetch_topics(&self, owner: OwnerId) -> StoreResult<Vec<Topic>>;

    async fn insert_category(&self, data: CategoryCreate) -> StoreResult<Category>;
    async fn update_category(&self, id: CategoryId, data: CategoryUpdate) -> StoreResult<Category>;
    /// Dependent topics have already been reassigned by the caller
    async fn delete_category(&self, id: CategoryId) -> StoreResult<()>;

    async fn insert_topic(&self, data: TopicCreate) -> StoreResult<Topic>;
    async fn update_topic(&self, id: TopicId, data: TopicUpdate) -> StoreResult<Topic>;
    async fn delete_topic(&self, id: TopicId) -> StoreResult<()>;

    /// Apply several order (and, for topics, category) changes at once
    async fn batch_reorder(&self, kind: EntityKind, items: &[SortOrderItem]) -> StoreResult<()>;
}

#[async_trait]
impl<S: ContentStore + ?Sized> ContentStore for std::sync::Arc<S> {
    async fn fetch_categories(&self, owner: OwnerId) -> StoreResult<Vec<Category>> {
        (**self).fetch_categories(owner).await
    }

    async fn fetch_topics(&self, owner: OwnerId) -> StoreResult<Vec<Topic>> {
        (**self).fetch_topics(owner).await
    }

    async fn insert_category(&self, data: CategoryCreate) -> StoreResult<Category> {
        (**self).insert_category(data).await
    }

    async fn update_category(&self, id: CategoryId, data: CategoryUpdate) -> StoreResult<Category> {
        (**self).update_category(id, data).await
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        (**self).delete_category(id).await
    }

    async fn insert_topic(&self, data: TopicCreate) -> StoreResult<Topic> {
        (**self).insert_topic(data).await
    }

    async fn update_topic(&self, id: TopicId, data: TopicUpdate) -> StoreResult<Topic> {
        (**self).update_topic(id, data).await
    }

    async fn delete_topic(&self, id: TopicId) -> StoreResult<()> {
        (**self).delete_topic(id).await
    }

    async fn batch_reorder(&self, kind: EntityKind, items: &[SortOrderItem]) -> StoreResult<()> {
        (**self).batch_reorder(kind, items).await
    }
}
