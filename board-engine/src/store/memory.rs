//! In-memory store
//!
//! Backs offline sessions and tests. Enforces what a relational backend
//! would: owners must match, a category with topics cannot be deleted, and
//! a batch reorder either applies completely or not at all. Individual
//! operations can be told to fail to exercise error paths.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use shared::models::{
    Category, CategoryCreate, CategoryId, CategoryUpdate, EntityKind, OwnerId, SortOrderItem,
    Topic, TopicCreate, TopicId, TopicUpdate,
};
use uuid::Uuid;

use super::{ContentStore, StoreError, StoreResult};

/// Store operations, used for call recording and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FetchCategories,
    FetchTopics,
    InsertCategory,
    UpdateCategory,
    DeleteCategory,
    InsertTopic,
    UpdateTopic,
    DeleteTopic,
    ReorderCategories,
    ReorderTopics,
}

impl StoreOp {
    /// Whether the operation writes
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::FetchCategories | Self::FetchTopics)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    categories: Vec<Category>,
    topics: Vec<Topic>,
    calls: Vec<StoreOp>,
    /// Remaining forced failures per operation (`None` = fail forever)
    failures: HashMap<StoreOp, Option<usize>>,
}

impl MemoryState {
    fn enter(&mut self, op: StoreOp) -> StoreResult<()> {
        self.calls.push(op);
        let Some(remaining) = self.failures.get(&op).copied() else {
            return Ok(());
        };
        match remaining {
            None => {}
            Some(n) if n <= 1 => {
                self.failures.remove(&op);
            }
            Some(n) => {
                self.failures.insert(op, Some(n - 1));
            }
        }
        Err(StoreError::Backend(format!("{:?} failed", op)))
    }

    fn category_mut(&mut self, id: CategoryId) -> StoreResult<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("category {}", id)))
    }

    fn topic_mut(&mut self, id: TopicId) -> StoreResult<&mut Topic> {
        self.topics
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("topic {}", id)))
    }

    fn owner_of_category(&self, id: CategoryId) -> Option<OwnerId> {
        self.categories.iter().find(|c| c.id == id).map(|c| c.user_id)
    }
}

/// Thread-safe in-memory [`ContentStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category directly, bypassing call recording
    pub fn seed_category(&self, owner: OwnerId, name: &str, sort_order: i32) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            user_id: owner,
            name: name.to_string(),
            sort_order,
            created_at: Utc::now(),
        };
        self.state.lock().categories.push(category.clone());
        category
    }

    /// Insert a topic directly, bypassing call recording
    pub fn seed_topic(
        &self,
        owner: OwnerId,
        category_id: CategoryId,
        title: &str,
        sort_order: i32,
        completed: bool,
    ) -> Topic {
        let topic = Topic {
            id: Uuid::new_v4(),
            user_id: owner,
            category_id,
            title: title.to_string(),
            sort_order,
            completed,
            created_at: Utc::now(),
        };
        self.state.lock().topics.push(topic.clone());
        topic
    }

    /// Make the next `times` calls of `op` fail
    pub fn fail_next(&self, op: StoreOp, times: usize) {
        if times > 0 {
            self.state.lock().failures.insert(op, Some(times));
        }
    }

    /// Make every call of `op` fail until [`MemoryStore::recover`]
    pub fn fail_always(&self, op: StoreOp) {
        self.state.lock().failures.insert(op, None);
    }

    /// Drop all injected failures
    pub fn recover(&self) {
        self.state.lock().failures.clear();
    }

    /// Operations received so far
    pub fn calls(&self) -> Vec<StoreOp> {
        self.state.lock().calls.clone()
    }

    pub fn write_calls(&self) -> usize {
        self.state.lock().calls.iter().filter(|op| op.is_write()).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Stored categories of `owner` ordered by `sort_order`
    pub fn categories(&self, owner: OwnerId) -> Vec<Category> {
        let state = self.state.lock();
        let mut categories: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.sort_order);
        categories
    }

    /// Stored topics of `owner` ordered by `sort_order`
    pub fn topics(&self, owner: OwnerId) -> Vec<Topic> {
        let state = self.state.lock();
        let mut topics: Vec<Topic> = state
            .topics
            .iter()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        topics.sort_by_key(|t| t.sort_order);
        topics
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch_categories(&self, owner: OwnerId) -> StoreResult<Vec<Category>> {
        self.state.lock().enter(StoreOp::FetchCategories)?;
        Ok(self.categories(owner))
    }

    async fn fetch_topics(&self, owner: OwnerId) -> StoreResult<Vec<Topic>> {
        self.state.lock().enter(StoreOp::FetchTopics)?;
        Ok(self.topics(owner))
    }

    async fn insert_category(&self, data: CategoryCreate) -> StoreResult<Category> {
        let mut state = self.state.lock();
        state.enter(StoreOp::InsertCategory)?;

        if data.name.trim().is_empty() {
            return Err(StoreError::Validation("category name is empty".into()));
        }

        let category = Category {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            sort_order: data.sort_order,
            created_at: Utc::now(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: CategoryId, data: CategoryUpdate) -> StoreResult<Category> {
        let mut state = self.state.lock();
        state.enter(StoreOp::UpdateCategory)?;

        let category = state.category_mut(id)?;
        if let Some(name) = data.name {
            category.name = name;
        }
        if let Some(sort_order) = data.sort_order {
            category.sort_order = sort_order;
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.enter(StoreOp::DeleteCategory)?;

        if state.owner_of_category(id).is_none() {
            return Err(StoreError::NotFound(format!("category {}", id)));
        }
        if state.topics.iter().any(|t| t.category_id == id) {
            return Err(StoreError::Conflict(
                "Cannot delete category with topics".into(),
            ));
        }
        state.categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn insert_topic(&self, data: TopicCreate) -> StoreResult<Topic> {
        let mut state = self.state.lock();
        state.enter(StoreOp::InsertTopic)?;

        match state.owner_of_category(data.category_id) {
            Some(owner) if owner == data.user_id => {}
            Some(_) => {
                return Err(StoreError::Validation(
                    "category belongs to another owner".into(),
                ));
            }
            None => {
                return Err(StoreError::NotFound(format!(
                    "category {}",
                    data.category_id
                )));
            }
        }

        let topic = Topic {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            category_id: data.category_id,
            title: data.title,
            sort_order: data.sort_order,
            completed: data.completed,
            created_at: Utc::now(),
        };
        state.topics.push(topic.clone());
        Ok(topic)
    }

    async fn update_topic(&self, id: TopicId, data: TopicUpdate) -> StoreResult<Topic> {
        let mut state = self.state.lock();
        state.enter(StoreOp::UpdateTopic)?;

        if let Some(category_id) = data.category_id
            && state.owner_of_category(category_id).is_none()
        {
            return Err(StoreError::NotFound(format!("category {}", category_id)));
        }

        let topic = state.topic_mut(id)?;
        if let Some(title) = data.title {
            topic.title = title;
        }
        if let Some(category_id) = data.category_id {
            topic.category_id = category_id;
        }
        if let Some(sort_order) = data.sort_order {
            topic.sort_order = sort_order;
        }
        if let Some(completed) = data.completed {
            topic.completed = completed;
        }
        Ok(topic.clone())
    }

    async fn delete_topic(&self, id: TopicId) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.enter(StoreOp::DeleteTopic)?;

        let before = state.topics.len();
        state.topics.retain(|t| t.id != id);
        if state.topics.len() == before {
            return Err(StoreError::NotFound(format!("topic {}", id)));
        }
        Ok(())
    }

    async fn batch_reorder(&self, kind: EntityKind, items: &[SortOrderItem]) -> StoreResult<()> {
        let mut state = self.state.lock();
        let op = match kind {
            EntityKind::Category => StoreOp::ReorderCategories,
            EntityKind::Topic => StoreOp::ReorderTopics,
        };
        state.enter(op)?;

        // validate everything first so a bad entry leaves the store untouched
        for item in items {
            let known = match kind {
                EntityKind::Category => state.categories.iter().any(|c| c.id == item.id),
                EntityKind::Topic => state.topics.iter().any(|t| t.id == item.id),
            };
            if !known {
                return Err(StoreError::NotFound(format!("{} {}", kind, item.id)));
            }
            if let Some(category_id) = item.category_id
                && state.owner_of_category(category_id).is_none()
            {
                return Err(StoreError::NotFound(format!("category {}", category_id)));
            }
        }

        for item in items {
            match kind {
                EntityKind::Category => {
                    state.category_mut(item.id)?.sort_order = item.sort_order;
                }
                EntityKind::Topic => {
                    let topic = state.topic_mut(item.id)?;
                    topic.sort_order = item.sort_order;
                    if let Some(category_id) = item.category_id {
                        topic.category_id = category_id;
                    }
                }
            }
        }
        Ok(())
    }
}
