//! Content Synchronization Engine
//!
//! Owns the local mirror of one owner's board and applies every mutation
//! in two phases: compute the complete new state, write it to the store,
//! and only then publish it. Readers get immutable [`BoardSnapshot`]s.
//!
//! Operations take `&mut self`, so one engine never interleaves two of
//! them; [`crate::BoardSession`] serializes callers that share an engine.

mod categories;
mod snapshot;
mod topics;

pub use categories::CategoryAdded;
pub use snapshot::{BoardSnapshot, SessionState};

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;
use shared::error::{AppError, AppResult};
use shared::models::{
    Category, CategoryCreate, CategoryId, EntityKind, OwnerId, SortOrderItem, Topic,
    DEFAULT_CATEGORY_NAME,
};

use crate::default_group::plan_default_group;
use crate::ordering::{compact, is_dense};
use crate::store::ContentStore;

/// Shared handle readers use to fetch the latest snapshot
pub type SnapshotHandle = Arc<RwLock<Arc<BoardSnapshot>>>;

// =============================================================================
// ContentEngine
// =============================================================================

/// Mirror of one owner's categories and topics, kept in sync with a store
pub struct ContentEngine<S: ContentStore> {
    store: S,
    state: SessionState,
    owner: Option<OwnerId>,
    /// Set once a load went through; a failed load leaves it unset
    loaded: bool,
    published: SnapshotHandle,
}

impl<S: ContentStore> std::fmt::Debug for ContentEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.current();
        f.debug_struct("ContentEngine")
            .field("state", &self.state)
            .field("owner", &self.owner)
            .field("loaded", &self.loaded)
            .field("categories_count", &snapshot.categories.len())
            .field("topics_count", &snapshot.topics.len())
            .finish()
    }
}

impl<S: ContentStore> ContentEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState::Idle,
            owner: None,
            loaded: false,
            published: Arc::new(RwLock::new(Arc::new(BoardSnapshot::default()))),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.current()
    }

    /// Handle for readers outside the engine
    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.published.clone()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Fetch the owner's board, guarantee the default category and repair
    /// order gaps
    ///
    /// On failure the mirror is left empty, the state is `Ready` and the
    /// error is returned. Mutations keep failing with `SessionNotReady`
    /// until a later load succeeds: an empty mirror would hand out orders
    /// the store may already use.
    pub async fn load(&mut self, owner: OwnerId) -> AppResult<()> {
        if owner.is_nil() {
            return Err(AppError::not_authenticated());
        }

        self.state = SessionState::Loading;
        self.owner = Some(owner);
        self.loaded = false;
        self.publish(Vec::new(), Vec::new());

        let result = self.fetch_board(owner).await;
        self.state = SessionState::Ready;

        match result {
            Ok((categories, topics)) => {
                tracing::info!(
                    owner = %owner,
                    categories = categories.len(),
                    topics = topics.len(),
                    "Board loaded"
                );
                self.loaded = true;
                self.publish(categories, topics);
                Ok(())
            }
            Err(e) => {
                tracing::error!(owner = %owner, error = %e, "Failed to load board");
                self.publish(Vec::new(), Vec::new());
                Err(e)
            }
        }
    }

    async fn fetch_board(&self, owner: OwnerId) -> AppResult<(Vec<Category>, Vec<Topic>)> {
        let (categories, topics) = tokio::try_join!(
            self.store.fetch_categories(owner),
            self.store.fetch_topics(owner)
        )?;

        let plan = plan_default_group(categories);
        let mut categories = plan.categories;

        if !plan.patches.is_empty() {
            tracing::debug!(owner = %owner, patches = plan.patches.len(), "Shifting categories for default");
            self.store
                .batch_reorder(EntityKind::Category, &plan.patches)
                .await?;
        }

        if let Some(sort_order) = plan.create_at {
            let created = self
                .store
                .insert_category(CategoryCreate {
                    user_id: owner,
                    name: DEFAULT_CATEGORY_NAME.to_string(),
                    sort_order,
                })
                .await?;
            tracing::info!(owner = %owner, category_id = %created.id, "Default category created");
            categories.push(created);
        }

        let mut topics = topics;
        self.repair(&mut categories, &mut topics).await?;
        Ok((categories, topics))
    }

    /// Forget the loaded owner and drop the mirror
    pub fn teardown(&mut self) {
        if let Some(owner) = self.owner {
            tracing::info!(owner = %owner, "Board session torn down");
        }
        self.state = SessionState::Idle;
        self.owner = None;
        self.loaded = false;
        self.publish(Vec::new(), Vec::new());
    }

    /// Re-compact every group of the mirror and persist the changed orders
    ///
    /// Returns how many entities got a new order.
    pub async fn normalize_orders(&mut self) -> AppResult<usize> {
        let (_, snapshot) = self.ready()?;
        let mut categories = snapshot.categories.clone();
        let mut topics = snapshot.topics.clone();

        let result = self.repair(&mut categories, &mut topics).await;
        // whatever `repair` confirmed is already applied
        self.publish(categories, topics);

        let changed = result?;
        if changed > 0 {
            tracing::info!(changed, "Orders normalized");
        }
        Ok(changed)
    }

    /// Compact categories and each topic group, one batch per kind
    ///
    /// Entities are only updated once the matching batch is confirmed.
    async fn repair(&self, categories: &mut [Category], topics: &mut [Topic]) -> AppResult<usize> {
        let category_order = compact(&*categories);
        let category_changes = category_order.changes(&*categories);

        let group_ids: BTreeSet<CategoryId> = topics.iter().map(|t| t.category_id).collect();
        let mut topic_changes: Vec<SortOrderItem> = Vec::new();
        let mut topic_orders = Vec::with_capacity(group_ids.len());
        for category_id in group_ids {
            let group: Vec<Topic> = topics
                .iter()
                .filter(|t| t.category_id == category_id)
                .cloned()
                .collect();
            let assignment = compact(&group);
            topic_changes.extend(assignment.changes(&group));
            topic_orders.push(assignment);
        }

        if !category_changes.is_empty() {
            tracing::debug!(patches = category_changes.len(), "Repairing category orders");
            self.store
                .batch_reorder(EntityKind::Category, &category_changes)
                .await?;
            category_order.apply(categories);
        }

        if !topic_changes.is_empty() {
            tracing::debug!(patches = topic_changes.len(), "Repairing topic orders");
            self.store
                .batch_reorder(EntityKind::Topic, &topic_changes)
                .await?;
            for assignment in &topic_orders {
                assignment.apply(topics);
            }
        }

        Ok(category_changes.len() + topic_changes.len())
    }

    /// `snapshot` with dense category orders
    ///
    /// A compaction that failed after an earlier write leaves gaps; they
    /// are closed here before anything is appended.
    async fn dense_categories(
        &self,
        snapshot: Arc<BoardSnapshot>,
    ) -> AppResult<Arc<BoardSnapshot>> {
        if is_dense(&snapshot.categories) {
            return Ok(snapshot);
        }

        let order = compact(&snapshot.categories);
        let changes = order.changes(&snapshot.categories);
        tracing::warn!(patches = changes.len(), "Category orders have gaps, compacting first");
        self.store
            .batch_reorder(EntityKind::Category, &changes)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to close category order gaps");
                AppError::invariant("Category orders have gaps that could not be closed")
                    .with_detail("cause", e.to_string())
            })?;

        let mut categories = snapshot.categories.clone();
        order.apply(&mut categories);
        self.publish(categories, snapshot.topics.clone());
        Ok(self.current())
    }

    /// `snapshot` with dense orders in one topic group
    async fn dense_topics(
        &self,
        snapshot: Arc<BoardSnapshot>,
        category_id: CategoryId,
    ) -> AppResult<Arc<BoardSnapshot>> {
        let group = snapshot.group(category_id);
        if is_dense(&group) {
            return Ok(snapshot);
        }

        let order = compact(&group);
        let changes = order.changes(&group);
        tracing::warn!(category_id = %category_id, patches = changes.len(), "Topic orders have gaps, compacting first");
        self.store
            .batch_reorder(EntityKind::Topic, &changes)
            .await
            .map_err(|e| {
                tracing::error!(category_id = %category_id, error = %e, "Failed to close topic order gaps");
                AppError::invariant("Topic orders have gaps that could not be closed")
                    .with_detail("category_id", category_id.to_string())
                    .with_detail("cause", e.to_string())
            })?;

        let mut topics = snapshot.topics.clone();
        order.apply(&mut topics);
        self.publish(snapshot.categories.clone(), topics);
        Ok(self.current())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn current(&self) -> Arc<BoardSnapshot> {
        self.published.read().clone()
    }

    /// Owner and snapshot, or `SessionNotReady`
    fn ready(&self) -> AppResult<(OwnerId, Arc<BoardSnapshot>)> {
        match (self.state, self.owner) {
            (SessionState::Ready, Some(owner)) if self.loaded => Ok((owner, self.current())),
            _ => {
                tracing::warn!(state = ?self.state, loaded = self.loaded, "Board not ready");
                Err(AppError::not_ready())
            }
        }
    }

    /// Swap in a new snapshot built from the given mirror contents
    fn publish(&self, categories: Vec<Category>, topics: Vec<Topic>) {
        let snapshot = BoardSnapshot::new(self.state, self.owner, categories, topics);
        *self.published.write() = Arc::new(snapshot);
    }
}
