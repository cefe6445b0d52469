//! Category operations

use std::collections::HashSet;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Category, CategoryCreate, CategoryId, CategoryUpdate, EntityKind, SortOrderItem,
    DEFAULT_CATEGORY_NAME,
};
use shared::util::non_empty_trimmed;

use super::ContentEngine;
use crate::default_group::find_default;
use crate::ordering::{append_to_end, compact, reindex_by_explicit_sequence, Sequenced};
use crate::store::ContentStore;

/// Outcome of [`ContentEngine::add_category`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryAdded {
    Created(Category),
    /// "General" already exists; nothing was written
    DefaultExists,
}

impl CategoryAdded {
    pub fn category(&self) -> Option<&Category> {
        match self {
            Self::Created(category) => Some(category),
            Self::DefaultExists => None,
        }
    }
}

impl<S: ContentStore> ContentEngine<S> {
    /// Append a category at the end of the board
    pub async fn add_category(&mut self, name: &str) -> AppResult<CategoryAdded> {
        let (owner, snapshot) = self.ready()?;
        let name =
            non_empty_trimmed(name).ok_or_else(|| AppError::new(ErrorCode::CategoryNameEmpty))?;

        if name == DEFAULT_CATEGORY_NAME && find_default(&snapshot.categories).is_some() {
            tracing::warn!(owner = %owner, "Default category already exists, skipping");
            return Ok(CategoryAdded::DefaultExists);
        }
        let snapshot = self.dense_categories(snapshot).await?;

        let created = self
            .store
            .insert_category(CategoryCreate {
                user_id: owner,
                name,
                sort_order: append_to_end(&snapshot.categories),
            })
            .await
            .map_err(|e| {
                tracing::error!(owner = %owner, error = %e, "Failed to create category");
                AppError::from(e)
            })?;

        tracing::info!(owner = %owner, category_id = %created.id, order = created.sort_order, "Category created");

        let mut categories = snapshot.categories.clone();
        categories.push(created.clone());
        self.publish(categories, snapshot.topics.clone());
        Ok(CategoryAdded::Created(created))
    }

    /// Change a category's name, leaving its position alone
    pub async fn rename_category(&mut self, id: CategoryId, name: &str) -> AppResult<Category> {
        let (_, snapshot) = self.ready()?;
        let name =
            non_empty_trimmed(name).ok_or_else(|| AppError::new(ErrorCode::CategoryNameEmpty))?;
        let current = snapshot
            .category(id)
            .ok_or_else(|| AppError::category_not_found(id))?;

        if current.is_default() {
            tracing::warn!(category_id = %id, "Refusing to rename default category");
            return Err(AppError::new(ErrorCode::DefaultCategoryProtected)
                .with_detail("category_id", id.to_string()));
        }
        if name == DEFAULT_CATEGORY_NAME {
            tracing::warn!(category_id = %id, "Refusing to rename category to the default name");
            return Err(AppError::new(ErrorCode::DefaultCategoryExists));
        }
        if name == current.name {
            return Ok(current.clone());
        }

        self.store
            .update_category(id, CategoryUpdate::rename(name.as_str()))
            .await
            .map_err(|e| {
                tracing::error!(category_id = %id, error = %e, "Failed to rename category");
                AppError::from(e)
            })?;

        let mut categories = snapshot.categories.clone();
        let mut renamed = current.clone();
        for category in categories.iter_mut().filter(|c| c.id == id) {
            category.name = name.clone();
            renamed = category.clone();
        }
        tracing::info!(category_id = %id, "Category renamed");

        self.publish(categories, snapshot.topics.clone());
        Ok(renamed)
    }

    /// Delete a category, moving its topics to the default category
    ///
    /// The topics are appended after the default category's own topics in
    /// their prior relative order. Steps: reassign, delete, compact. A
    /// failure stops the sequence; steps already confirmed stay in the
    /// mirror.
    ///
    /// Returns the number of reassigned topics.
    pub async fn delete_category(&mut self, id: CategoryId) -> AppResult<usize> {
        let (owner, snapshot) = self.ready()?;
        if snapshot.category(id).is_none() {
            return Err(AppError::category_not_found(id));
        }
        let default = match find_default(&snapshot.categories) {
            Some(default) => default.clone(),
            None => {
                tracing::error!(owner = %owner, "Default category missing from mirror");
                return Err(AppError::new(ErrorCode::DefaultCategoryMissing));
            }
        };
        if default.id == id {
            tracing::warn!(category_id = %id, "Refusing to delete default category");
            return Err(AppError::new(ErrorCode::DefaultCategoryProtected)
                .with_detail("category_id", id.to_string()));
        }

        let snapshot = self.dense_topics(snapshot, default.id).await?;
        let mut categories = snapshot.categories.clone();
        let mut topics = snapshot.topics.clone();

        // 1. reassign
        let base = append_to_end(&snapshot.topics_in(default.id));
        let reassignment: Vec<SortOrderItem> = snapshot
            .topics_in(id)
            .iter()
            .zip(base..)
            .map(|(topic, order)| SortOrderItem::new(topic.id, order).with_category(default.id))
            .collect();

        if !reassignment.is_empty() {
            tracing::debug!(category_id = %id, topics = reassignment.len(), "Reassigning topics to default");
            if let Err(e) = self
                .store
                .batch_reorder(EntityKind::Topic, &reassignment)
                .await
            {
                tracing::error!(category_id = %id, error = %e, "Failed to reassign topics");
                return Err(e.into());
            }
            for item in &reassignment {
                if let Some(topic) = topics.iter_mut().find(|t| t.id == item.id) {
                    topic.category_id = default.id;
                    topic.set_sort_order(item.sort_order);
                }
            }
        }

        // 2. delete
        if let Err(e) = self.store.delete_category(id).await {
            tracing::error!(category_id = %id, error = %e, "Failed to delete category");
            self.publish(categories, topics);
            return Err(e.into());
        }
        categories.retain(|c| c.id != id);

        // 3. compact
        let order = compact(&categories);
        let changes = order.changes(&categories);
        if !changes.is_empty() {
            tracing::debug!(patches = changes.len(), "Compacting categories");
            if let Err(e) = self
                .store
                .batch_reorder(EntityKind::Category, &changes)
                .await
            {
                tracing::error!(owner = %owner, error = %e, "Failed to compact categories");
                self.publish(categories, topics);
                return Err(e.into());
            }
            order.apply(&mut categories);
        }

        tracing::info!(
            category_id = %id,
            reassigned = reassignment.len(),
            "Category deleted"
        );
        self.publish(categories, topics);
        Ok(reassignment.len())
    }

    /// Reorder the board from an explicit drag-and-drop sequence
    ///
    /// `ids` must name every category exactly once.
    pub async fn reorder_categories(&mut self, ids: &[CategoryId]) -> AppResult<()> {
        let (owner, snapshot) = self.ready()?;

        let known: HashSet<CategoryId> = snapshot.categories.iter().map(|c| c.id).collect();
        let requested: HashSet<CategoryId> = ids.iter().copied().collect();
        if requested.len() != ids.len() || requested != known {
            tracing::warn!(owner = %owner, expected = known.len(), got = ids.len(), "Category set mismatch");
            return Err(AppError::new(ErrorCode::CategorySetMismatch)
                .with_detail("expected", known.len())
                .with_detail("got", ids.len()));
        }

        let order = reindex_by_explicit_sequence(ids);
        let changes = order.changes(&snapshot.categories);
        if changes.is_empty() {
            return Ok(());
        }

        tracing::debug!(patches = changes.len(), "Reordering categories");
        self.store
            .batch_reorder(EntityKind::Category, &changes)
            .await
            .map_err(|e| {
                tracing::error!(owner = %owner, error = %e, "Failed to reorder categories");
                AppError::from(e)
            })?;

        let mut categories = snapshot.categories.clone();
        order.apply(&mut categories);
        tracing::info!(owner = %owner, changed = changes.len(), "Categories reordered");
        self.publish(categories, snapshot.topics.clone());
        Ok(())
    }
}
