//! Topic operations

use std::collections::HashSet;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CategoryId, EntityKind, SortOrderItem, Topic, TopicCreate, TopicId, TopicUpdate,
};
use shared::util::non_empty_trimmed;

use super::ContentEngine;
use crate::ordering::{
    append_to_end, compact_after_removal, insert_at, reindex_by_explicit_sequence,
    sort_by_completion_then_order,
};
use crate::store::ContentStore;

impl<S: ContentStore> ContentEngine<S> {
    /// Append a topic to a category
    pub async fn add_topic(&mut self, category_id: CategoryId, title: &str) -> AppResult<Topic> {
        let (owner, snapshot) = self.ready()?;
        let title =
            non_empty_trimmed(title).ok_or_else(|| AppError::new(ErrorCode::TopicTitleEmpty))?;
        if snapshot.category(category_id).is_none() {
            return Err(AppError::category_not_found(category_id));
        }
        let snapshot = self.dense_topics(snapshot, category_id).await?;

        let created = self
            .store
            .insert_topic(TopicCreate {
                user_id: owner,
                category_id,
                title,
                sort_order: append_to_end(&snapshot.topics_in(category_id)),
                completed: false,
            })
            .await
            .map_err(|e| {
                tracing::error!(category_id = %category_id, error = %e, "Failed to create topic");
                AppError::from(e)
            })?;

        tracing::info!(category_id = %category_id, topic_id = %created.id, order = created.sort_order, "Topic created");

        let mut topics = snapshot.topics.clone();
        topics.push(created.clone());
        self.publish(snapshot.categories.clone(), topics);
        Ok(created)
    }

    pub async fn rename_topic(&mut self, id: TopicId, title: &str) -> AppResult<Topic> {
        let (_, snapshot) = self.ready()?;
        let title =
            non_empty_trimmed(title).ok_or_else(|| AppError::new(ErrorCode::TopicTitleEmpty))?;
        let current = snapshot.topic(id).ok_or_else(|| AppError::topic_not_found(id))?;
        if current.title == title {
            return Ok(current.clone());
        }

        self.store
            .update_topic(id, TopicUpdate::retitle(title.as_str()))
            .await
            .map_err(|e| {
                tracing::error!(topic_id = %id, error = %e, "Failed to rename topic");
                AppError::from(e)
            })?;

        let mut renamed = current.clone();
        renamed.title = title;
        let topics = replace_topic(&snapshot.topics, &renamed);
        tracing::info!(topic_id = %id, "Topic renamed");

        self.publish(snapshot.categories.clone(), topics);
        Ok(renamed)
    }

    /// Flip a topic's completion and re-sort its category
    ///
    /// Completed topics move to the top of the category; each side keeps
    /// its relative order. If the flip is stored but the re-sort is not,
    /// the mirror keeps the flip without the new positions.
    pub async fn toggle_completion(&mut self, id: TopicId) -> AppResult<Topic> {
        let (_, snapshot) = self.ready()?;
        let current = snapshot.topic(id).ok_or_else(|| AppError::topic_not_found(id))?;
        let completed = !current.completed;

        self.store
            .update_topic(id, TopicUpdate::completed(completed))
            .await
            .map_err(|e| {
                tracing::error!(topic_id = %id, error = %e, "Failed to toggle topic");
                AppError::from(e)
            })?;

        let mut toggled = current.clone();
        toggled.completed = completed;
        let mut topics = replace_topic(&snapshot.topics, &toggled);

        let group: Vec<Topic> = topics
            .iter()
            .filter(|t| t.category_id == toggled.category_id)
            .cloned()
            .collect();
        let order = sort_by_completion_then_order(&group);
        let changes = order.changes(&group);

        if !changes.is_empty() {
            tracing::debug!(topic_id = %id, patches = changes.len(), "Re-sorting category after toggle");
            if let Err(e) = self.store.batch_reorder(EntityKind::Topic, &changes).await {
                tracing::error!(topic_id = %id, error = %e, "Failed to re-sort topics");
                self.publish(snapshot.categories.clone(), topics);
                return Err(e.into());
            }
            order.apply(&mut topics);
        }

        if let Some(position) = order.get(id) {
            toggled.sort_order = position;
        }
        tracing::info!(topic_id = %id, completed, "Topic toggled");
        self.publish(snapshot.categories.clone(), topics);
        Ok(toggled)
    }

    /// Remove a topic and close the gap in its category
    pub async fn delete_topic(&mut self, id: TopicId) -> AppResult<()> {
        let (_, snapshot) = self.ready()?;
        let current = snapshot.topic(id).ok_or_else(|| AppError::topic_not_found(id))?;
        let group = snapshot.group(current.category_id);

        self.store.delete_topic(id).await.map_err(|e| {
            tracing::error!(topic_id = %id, error = %e, "Failed to delete topic");
            AppError::from(e)
        })?;

        let mut topics = snapshot.topics.clone();
        topics.retain(|t| t.id != id);

        let order = compact_after_removal(&group, id);
        let changes = order.changes(&group);
        if !changes.is_empty() {
            tracing::debug!(category_id = %current.category_id, patches = changes.len(), "Compacting topics");
            if let Err(e) = self.store.batch_reorder(EntityKind::Topic, &changes).await {
                tracing::error!(category_id = %current.category_id, error = %e, "Failed to compact topics");
                self.publish(snapshot.categories.clone(), topics);
                return Err(e.into());
            }
            order.apply(&mut topics);
        }

        tracing::info!(topic_id = %id, "Topic deleted");
        self.publish(snapshot.categories.clone(), topics);
        Ok(())
    }

    /// Move a topic to `target_index` of `target_category_id`
    ///
    /// Works within one category or across two. The source is compacted,
    /// the target opens a slot, and all changed orders go out in a single
    /// batch. The index is clamped to the target group.
    pub async fn move_topic(
        &mut self,
        id: TopicId,
        target_category_id: CategoryId,
        target_index: i32,
    ) -> AppResult<()> {
        let (_, snapshot) = self.ready()?;
        let current = snapshot.topic(id).ok_or_else(|| AppError::topic_not_found(id))?;
        if snapshot.category(target_category_id).is_none() {
            return Err(AppError::category_not_found(target_category_id));
        }
        let source_id = current.category_id;
        let target = snapshot.group(target_category_id);

        let mut changes: Vec<SortOrderItem> = Vec::new();
        let mut assignments = Vec::with_capacity(2);

        if source_id != target_category_id {
            let source = snapshot.group(source_id);
            let source_order = compact_after_removal(&source, id);
            changes.extend(source_order.changes(&source));
            assignments.push(source_order);
        }

        let target_order = insert_at(&target, id, target_index);
        changes.extend(target_order.changes(&target).into_iter().map(|item| {
            if item.id == id && source_id != target_category_id {
                item.with_category(target_category_id)
            } else {
                item
            }
        }));
        assignments.push(target_order);

        if changes.is_empty() {
            return Ok(());
        }

        tracing::debug!(topic_id = %id, patches = changes.len(), "Moving topic");
        self.store
            .batch_reorder(EntityKind::Topic, &changes)
            .await
            .map_err(|e| {
                tracing::error!(topic_id = %id, error = %e, "Failed to move topic");
                AppError::from(e)
            })?;

        let mut topics = snapshot.topics.clone();
        if let Some(moved) = topics.iter_mut().find(|t| t.id == id) {
            moved.category_id = target_category_id;
        }
        for assignment in &assignments {
            assignment.apply(&mut topics);
        }

        tracing::info!(
            topic_id = %id,
            from = %source_id,
            to = %target_category_id,
            "Topic moved"
        );
        self.publish(snapshot.categories.clone(), topics);
        Ok(())
    }

    /// Reorder one category's topics from an explicit sequence
    ///
    /// `ids` must name every topic of the category exactly once.
    pub async fn reorder_topics_within_category(
        &mut self,
        category_id: CategoryId,
        ids: &[TopicId],
    ) -> AppResult<()> {
        let (_, snapshot) = self.ready()?;
        if snapshot.category(category_id).is_none() {
            return Err(AppError::category_not_found(category_id));
        }
        let group = snapshot.group(category_id);

        let known: HashSet<TopicId> = group.iter().map(|t| t.id).collect();
        let requested: HashSet<TopicId> = ids.iter().copied().collect();
        if requested.len() != ids.len() || requested != known {
            tracing::warn!(category_id = %category_id, expected = known.len(), got = ids.len(), "Topic set mismatch");
            return Err(AppError::new(ErrorCode::TopicSetMismatch)
                .with_detail("category_id", category_id.to_string())
                .with_detail("expected", known.len())
                .with_detail("got", ids.len()));
        }

        let order = reindex_by_explicit_sequence(ids);
        let changes = order.changes(&group);
        if changes.is_empty() {
            return Ok(());
        }

        tracing::debug!(category_id = %category_id, patches = changes.len(), "Reordering topics");
        self.store
            .batch_reorder(EntityKind::Topic, &changes)
            .await
            .map_err(|e| {
                tracing::error!(category_id = %category_id, error = %e, "Failed to reorder topics");
                AppError::from(e)
            })?;

        let mut topics = snapshot.topics.clone();
        order.apply(&mut topics);
        tracing::info!(category_id = %category_id, changed = changes.len(), "Topics reordered");
        self.publish(snapshot.categories.clone(), topics);
        Ok(())
    }
}

fn replace_topic(topics: &[Topic], updated: &Topic) -> Vec<Topic> {
    topics
        .iter()
        .map(|t| if t.id == updated.id { updated.clone() } else { t.clone() })
        .collect()
}
