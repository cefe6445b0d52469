//! REST store
//!
//! [`ContentStore`] over a PostgREST API: plain table routes for CRUD and
//! two stored procedures for batch reordering.

use async_trait::async_trait;
use board_engine::{ContentStore, StoreError, StoreResult};
use serde_json::{Value, json};
use shared::models::{
    Category, CategoryCreate, CategoryId, CategoryUpdate, EntityKind, OwnerId, SortOrderItem,
    Topic, TopicCreate, TopicId, TopicUpdate,
};
use uuid::Uuid;

use crate::{ClientConfig, ClientResult, HttpClient};

const CATEGORIES: &str = "rest/v1/categories";
const TOPICS: &str = "rest/v1/topics";

fn table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Category => CATEGORIES,
        EntityKind::Topic => TOPICS,
    }
}

/// Rows of one owner, ordered by position
fn owned_rows(kind: EntityKind, owner: OwnerId) -> String {
    format!("{}?user_id=eq.{}&order=order.asc", table(kind), owner)
}

fn single_row(kind: EntityKind, id: Uuid) -> String {
    format!("{}?id=eq.{}", table(kind), id)
}

/// Stored procedure name and argument for a batch reorder
fn reorder_call(kind: EntityKind, items: &[SortOrderItem]) -> (&'static str, Value) {
    match kind {
        EntityKind::Category => {
            // categories never change group
            let rows: Vec<Value> = items
                .iter()
                .map(|item| json!({ "id": item.id, "order": item.sort_order }))
                .collect();
            ("update_categories_order", json!({ "categories_data": rows }))
        }
        EntityKind::Topic => ("update_topics_order", json!({ "topics_data": items })),
    }
}

/// First returned row, or `NotFound` when the filter matched nothing
fn first_row<T>(rows: Vec<T>, kind: EntityKind, id: impl std::fmt::Display) -> StoreResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(format!("{} {}", kind, id)))
}

/// Remote store reached over HTTP
#[derive(Debug, Clone)]
pub struct RestStore {
    http: HttpClient,
}

impl RestStore {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl ContentStore for RestStore {
    async fn fetch_categories(&self, owner: OwnerId) -> StoreResult<Vec<Category>> {
        let rows: Vec<Category> = self.http.get(&owned_rows(EntityKind::Category, owner)).await?;
        Ok(rows)
    }

    async fn fetch_topics(&self, owner: OwnerId) -> StoreResult<Vec<Topic>> {
        let rows: Vec<Topic> = self.http.get(&owned_rows(EntityKind::Topic, owner)).await?;
        Ok(rows)
    }

    async fn insert_category(&self, data: CategoryCreate) -> StoreResult<Category> {
        let rows: Vec<Category> = self.http.post(CATEGORIES, &[&data]).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidResponse("insert returned no category".into()))
    }

    async fn update_category(&self, id: CategoryId, data: CategoryUpdate) -> StoreResult<Category> {
        let rows: Vec<Category> = self
            .http
            .patch(&single_row(EntityKind::Category, id), &data)
            .await?;
        first_row(rows, EntityKind::Category, id)
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        let rows: Vec<Category> = self
            .http
            .delete(&single_row(EntityKind::Category, id))
            .await?;
        first_row(rows, EntityKind::Category, id).map(|_| ())
    }

    async fn insert_topic(&self, data: TopicCreate) -> StoreResult<Topic> {
        let rows: Vec<Topic> = self.http.post(TOPICS, &[&data]).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidResponse("insert returned no topic".into()))
    }

    async fn update_topic(&self, id: TopicId, data: TopicUpdate) -> StoreResult<Topic> {
        let rows: Vec<Topic> = self
            .http
            .patch(&single_row(EntityKind::Topic, id), &data)
            .await?;
        first_row(rows, EntityKind::Topic, id)
    }

    async fn delete_topic(&self, id: TopicId) -> StoreResult<()> {
        let rows: Vec<Topic> = self.http.delete(&single_row(EntityKind::Topic, id)).await?;
        first_row(rows, EntityKind::Topic, id).map(|_| ())
    }

    async fn batch_reorder(&self, kind: EntityKind, items: &[SortOrderItem]) -> StoreResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        let (function, body) = reorder_call(kind, items);
        tracing::debug!(function, entries = items.len(), "Batch reorder");
        self.http.rpc(function, &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_rows_route() {
        let owner = Uuid::nil();
        assert_eq!(
            owned_rows(EntityKind::Category, owner),
            "rest/v1/categories?user_id=eq.00000000-0000-0000-0000-000000000000&order=order.asc"
        );
        assert!(owned_rows(EntityKind::Topic, owner).starts_with("rest/v1/topics?user_id=eq."));
    }

    #[test]
    fn test_single_row_route() {
        let id = Uuid::new_v4();
        assert_eq!(
            single_row(EntityKind::Topic, id),
            format!("rest/v1/topics?id=eq.{}", id)
        );
    }

    #[test]
    fn test_topic_reorder_payload_carries_category() {
        let id = Uuid::new_v4();
        let target = Uuid::new_v4();
        let items = [SortOrderItem::new(id, 2).with_category(target)];

        let (function, body) = reorder_call(EntityKind::Topic, &items);

        assert_eq!(function, "update_topics_order");
        assert_eq!(
            body,
            json!({ "topics_data": [{ "id": id, "order": 2, "category_id": target }] })
        );
    }

    #[test]
    fn test_category_reorder_payload() {
        let id = Uuid::new_v4();
        let items = [SortOrderItem::new(id, 0).with_category(Uuid::new_v4())];

        let (function, body) = reorder_call(EntityKind::Category, &items);

        assert_eq!(function, "update_categories_order");
        assert_eq!(body, json!({ "categories_data": [{ "id": id, "order": 0 }] }));
    }

    #[test]
    fn test_insert_payload_shape() {
        let owner = Uuid::new_v4();
        let body = serde_json::to_value([&CategoryCreate {
            user_id: owner,
            name: "General".into(),
            sort_order: 0,
        }])
        .unwrap();
        assert_eq!(
            body,
            json!([{ "user_id": owner, "name": "General", "order": 0 }])
        );
    }

    #[test]
    fn test_first_row_empty_is_not_found() {
        let err = first_row::<Topic>(Vec::new(), EntityKind::Topic, "t-1").unwrap_err();
        assert_eq!(err, StoreError::NotFound("topic t-1".into()));
    }
}
