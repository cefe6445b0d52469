//! Batch reorder payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryId;

/// Which ordered collection a batch reorder targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Category,
    Topic,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Topic => "topic",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a batch reorder
///
/// `category_id` is only set for topics that change category as part of
/// the same write (moves, reassignment on category delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrderItem {
    pub id: Uuid,
    #[serde(rename = "order")]
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl SortOrderItem {
    pub fn new(id: Uuid, sort_order: i32) -> Self {
        Self {
            id,
            sort_order,
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}
