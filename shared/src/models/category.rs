//! Category Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the catch-all category every owner is guaranteed to have
pub const DEFAULT_CATEGORY_NAME: &str = "General";

pub type CategoryId = Uuid;
pub type OwnerId = Uuid;

/// Category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: OwnerId,
    pub name: String,
    /// Zero-based position among the owner's categories
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Whether this is the reserved default category
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_CATEGORY_NAME
    }
}

/// Create category payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub user_id: OwnerId,
    pub name: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// Update category payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "order", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl CategoryUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}
