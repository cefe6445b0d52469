//! Topic Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{CategoryId, OwnerId};

pub type TopicId = Uuid;

/// Topic entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub user_id: OwnerId,
    pub category_id: CategoryId,
    pub title: String,
    /// Zero-based position inside its category
    #[serde(rename = "order")]
    pub sort_order: i32,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Create topic payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCreate {
    pub user_id: OwnerId,
    pub category_id: CategoryId,
    pub title: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    #[serde(default)]
    pub completed: bool,
}

/// Update topic payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(rename = "order", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TopicUpdate {
    pub fn retitle(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_completed_defaults_to_false() {
        let id = Uuid::new_v4();
        let json = serde_json::json!({
            "id": id,
            "user_id": Uuid::nil(),
            "category_id": Uuid::nil(),
            "title": "Draft outline",
            "order": 0,
            "created_at": "2024-05-01T10:00:00Z",
        });
        let topic: Topic = serde_json::from_value(json).unwrap();
        assert_eq!(topic.id, id);
        assert!(!topic.completed);
        assert_eq!(topic.sort_order, 0);
    }

    #[test]
    fn test_update_only_serializes_set_fields() {
        let json = serde_json::to_value(TopicUpdate::completed(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "completed": true }));
    }
}
