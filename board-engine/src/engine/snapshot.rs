//! Published board state

use serde::Serialize;
use shared::models::{Category, CategoryId, OwnerId, Topic, TopicId};

use crate::default_group::find_default;
use crate::ordering::by_position;

/// Engine lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No owner loaded
    #[default]
    Idle,
    /// Initial fetch in flight
    Loading,
    /// Mutations accepted
    Ready,
}

/// Immutable copy of the local mirror
///
/// Categories are kept sorted by position; topics are sorted by position
/// too, so filtering by category yields each group in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub state: SessionState,
    pub owner: Option<OwnerId>,
    pub categories: Vec<Category>,
    pub topics: Vec<Topic>,
}

impl BoardSnapshot {
    pub(crate) fn new(
        state: SessionState,
        owner: Option<OwnerId>,
        categories: Vec<Category>,
        topics: Vec<Topic>,
    ) -> Self {
        let categories = by_position(&categories).into_iter().cloned().collect();
        let topics = by_position(&topics).into_iter().cloned().collect();
        Self {
            state,
            owner,
            categories,
            topics,
        }
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// The "General" category
    pub fn default_category(&self) -> Option<&Category> {
        find_default(&self.categories)
    }

    /// Topics of one category in position order
    pub fn topics_in(&self, category_id: CategoryId) -> Vec<&Topic> {
        self.topics
            .iter()
            .filter(|t| t.category_id == category_id)
            .collect()
    }

    /// Owned copy of one topic group
    pub(crate) fn group(&self, category_id: CategoryId) -> Vec<Topic> {
        self.topics_in(category_id).into_iter().cloned().collect()
    }

    /// Categories paired with their topics, both in position order
    pub fn board(&self) -> Vec<(&Category, Vec<&Topic>)> {
        self.categories
            .iter()
            .map(|category| (category, self.topics_in(category.id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_snapshot_sorts_and_groups() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let general = Category {
            id: Uuid::new_v4(),
            user_id: owner,
            name: "General".into(),
            sort_order: 0,
            created_at: now,
        };
        let work = Category {
            id: Uuid::new_v4(),
            user_id: owner,
            name: "Work".into(),
            sort_order: 1,
            created_at: now,
        };
        let topic = |category_id, title: &str, order| Topic {
            id: Uuid::new_v4(),
            user_id: owner,
            category_id,
            title: title.into(),
            sort_order: order,
            completed: false,
            created_at: now,
        };

        let snapshot = BoardSnapshot::new(
            SessionState::Ready,
            Some(owner),
            vec![work.clone(), general.clone()],
            vec![topic(work.id, "second", 1), topic(work.id, "first", 0)],
        );

        assert_eq!(snapshot.categories[0].id, general.id);
        assert_eq!(snapshot.default_category().map(|c| c.id), Some(general.id));

        let board = snapshot.board();
        assert!(board[0].1.is_empty());
        let titles: Vec<&str> = board[1].1.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
