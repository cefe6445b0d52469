//! Ordering invariants
//!
//! Pure functions computing dense, zero-based order assignments for one
//! group (all categories of an owner, or all topics of one category).
//! Inputs are never mutated; every function returns a fresh
//! [`OrderAssignment`].
//!
//! Ties on the primary key always keep the prior relative order, falling
//! back to `created_at` and then the id so the result is deterministic
//! even when the store hands back duplicate orders.

use chrono::{DateTime, Utc};
use shared::models::{Category, SortOrderItem, Topic};
use uuid::Uuid;

/// An entity that holds a position inside a group
pub trait Sequenced {
    fn key(&self) -> Uuid;
    fn sort_order(&self) -> i32;
    fn set_sort_order(&mut self, order: i32);
    fn created_at(&self) -> DateTime<Utc>;
}

impl Sequenced for Category {
    fn key(&self) -> Uuid {
        self.id
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn set_sort_order(&mut self, order: i32) {
        self.sort_order = order;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Sequenced for Topic {
    fn key(&self) -> Uuid {
        self.id
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn set_sort_order(&mut self, order: i32) {
        self.sort_order = order;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Mapping id -> order, kept in resulting position order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderAssignment {
    entries: Vec<(Uuid, i32)>,
}

impl OrderAssignment {
    /// Order = position in the given sequence
    pub fn from_sequence(ids: impl IntoIterator<Item = Uuid>) -> Self {
        let entries = ids
            .into_iter()
            .enumerate()
            .map(|(position, id)| (id, to_order(position)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: Uuid) -> Option<i32> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, order)| *order)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Ids in their assigned order
    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uuid, i32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose order differs from the entity's current order
    ///
    /// Ids that are not part of `current` are always reported.
    pub fn changes<T: Sequenced>(&self, current: &[T]) -> Vec<SortOrderItem> {
        self.entries
            .iter()
            .filter(|(id, order)| {
                current
                    .iter()
                    .find(|entity| entity.key() == *id)
                    .is_none_or(|entity| entity.sort_order() != *order)
            })
            .map(|(id, order)| SortOrderItem::new(*id, *order))
            .collect()
    }

    /// Write the assigned orders into matching entities
    pub fn apply<T: Sequenced>(&self, entities: &mut [T]) {
        for entity in entities.iter_mut() {
            if let Some(order) = self.get(entity.key()) {
                entity.set_sort_order(order);
            }
        }
    }
}

fn to_order(position: usize) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}

/// Group members in their current position
pub fn by_position<T: Sequenced>(group: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = group.iter().collect();
    sorted.sort_by(|a, b| {
        a.sort_order()
            .cmp(&b.sort_order())
            .then_with(|| a.created_at().cmp(&b.created_at()))
            .then_with(|| a.key().cmp(&b.key()))
    });
    sorted
}

/// Order for a new entity appended to `group`
pub fn append_to_end<T>(group: &[T]) -> i32 {
    to_order(group.len())
}

/// Re-index the remaining members after `removed` leaves the group
pub fn compact_after_removal<T: Sequenced>(group: &[T], removed: Uuid) -> OrderAssignment {
    OrderAssignment::from_sequence(
        by_position(group)
            .into_iter()
            .map(Sequenced::key)
            .filter(|id| *id != removed),
    )
}

/// Re-index the whole group to `0..count-1` keeping relative order
pub fn compact<T: Sequenced>(group: &[T]) -> OrderAssignment {
    OrderAssignment::from_sequence(by_position(group).into_iter().map(Sequenced::key))
}

/// Place `entity` at `target_index`, shifting the members at or after it
///
/// `target_index` is clamped to `[0, count]` where count excludes the
/// entity itself, so a member of the group is moved rather than duplicated.
pub fn insert_at<T: Sequenced>(group: &[T], entity: Uuid, target_index: i32) -> OrderAssignment {
    let mut ids: Vec<Uuid> = by_position(group)
        .into_iter()
        .map(Sequenced::key)
        .filter(|id| *id != entity)
        .collect();
    let index = usize::try_from(target_index.max(0))
        .unwrap_or(0)
        .min(ids.len());
    ids.insert(index, entity);
    OrderAssignment::from_sequence(ids)
}

/// Completed topics first, each side keeping its prior order
pub fn sort_by_completion_then_order(topics: &[Topic]) -> OrderAssignment {
    let mut sorted = by_position(topics);
    // stable: equal completion keeps positional order
    sorted.sort_by_key(|topic| !topic.completed);
    OrderAssignment::from_sequence(sorted.into_iter().map(|topic| topic.id))
}

/// Order = position in an explicit drag-and-drop sequence
pub fn reindex_by_explicit_sequence(ids: &[Uuid]) -> OrderAssignment {
    OrderAssignment::from_sequence(ids.iter().copied())
}

/// Whether the group's orders are exactly `{0, .., count-1}`
pub fn is_dense<T: Sequenced>(group: &[T]) -> bool {
    let mut orders: Vec<i32> = group.iter().map(Sequenced::sort_order).collect();
    orders.sort_unstable();
    orders
        .iter()
        .enumerate()
        .all(|(position, order)| *order == to_order(position))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(title: &str, order: i32, completed: bool) -> Topic {
        Topic {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            category_id: Uuid::nil(),
            title: title.to_string(),
            sort_order: order,
            completed,
            created_at: DateTime::from_timestamp(1_700_000_000 + i64::from(order), 0).unwrap(),
        }
    }

    fn titles_in_order(topics: &[Topic], assignment: &OrderAssignment) -> Vec<String> {
        assignment
            .ids()
            .map(|id| topics.iter().find(|t| t.id == id).unwrap().title.clone())
            .collect()
    }

    #[test]
    fn test_append_to_end() {
        let group = vec![topic("a", 0, false), topic("b", 1, false)];
        assert_eq!(append_to_end(&group), 2);
        assert_eq!(append_to_end::<Topic>(&[]), 0);
    }

    #[test]
    fn test_compact_after_removal() {
        let group = vec![
            topic("a", 0, false),
            topic("b", 1, false),
            topic("c", 2, false),
            topic("d", 3, false),
        ];
        let assignment = compact_after_removal(&group, group[1].id);

        assert_eq!(assignment.len(), 3);
        assert!(!assignment.contains(group[1].id));
        assert_eq!(assignment.get(group[0].id), Some(0));
        assert_eq!(assignment.get(group[2].id), Some(1));
        assert_eq!(assignment.get(group[3].id), Some(2));
    }

    #[test]
    fn test_compact_after_removal_does_not_mutate_input() {
        let group = vec![topic("a", 0, false), topic("b", 1, false)];
        let before = group.clone();
        let _ = compact_after_removal(&group, group[0].id);
        assert_eq!(group, before);
    }

    #[test]
    fn test_insert_at_shifts_later_members() {
        let group = vec![topic("a", 0, false), topic("b", 1, false), topic("c", 2, false)];
        let incoming = Uuid::new_v4();
        let assignment = insert_at(&group, incoming, 1);

        assert_eq!(assignment.get(group[0].id), Some(0));
        assert_eq!(assignment.get(incoming), Some(1));
        assert_eq!(assignment.get(group[1].id), Some(2));
        assert_eq!(assignment.get(group[2].id), Some(3));
    }

    #[test]
    fn test_insert_at_clamps_index() {
        let group = vec![topic("a", 0, false), topic("b", 1, false)];
        let incoming = Uuid::new_v4();

        let past_end = insert_at(&group, incoming, 99);
        assert_eq!(past_end.get(incoming), Some(2));

        let negative = insert_at(&group, incoming, -4);
        assert_eq!(negative.get(incoming), Some(0));
        assert_eq!(negative.get(group[1].id), Some(2));
    }

    #[test]
    fn test_insert_at_moves_existing_member() {
        let group = vec![topic("a", 0, false), topic("b", 1, false), topic("c", 2, false)];
        let assignment = insert_at(&group, group[2].id, 0);

        assert_eq!(assignment.len(), 3);
        assert_eq!(titles_in_order(&group, &assignment), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_completion_sort_moves_completed_to_top() {
        let group = vec![topic("A", 0, false), topic("B", 1, true), topic("C", 2, false)];
        let assignment = sort_by_completion_then_order(&group);
        assert_eq!(titles_in_order(&group, &assignment), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_completion_sort_is_stable() {
        let group = vec![
            topic("A", 0, true),
            topic("B", 1, false),
            topic("C", 2, true),
            topic("D", 3, false),
        ];
        let first = sort_by_completion_then_order(&group);
        assert_eq!(titles_in_order(&group, &first), vec!["A", "C", "B", "D"]);

        let mut resorted = group.clone();
        first.apply(&mut resorted);
        let second = sort_by_completion_then_order(&resorted);
        assert_eq!(titles_in_order(&resorted, &second), vec!["A", "C", "B", "D"]);
        assert!(second.changes(&resorted).is_empty());
    }

    #[test]
    fn test_reindex_by_explicit_sequence() {
        let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let assignment = reindex_by_explicit_sequence(&ids);
        assert_eq!(assignment.ids().collect::<Vec<_>>(), ids.to_vec());
        assert_eq!(assignment.get(ids[2]), Some(2));
    }

    #[test]
    fn test_changes_reports_only_moved_entries() {
        let group = vec![topic("a", 0, false), topic("b", 1, false), topic("c", 2, false)];
        let assignment = insert_at(&group, group[2].id, 1);
        let changes = assignment.changes(&group);

        assert_eq!(changes.len(), 2);
        assert!(changes.contains(&SortOrderItem::new(group[2].id, 1)));
        assert!(changes.contains(&SortOrderItem::new(group[1].id, 2)));
    }

    #[test]
    fn test_duplicate_orders_fall_back_to_created_at() {
        let mut late = topic("late", 0, false);
        late.created_at = DateTime::from_timestamp(1_800_000_000, 0).unwrap();
        let early = topic("early", 0, false);
        let group = vec![late, early];

        let assignment = compact(&group);
        assert_eq!(titles_in_order(&group, &assignment), vec!["early", "late"]);
    }

    #[test]
    fn test_is_dense() {
        assert!(is_dense::<Topic>(&[]));
        assert!(is_dense(&[topic("a", 1, false), topic("b", 0, false)]));
        assert!(!is_dense(&[topic("a", 0, false), topic("b", 2, false)]));
        assert!(!is_dense(&[topic("a", 0, false), topic("b", 0, false)]));
    }
}
