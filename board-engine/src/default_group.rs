//! Default category guarantee
//!
//! Every owner has exactly one category named "General" at order 0 once
//! the board is loaded. Planning is pure; the engine executes the plan
//! (order patches first, then the insert).

use shared::models::{Category, SortOrderItem, DEFAULT_CATEGORY_NAME};

/// What the engine has to write so the default category exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultGroupPlan {
    /// Fetched categories with any shifted orders already applied
    pub categories: Vec<Category>,
    /// Order changes to persist before creating the default category
    pub patches: Vec<SortOrderItem>,
    /// Order of the default category to create, if it is missing
    pub create_at: Option<i32>,
}

impl DefaultGroupPlan {
    pub fn is_noop(&self) -> bool {
        self.patches.is_empty() && self.create_at.is_none()
    }
}

/// Plan the default category for a freshly fetched category set
///
/// Never deletes or renames; it only shifts orders and asks for an insert.
pub fn plan_default_group(categories: Vec<Category>) -> DefaultGroupPlan {
    if categories.iter().any(Category::is_default) {
        return DefaultGroupPlan {
            categories,
            patches: Vec::new(),
            create_at: None,
        };
    }

    let occupied = categories.iter().any(|c| c.sort_order == 0);
    if !occupied {
        return DefaultGroupPlan {
            categories,
            patches: Vec::new(),
            create_at: Some(0),
        };
    }

    let mut shifted = categories;
    let mut patches = Vec::with_capacity(shifted.len());
    for category in shifted.iter_mut() {
        category.sort_order += 1;
        patches.push(SortOrderItem::new(category.id, category.sort_order));
    }

    DefaultGroupPlan {
        categories: shifted,
        patches,
        create_at: Some(0),
    }
}

/// The default category of a board, if present
///
/// With several "General" categories (left behind by older clients) the
/// one in front wins.
pub fn find_default(categories: &[Category]) -> Option<&Category> {
    categories
        .iter()
        .filter(|c| c.name == DEFAULT_CATEGORY_NAME)
        .min_by_key(|c| (c.sort_order, c.created_at))
}
