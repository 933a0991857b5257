//! Pure derivation of what the list surface shows: chip filter, search, and
//! position assignment over a repository snapshot. Nothing here mutates.

use crate::model::Item;

/// Label of the chip that disables tag filtering.
pub const ALL_FILTER: &str = "All";

/// Chip filter state: everything, or an exact location/category tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    All,
    Tag(String),
}

impl TagFilter {
    /// Parses a chip label, mapping the "All" chip to [`TagFilter::All`].
    pub fn from_label(label: &str) -> Self {
        if label == ALL_FILTER {
            TagFilter::All
        } else {
            TagFilter::Tag(label.to_string())
        }
    }

    fn matches(&self, item: &Item) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Tag(tag) => {
                item.location == *tag || item.category.as_deref() == Some(tag.as_str())
            }
        }
    }
}

/// An item paired with its 1-based position in the unfiltered list.
///
/// Positions stay stable while a search or chip filter is active, so the
/// CLI can keep addressing items by the numbers the full list shows.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    pub item: Item,
    pub position: usize,
}

/// Assigns positions in display order.
pub fn index_items(items: &[Item]) -> Vec<DisplayItem> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| DisplayItem {
            item: item.clone(),
            position: i + 1,
        })
        .collect()
}

/// Derives the visible list: chip filter first, then a case-insensitive
/// substring search over title and location. Relative order is preserved.
pub fn visible_items(items: &[Item], search: &str, filter: &TagFilter) -> Vec<DisplayItem> {
    let term = search.to_lowercase();
    index_items(items)
        .into_iter()
        .filter(|di| filter.matches(&di.item) && matches_search(&di.item, &term))
        .collect()
}

fn matches_search(item: &Item, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    item.title.to_lowercase().contains(term) || item.location.to_lowercase().contains(term)
}

/// Chip selector contents: "All" first, then distinct non-empty locations in
/// first-seen order.
pub fn filter_options(items: &[Item]) -> Vec<String> {
    let mut options = vec![ALL_FILTER.to_string()];
    for item in items {
        if !item.location.is_empty() && !options[1..].contains(&item.location) {
            options.push(item.location.clone());
        }
    }
    options
}
