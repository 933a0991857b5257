use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One inventory entry.
///
/// Field names match the persisted JSON layout (`id`, `title`, `location`,
/// `category`, `image`). Data written by early versions may lack `location`,
/// so it defaults to empty on read; `category` and `image` are omitted from
/// the JSON entirely when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    // URI of a photo; stored verbatim, never interpreted or owned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Item {
    pub fn new(
        title: String,
        location: String,
        category: Option<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            location,
            category,
            image,
        }
    }
}

/// Input for the add operation. The repository validates the title.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub title: String,
    pub location: String,
    pub category: Option<String>,
    pub image: Option<String>,
}

/// Field-wise update for the edit operation.
///
/// `None` leaves a field untouched. For `category` and `image`, `Some(None)`
/// clears the field.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub location: Option<String>,
    pub category: Option<Option<String>>,
    pub image: Option<Option<String>>,
}
