//! The repository: the single in-memory source of truth for the item
//! collection, and every mutation on it.
//!
//! Each mutating operation applies its change to the in-memory list and then
//! writes the whole list through to the store before returning. Validation
//! and not-found errors reject the operation before anything is touched. A
//! failed persistence write does NOT roll the in-memory change back — the
//! operation's [`CmdResult`] carries a warning instead, and the app keeps
//! working against the in-memory copy.
//!
//! There is no push notification between surfaces showing the list; a
//! surface calls [`ItemRepository::reload`] when it regains focus to pick up
//! whatever was persisted elsewhere. Two mutations racing against a stale
//! snapshot can lose an update; callers are expected to be user-paced, one
//! action at a time.

use crate::error::{Result, ShelfError};
use crate::model::{Item, ItemDraft, ItemPatch};
use crate::store::{ItemStore, KeyValue};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Outcome of a repository operation: the items it touched, plus messages
/// for the UI to render. An operation that persisted nothing new (e.g. undo
/// with an empty buffer) has no affected items.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_items: Vec<Item>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn warned(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}

/// In-memory holder of the item collection plus its mutation operations.
///
/// Construct one per app lifetime and hand it to consumers by reference;
/// it is the sole writer to the underlying store.
pub struct ItemRepository<K: KeyValue> {
    store: ItemStore<K>,
    current: Vec<Item>,
    last_deleted: Option<Item>,
}

impl<K: KeyValue> ItemRepository<K> {
    pub fn new(kv: K) -> Self {
        Self {
            store: ItemStore::new(kv),
            current: Vec::new(),
            last_deleted: None,
        }
    }

    /// The current snapshot, in display order.
    pub fn items(&self) -> &[Item] {
        &self.current
    }

    pub fn store(&self) -> &ItemStore<K> {
        &self.store
    }

    /// Replaces the snapshot with whatever is persisted. Call on (re)focus
    /// of the list surface; this is the only sync between surfaces.
    pub fn reload(&mut self) {
        self.current = self.store.load();
    }

    /// Validates the draft, assigns a fresh id, and appends to the end.
    pub fn add(&mut self, draft: ItemDraft) -> Result<CmdResult> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(ShelfError::Validation("Title cannot be empty".to_string()));
        }

        let item = Item::new(title, draft.location, draft.category, draft.image);
        self.current.push(item.clone());

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Item added: {}", item.title)));
        result.affected_items.push(item);
        self.persist(&mut result);
        Ok(result)
    }

    /// Replaces the patched fields in place; the item keeps its id and its
    /// position in the list.
    pub fn edit(&mut self, id: Uuid, patch: ItemPatch) -> Result<CmdResult> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ShelfError::Validation("Title cannot be empty".to_string()));
            }
        }
        let pos = self.position(id).ok_or(ShelfError::ItemNotFound(id))?;

        {
            let item = &mut self.current[pos];
            if let Some(title) = patch.title {
                item.title = title.trim().to_string();
            }
            if let Some(location) = patch.location {
                item.location = location;
            }
            if let Some(category) = patch.category {
                item.category = category;
            }
            if let Some(image) = patch.image {
                item.image = image;
            }
        }

        let item = self.current[pos].clone();
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Item updated: {}", item.title)));
        result.affected_items.push(item);
        self.persist(&mut result);
        Ok(result)
    }

    /// Removes the item and parks it in the undo buffer. Only the most
    /// recent deletion is recoverable.
    pub fn delete(&mut self, id: Uuid) -> Result<CmdResult> {
        let pos = self.position(id).ok_or(ShelfError::ItemNotFound(id))?;
        let item = self.current.remove(pos);
        self.last_deleted = Some(item.clone());

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Item deleted: {}", item.title)));
        result.affected_items.push(item);
        self.persist(&mut result);
        Ok(result)
    }

    /// Restores the most recently deleted item, appended to the end of the
    /// list rather than its old position. No-op when the buffer is empty.
    pub fn undo_delete(&mut self) -> CmdResult {
        let mut result = CmdResult::default();
        let Some(item) = self.last_deleted.take() else {
            result.add_message(CmdMessage::info("Nothing to undo."));
            return result;
        };

        self.current.push(item.clone());
        result.add_message(CmdMessage::success(format!("Item restored: {}", item.title)));
        result.affected_items.push(item);
        self.persist(&mut result);
        result
    }

    /// Replaces the display order. `new_order` must contain exactly the ids
    /// currently in the collection; anything else is rejected untouched.
    pub fn reorder(&mut self, new_order: &[Uuid]) -> Result<CmdResult> {
        if new_order.len() != self.current.len() {
            return Err(ShelfError::Validation(format!(
                "Reorder must list every item exactly once ({} given, {} present)",
                new_order.len(),
                self.current.len()
            )));
        }
        let current_ids: HashSet<Uuid> = self.current.iter().map(|i| i.id).collect();
        let mut seen = HashSet::new();
        for id in new_order {
            if !current_ids.contains(id) {
                return Err(ShelfError::ItemNotFound(*id));
            }
            if !seen.insert(*id) {
                return Err(ShelfError::Validation(format!(
                    "Duplicate id in reorder: {}",
                    id
                )));
            }
        }

        let index_of: HashMap<Uuid, usize> = new_order
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        self.current.sort_by_key(|item| index_of[&item.id]);

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success("Order updated."));
        self.persist(&mut result);
        Ok(result)
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.current.iter().position(|item| item.id == id)
    }

    // Write-through step shared by every mutating operation.
    fn persist(&mut self, result: &mut CmdResult) {
        if let Err(e) = self.store.save(&self.current) {
            tracing::warn!("failed to persist item list: {e}");
            result.add_message(CmdMessage::warning(format!(
                "Could not save changes ({}). They may not survive a restart.",
                e
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::FailingStore;
    use crate::store::memory::InMemoryStore;
    use crate::store::STORAGE_KEY;

    fn draft(title: &str, location: &str) -> ItemDraft {
        ItemDraft {
            title: title.to_string(),
            location: location.to_string(),
            ..ItemDraft::default()
        }
    }

    fn repo_with(titles: &[&str]) -> ItemRepository<InMemoryStore> {
        let mut repo = ItemRepository::new(InMemoryStore::new());
        for title in titles {
            repo.add(draft(title, "")).unwrap();
        }
        repo
    }

    #[test]
    fn add_appends_and_persists() {
        let mut repo = repo_with(&["First", "Second"]);
        let result = repo.add(draft("Third", "Box A")).unwrap();

        assert_eq!(result.affected_items[0].title, "Third");
        let titles: Vec<_> = repo.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(repo.store().load(), repo.items());
    }

    #[test]
    fn add_trims_the_title() {
        let mut repo = repo_with(&[]);
        repo.add(draft("  Headphones  ", "")).unwrap();
        assert_eq!(repo.items()[0].title, "Headphones");
    }

    #[test]
    fn add_rejects_blank_title_without_mutating() {
        let mut repo = repo_with(&["Kept"]);
        let err = repo.add(draft("   ", "Box A")).unwrap_err();

        assert!(matches!(err, ShelfError::Validation(_)));
        assert_eq!(repo.items().len(), 1);
        assert_eq!(repo.store().load().len(), 1);
    }

    #[test]
    fn add_assigns_unique_ids() {
        let mut repo = repo_with(&[]);
        for i in 0..50 {
            repo.add(draft(&format!("Item {}", i), "")).unwrap();
        }

        let ids: HashSet<Uuid> = repo.items().iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn edit_replaces_fields_in_place() {
        let mut repo = repo_with(&["A", "B", "C", "D", "E"]);
        let id = repo.items()[1].id;

        repo.edit(
            id,
            ItemPatch {
                title: Some("B renamed".to_string()),
                location: Some("Shelf 2".to_string()),
                ..ItemPatch::default()
            },
        )
        .unwrap();

        // Same id at the same index, new fields
        assert_eq!(repo.items()[1].id, id);
        assert_eq!(repo.items()[1].title, "B renamed");
        assert_eq!(repo.items()[1].location, "Shelf 2");
        assert_eq!(repo.store().load(), repo.items());
    }

    #[test]
    fn edit_can_clear_category_and_image() {
        let mut repo = repo_with(&[]);
        repo.add(ItemDraft {
            title: "Camera".to_string(),
            location: "Drawer".to_string(),
            category: Some("Electronics".to_string()),
            image: Some("file:///photo.jpg".to_string()),
        })
        .unwrap();
        let id = repo.items()[0].id;

        repo.edit(
            id,
            ItemPatch {
                category: Some(None),
                image: Some(None),
                ..ItemPatch::default()
            },
        )
        .unwrap();

        assert_eq!(repo.items()[0].category, None);
        assert_eq!(repo.items()[0].image, None);
    }

    #[test]
    fn edit_rejects_blank_title() {
        let mut repo = repo_with(&["A"]);
        let id = repo.items()[0].id;

        let err = repo
            .edit(
                id,
                ItemPatch {
                    title: Some("  ".to_string()),
                    ..ItemPatch::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, ShelfError::Validation(_)));
        assert_eq!(repo.items()[0].title, "A");
    }

    #[test]
    fn edit_unknown_id_is_not_found() {
        let mut repo = repo_with(&["A"]);
        let err = repo.edit(Uuid::new_v4(), ItemPatch::default()).unwrap_err();
        assert!(matches!(err, ShelfError::ItemNotFound(_)));
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut repo = repo_with(&["A"]);
        let err = repo.delete(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ShelfError::ItemNotFound(_)));
        assert_eq!(repo.items().len(), 1);
    }

    #[test]
    fn delete_then_undo_appends_at_the_end() {
        let mut repo = repo_with(&["A", "B", "C"]);
        let b = repo.items()[1].clone();

        let result = repo.delete(b.id).unwrap();
        assert_eq!(result.affected_items, vec![b.clone()]);
        let titles: Vec<_> = repo.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(repo.store().load(), repo.items());

        // Undo re-inserts at the end, not at the original index
        repo.undo_delete();
        let titles: Vec<_> = repo.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C", "B"]);
        assert_eq!(repo.items()[2].id, b.id);
        assert_eq!(repo.store().load(), repo.items());
    }

    #[test]
    fn second_undo_is_a_no_op() {
        let mut repo = repo_with(&["A", "B", "C"]);
        let b = repo.items()[1].id;
        repo.delete(b).unwrap();
        repo.undo_delete();

        let result = repo.undo_delete();
        assert!(result.affected_items.is_empty());
        let titles: Vec<_> = repo.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C", "B"]);
    }

    #[test]
    fn only_the_most_recent_deletion_is_recoverable() {
        let mut repo = repo_with(&["A", "B"]);
        let a = repo.items()[0].id;
        let b = repo.items()[1].id;

        repo.delete(a).unwrap();
        repo.delete(b).unwrap();
        repo.undo_delete();

        let titles: Vec<_> = repo.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["B"]);
    }

    #[test]
    fn reorder_applies_the_given_order() {
        let mut repo = repo_with(&["A", "B", "C"]);
        let mut order: Vec<Uuid> = repo.items().iter().map(|i| i.id).collect();
        order.reverse();

        repo.reorder(&order).unwrap();
        let titles: Vec<_> = repo.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
        assert_eq!(repo.store().load(), repo.items());
    }

    #[test]
    fn reorder_rejects_a_missing_id() {
        let mut repo = repo_with(&["A", "B", "C"]);
        let mut order: Vec<Uuid> = repo.items().iter().map(|i| i.id).collect();
        order.pop();
        order.push(Uuid::new_v4());

        assert!(repo.reorder(&order).is_err());
        let titles: Vec<_> = repo.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn reorder_rejects_wrong_length_and_duplicates() {
        let mut repo = repo_with(&["A", "B"]);
        let ids: Vec<Uuid> = repo.items().iter().map(|i| i.id).collect();

        assert!(repo.reorder(&ids[..1]).is_err());
        assert!(repo.reorder(&[ids[0], ids[0]]).is_err());
        let titles: Vec<_> = repo.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn persistence_failure_keeps_the_memory_change_and_warns() {
        let (kv, fail) = FailingStore::new();
        let mut repo = ItemRepository::new(kv);
        repo.add(draft("Durable", "")).unwrap();

        fail.set(true);
        let result = repo.add(draft("Memory only", "")).unwrap();

        assert!(result.warned());
        assert_eq!(repo.items().len(), 2);
        // The store still holds the last successful write
        assert_eq!(repo.store().load().len(), 1);
    }

    #[test]
    fn reload_picks_up_externally_persisted_items() {
        let mut kv = InMemoryStore::new();
        let elsewhere = vec![Item::new(
            "Added elsewhere".to_string(),
            "Box A".to_string(),
            None,
            None,
        )];
        kv.set(STORAGE_KEY, &serde_json::to_string(&elsewhere).unwrap())
            .unwrap();

        let mut repo = ItemRepository::new(kv);
        assert!(repo.items().is_empty());
        repo.reload();
        assert_eq!(repo.items().len(), 1);
        assert_eq!(repo.items()[0].title, "Added elsewhere");
    }

    #[test]
    fn reload_survives_a_corrupt_store() {
        let mut kv = InMemoryStore::new();
        kv.set(STORAGE_KEY, "not json at all").unwrap();

        let mut repo = ItemRepository::new(kv);
        repo.reload();
        assert!(repo.items().is_empty());

        // And the user can still add on top of the fallback
        repo.add(draft("Fresh start", "")).unwrap();
        assert_eq!(repo.store().load().len(), 1);
    }
}
