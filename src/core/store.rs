//! In-memory entity store
//!
//! Holds the authoritative prompt and collection records for one owner.
//! Records are kept in store order, most recently created first.

use crate::core::data::{Collection, Prompt, VaultState};
use std::collections::HashSet;
use tracing::warn;

/// A record type held by the [`EntityStore`]
pub trait Entity: Clone {
    /// Human readable name used in errors and logs
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn user_id(&self) -> &str;

    fn records(store: &EntityStore) -> &Vec<Self>;
    fn records_mut(store: &mut EntityStore) -> &mut Vec<Self>;
}

impl Entity for Prompt {
    const KIND: &'static str = "Prompt";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn records(store: &EntityStore) -> &Vec<Self> {
        &store.prompts
    }

    fn records_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.prompts
    }
}

impl Entity for Collection {
    const KIND: &'static str = "Collection";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn records(store: &EntityStore) -> &Vec<Self> {
        &store.collections
    }

    fn records_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.collections
    }
}

#[derive(Debug, Clone)]
pub struct EntityStore {
    owner: String,
    prompts: Vec<Prompt>,
    collections: Vec<Collection>,
}

impl EntityStore {
    /// Create a store for `owner` seeded with `initial`.
    ///
    /// Records owned by someone else and repeated ids are dropped.
    pub fn new(owner: impl Into<String>, initial: VaultState) -> Self {
        let mut store = Self {
            owner: owner.into(),
            prompts: Vec::new(),
            collections: Vec::new(),
        };
        store.replace_all(initial.prompts);
        store.replace_all(initial.collections);
        store
    }

    pub fn empty(owner: impl Into<String>) -> Self {
        Self::new(owner, VaultState::default())
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn list<E: Entity>(&self) -> &[E] {
        E::records(self)
    }

    pub fn get<E: Entity>(&self, id: &str) -> Option<&E> {
        E::records(self).iter().find(|e| e.id() == id)
    }

    pub fn contains<E: Entity>(&self, id: &str) -> bool {
        self.get::<E>(id).is_some()
    }

    /// Replace every record of type `E`, keeping the given order
    pub fn replace_all<E: Entity>(&mut self, items: Vec<E>) {
        let owner = self.owner.clone();
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(items.len());

        for item in items {
            if item.user_id() != owner {
                warn!(kind = E::KIND, id = item.id(), "dropping record owned by another user");
                continue;
            }
            if !seen.insert(item.id().to_string()) {
                warn!(kind = E::KIND, id = item.id(), "dropping record with duplicate id");
                continue;
            }
            kept.push(item);
        }

        *E::records_mut(self) = kept;
    }

    /// Snapshot of everything in the store
    pub fn state(&self) -> VaultState {
        VaultState {
            prompts: self.prompts.clone(),
            collections: self.collections.clone(),
        }
    }

    pub(crate) fn insert_front<E: Entity>(&mut self, item: E) {
        E::records_mut(self).insert(0, item);
    }

    pub(crate) fn insert_at<E: Entity>(&mut self, index: usize, item: E) {
        let records = E::records_mut(self);
        let index = index.min(records.len());
        records.insert(index, item);
    }

    pub(crate) fn get_mut<E: Entity>(&mut self, id: &str) -> Option<&mut E> {
        E::records_mut(self).iter_mut().find(|e| e.id() == id)
    }

    pub(crate) fn position<E: Entity>(&self, id: &str) -> Option<usize> {
        E::records(self).iter().position(|e| e.id() == id)
    }

    /// Remove a record, returning it with its former position
    pub(crate) fn remove<E: Entity>(&mut self, id: &str) -> Option<(usize, E)> {
        let index = self.position::<E>(id)?;
        Some((index, E::records_mut(self).remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn prompt(id: &str, user: &str) -> Prompt {
        let now = Utc::now();
        Prompt {
            id: id.to_string(),
            user_id: user.to_string(),
            collection_id: None,
            title: format!("Prompt {}", id),
            content: "content".to_string(),
            output: String::new(),
            tags: Vec::new(),
            is_favorite: false,
            is_template: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_drops_foreign_and_duplicate_records() {
        let state = VaultState {
            prompts: vec![prompt("a", "me"), prompt("b", "you"), prompt("a", "me"), prompt("c", "me")],
            collections: Vec::new(),
        };
        let store = EntityStore::new("me", state);

        let ids: Vec<&str> = store.list::<Prompt>().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(store.get::<Prompt>("b").is_none());
    }

    #[test]
    fn test_insert_front_and_remove() {
        let mut store = EntityStore::empty("me");
        store.insert_front(prompt("a", "me"));
        store.insert_front(prompt("b", "me"));
        assert_eq!(store.list::<Prompt>()[0].id, "b");

        let (index, removed) = store.remove::<Prompt>("a").unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.id, "a");
        assert!(store.remove::<Prompt>("a").is_none());
    }

    #[test]
    fn test_replace_all_swaps_contents() {
        let mut store = EntityStore::empty("me");
        store.insert_front(prompt("old", "me"));
        store.replace_all(vec![prompt("x", "me"), prompt("y", "me")]);

        assert!(!store.contains::<Prompt>("old"));
        assert_eq!(store.list::<Prompt>().len(), 2);
        assert_eq!(store.state().prompts.len(), 2);
    }
}
