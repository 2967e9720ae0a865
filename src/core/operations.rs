//! Mutation API
//!
//! [`Vault`] pairs an [`EntityStore`] with the session that owns it. Every
//! mutation checks the session, validates its input before touching the
//! store, and stamps lifecycle timestamps.

use crate::core::data::{
    Collection, CollectionUpdate, NewCollection, NewPrompt, Prompt, PromptUpdate, VaultState,
    DEFAULT_COLLECTION_COLOR, new_id, normalize_tags,
};
use crate::core::query::PromptQuery;
use crate::core::session::LocalSession;
use crate::core::store::{Entity, EntityStore};
use crate::core::traits::SessionProvider;
use crate::utils::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use tracing::debug;

pub struct Vault<S = LocalSession> {
    store: EntityStore,
    session: S,
    default_color: String,
}

impl Vault<LocalSession> {
    /// Vault for a locally signed-in user
    pub fn for_user(user_id: impl Into<String>, initial: VaultState) -> Self {
        let user_id = user_id.into();
        Self::new(EntityStore::new(user_id.clone(), initial), LocalSession::signed_in(user_id))
    }
}

impl<S: SessionProvider> Vault<S> {
    pub fn new(store: EntityStore, session: S) -> Self {
        Self {
            store,
            session,
            default_color: DEFAULT_COLLECTION_COLOR.to_string(),
        }
    }

    /// Colour given to collections created without one
    pub fn with_default_color(mut self, color: impl Into<String>) -> AppResult<Self> {
        let color = color.into();
        validate_color(&color)?;
        self.default_color = color;
        Ok(self)
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn owner(&self) -> &str {
        self.store.owner()
    }

    /// Read view of the records visible to the current session.
    ///
    /// Anyone other than the store owner sees an empty vault.
    pub fn query(&self) -> PromptQuery<'_> {
        if self.session.current_user().as_deref() == Some(self.store.owner()) {
            PromptQuery::over(&self.store)
        } else {
            PromptQuery::empty()
        }
    }

    pub fn state(&self) -> VaultState {
        self.store.state()
    }

    /// Replace all records, as done on initial load or refresh
    pub fn replace_all(&mut self, state: VaultState) {
        debug!(
            prompts = state.prompts.len(),
            collections = state.collections.len(),
            "replacing vault contents"
        );
        self.store.replace_all(state.prompts);
        self.store.replace_all(state.collections);
    }

    fn authorize(&self) -> AppResult<String> {
        match self.session.current_user() {
            Some(user) if user == self.store.owner() => Ok(user),
            _ => Err(AppError::NotAuthenticated),
        }
    }

    pub fn create_prompt(&mut self, fields: NewPrompt) -> AppResult<Prompt> {
        let user_id = self.authorize()?;
        validate_required("title", &fields.title)?;
        validate_required("content", &fields.content)?;

        let now = Utc::now();
        let prompt = Prompt {
            id: new_id(),
            user_id,
            collection_id: fields.collection_id.filter(|id| !id.is_empty()),
            title: fields.title,
            content: fields.content,
            output: fields.output,
            tags: normalize_tags(fields.tags),
            is_favorite: fields.is_favorite,
            is_template: fields.is_template,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %prompt.id, title = %prompt.title, "created prompt");
        self.store.insert_front(prompt.clone());
        Ok(prompt)
    }

    pub fn update_prompt(&mut self, id: &str, updates: PromptUpdate) -> AppResult<Prompt> {
        self.authorize()?;
        let current = self
            .store
            .get::<Prompt>(id)
            .ok_or_else(|| AppError::not_found(Prompt::KIND, id))?;

        let mut updated = current.clone();
        updates.apply_to(&mut updated);
        validate_required("title", &updated.title)?;
        validate_required("content", &updated.content)?;
        updated.updated_at = touch(updated.updated_at);

        debug!(id, "updated prompt");
        self.commit(updated)
    }

    /// Delete a prompt. Deleting an unknown id is a no-op.
    pub fn delete_prompt(&mut self, id: &str) -> AppResult<Option<Prompt>> {
        self.authorize()?;
        let removed = self.store.remove::<Prompt>(id).map(|(_, p)| p);
        debug!(id, removed = removed.is_some(), "deleted prompt");
        Ok(removed)
    }

    pub fn toggle_favorite(&mut self, id: &str) -> AppResult<Prompt> {
        let is_favorite = self.require::<Prompt>(id)?.is_favorite;
        self.update_prompt(
            id,
            PromptUpdate {
                is_favorite: Some(!is_favorite),
                ..Default::default()
            },
        )
    }

    pub fn toggle_template(&mut self, id: &str) -> AppResult<Prompt> {
        let is_template = self.require::<Prompt>(id)?.is_template;
        self.update_prompt(
            id,
            PromptUpdate {
                is_template: Some(!is_template),
                ..Default::default()
            },
        )
    }

    pub fn create_collection(&mut self, fields: NewCollection) -> AppResult<Collection> {
        let user_id = self.authorize()?;
        validate_required("name", &fields.name)?;
        let color = match fields.color {
            Some(color) if !color.trim().is_empty() => color,
            _ => self.default_color.clone(),
        };
        validate_color(&color)?;

        let now = Utc::now();
        let collection = Collection {
            id: new_id(),
            user_id,
            name: fields.name,
            description: fields.description,
            color,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %collection.id, name = %collection.name, "created collection");
        self.store.insert_front(collection.clone());
        Ok(collection)
    }

    pub fn update_collection(
        &mut self,
        id: &str,
        updates: CollectionUpdate,
    ) -> AppResult<Collection> {
        self.authorize()?;
        let mut updated = self
            .store
            .get::<Collection>(id)
            .ok_or_else(|| AppError::not_found(Collection::KIND, id))?
            .clone();

        updates.apply_to(&mut updated);
        validate_required("name", &updated.name)?;
        validate_color(&updated.color)?;
        updated.updated_at = touch(updated.updated_at);

        debug!(id, "updated collection");
        self.commit(updated)
    }

    /// Delete a collection. Prompts that referenced it keep their
    /// `collection_id` and read as uncategorized from then on.
    pub fn delete_collection(&mut self, id: &str) -> AppResult<Option<Collection>> {
        self.authorize()?;
        let removed = self.store.remove::<Collection>(id).map(|(_, c)| c);
        debug!(id, removed = removed.is_some(), "deleted collection");
        Ok(removed)
    }

    fn require<E: Entity>(&self, id: &str) -> AppResult<&E> {
        self.authorize()?;
        self.store
            .get::<E>(id)
            .ok_or_else(|| AppError::not_found(E::KIND, id))
    }

    /// Write a fully validated record back in place
    fn commit<E: Entity>(&mut self, record: E) -> AppResult<E> {
        let slot = self
            .store
            .get_mut::<E>(record.id())
            .ok_or_else(|| AppError::not_found(E::KIND, record.id()))?;
        *slot = record.clone();
        Ok(record)
    }

    // Used by the gateway layer to apply reconciliation results

    pub(crate) fn put<E: Entity>(&mut self, record: E) {
        match self.store.get_mut::<E>(record.id()) {
            Some(slot) => *slot = record,
            None => self.store.insert_front(record),
        }
    }

    pub(crate) fn restore_at<E: Entity>(&mut self, index: usize, record: E) {
        if !self.store.contains::<E>(record.id()) {
            self.store.insert_at(index, record);
        }
    }

    pub(crate) fn discard<E: Entity>(&mut self, id: &str) {
        self.store.remove::<E>(id);
    }

    pub(crate) fn locate<E: Entity>(&self, id: &str) -> Option<(usize, E)> {
        let index = self.store.position::<E>(id)?;
        Some((index, self.store.list::<E>()[index].clone()))
    }
}

/// New `updated_at` that never moves backwards
fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous)
}

fn validate_required(field: &'static str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Colours are `#RRGGBB` hex strings
pub fn validate_color(color: &str) -> AppResult<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::validation(
            "color",
            format!("'{}' is not a #RRGGBB hex colour", color),
        ));
    }
    Ok(())
}
