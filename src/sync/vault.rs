use tracing::{info, warn};

use crate::core::data::{
    Collection, CollectionUpdate, NewCollection, NewPrompt, Prompt, PromptUpdate, VaultState,
};
use crate::core::operations::Vault;
use crate::core::query::PromptQuery;
use crate::core::session::LocalSession;
use crate::core::store::Entity;
use crate::core::traits::SessionProvider;
use crate::sync::{PersistenceGateway, ReconcilePolicy};
use crate::utils::error::{AppError, AppResult};

/// A [`Vault`] mirrored to a [`PersistenceGateway`].
///
/// Mutations are applied to the local vault first so reads reflect them
/// immediately, then sent to the gateway. When the gateway accepts a change
/// its copy of the record replaces the local one; when it refuses, the
/// configured [`ReconcilePolicy`] decides what happens to the local change.
pub struct SyncedVault<G, S = LocalSession> {
    vault: Vault<S>,
    gateway: G,
    policy: ReconcilePolicy,
}

impl<G: PersistenceGateway, S: SessionProvider> SyncedVault<G, S> {
    pub fn new(vault: Vault<S>, gateway: G) -> Self {
        Self {
            vault,
            gateway,
            policy: ReconcilePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub fn vault(&self) -> &Vault<S> {
        &self.vault
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn query(&self) -> PromptQuery<'_> {
        self.vault.query()
    }

    pub fn into_inner(self) -> Vault<S> {
        self.vault
    }

    /// Replace local records with the gateway's lists for the signed-in user
    pub async fn refresh(&mut self) -> AppResult<()> {
        let user_id = self.signed_in_owner()?;
        let prompts = self.gateway.list_prompts(&user_id).await?;
        let collections = self.gateway.list_collections(&user_id).await?;

        info!(
            user_id = %user_id,
            prompts = prompts.len(),
            collections = collections.len(),
            "refreshed from gateway"
        );
        self.vault.replace_all(VaultState {
            prompts,
            collections,
        });
        Ok(())
    }

    pub async fn create_prompt(&mut self, fields: NewPrompt) -> AppResult<Prompt> {
        let local = self.vault.create_prompt(fields)?;
        let result = self.gateway.create_prompt(&local).await;
        self.settle_create(&local.id, result)
    }

    pub async fn update_prompt(&mut self, id: &str, updates: PromptUpdate) -> AppResult<Prompt> {
        let shadow = self.vault.locate::<Prompt>(id);
        let local = self.vault.update_prompt(id, updates.clone())?;
        let result = self
            .gateway
            .update_prompt(&local.user_id, id, &updates)
            .await;
        self.settle_update(id, shadow, result)
    }

    pub async fn toggle_favorite(&mut self, id: &str) -> AppResult<Prompt> {
        let is_favorite = self.current::<Prompt>(id)?.is_favorite;
        let updates = PromptUpdate {
            is_favorite: Some(!is_favorite),
            ..Default::default()
        };
        self.update_prompt(id, updates).await
    }

    pub async fn toggle_template(&mut self, id: &str) -> AppResult<Prompt> {
        let is_template = self.current::<Prompt>(id)?.is_template;
        let updates = PromptUpdate {
            is_template: Some(!is_template),
            ..Default::default()
        };
        self.update_prompt(id, updates).await
    }

    pub async fn delete_prompt(&mut self, id: &str) -> AppResult<Option<Prompt>> {
        let shadow = self.vault.locate::<Prompt>(id);
        let removed = self.vault.delete_prompt(id)?;
        let owner = self.vault.owner().to_string();
        let result = self.gateway.delete_prompt(&owner, id).await;
        self.settle_delete(id, shadow, result)?;
        Ok(removed)
    }

    pub async fn create_collection(&mut self, fields: NewCollection) -> AppResult<Collection> {
        let local = self.vault.create_collection(fields)?;
        let result = self.gateway.create_collection(&local).await;
        self.settle_create(&local.id, result)
    }

    pub async fn update_collection(
        &mut self,
        id: &str,
        updates: CollectionUpdate,
    ) -> AppResult<Collection> {
        let shadow = self.vault.locate::<Collection>(id);
        let local = self.vault.update_collection(id, updates.clone())?;
        let result = self
            .gateway
            .update_collection(&local.user_id, id, &updates)
            .await;
        self.settle_update(id, shadow, result)
    }

    pub async fn delete_collection(&mut self, id: &str) -> AppResult<Option<Collection>> {
        let shadow = self.vault.locate::<Collection>(id);
        let removed = self.vault.delete_collection(id)?;
        let owner = self.vault.owner().to_string();
        let result = self.gateway.delete_collection(&owner, id).await;
        self.settle_delete(id, shadow, result)?;
        Ok(removed)
    }

    fn signed_in_owner(&self) -> AppResult<String> {
        match self.vault.session().current_user() {
            Some(user) if user == self.vault.owner() => Ok(user),
            _ => Err(AppError::NotAuthenticated),
        }
    }

    fn current<E: Entity>(&self, id: &str) -> AppResult<E> {
        self.signed_in_owner()?;
        self.vault
            .locate::<E>(id)
            .map(|(_, record)| record)
            .ok_or_else(|| AppError::not_found(E::KIND, id))
    }

    /// Take the gateway's copy of a record as the local one
    fn accept<E: Entity>(&mut self, local_id: &str, remote: E) -> AppResult<E> {
        if remote.user_id() != self.vault.owner() {
            return Err(AppError::Gateway(format!(
                "gateway returned {} {} owned by another user",
                E::KIND,
                remote.id()
            )));
        }
        if remote.id() != local_id {
            self.vault.discard::<E>(local_id);
        }
        self.vault.put(remote.clone());
        Ok(remote)
    }

    fn settle_create<E: Entity>(&mut self, local_id: &str, result: AppResult<E>) -> AppResult<E> {
        match result {
            Ok(remote) => self.accept(local_id, remote),
            Err(e) => self.reject(E::KIND, local_id, e, |vault| vault.discard::<E>(local_id)),
        }
    }

    fn settle_update<E: Entity>(
        &mut self,
        id: &str,
        shadow: Option<(usize, E)>,
        result: AppResult<E>,
    ) -> AppResult<E> {
        match result {
            Ok(remote) => self.accept(id, remote),
            Err(e) => self.reject(E::KIND, id, e, |vault| {
                if let Some((_, previous)) = shadow {
                    vault.put(previous);
                }
            }),
        }
    }

    fn settle_delete<E: Entity>(
        &mut self,
        id: &str,
        shadow: Option<(usize, E)>,
        result: AppResult<()>,
    ) -> AppResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) => self.reject(E::KIND, id, e, |vault| {
                if let Some((index, previous)) = shadow {
                    vault.restore_at(index, previous);
                }
            }),
        }
    }

    fn reject<T>(
        &mut self,
        kind: &'static str,
        id: &str,
        error: AppError,
        undo: impl FnOnce(&mut Vault<S>),
    ) -> AppResult<T> {
        match self.policy {
            ReconcilePolicy::KeepLocal => {
                warn!(kind, id, error = %error, "gateway rejected change, keeping local copy");
            }
            ReconcilePolicy::Rollback => {
                warn!(kind, id, error = %error, "gateway rejected change, rolling back");
                undo(&mut self.vault);
            }
        }
        Err(error)
    }
}
