//! Remote persistence
//!
//! A [`PersistenceGateway`] is the authoritative backing store for a
//! user's records. [`SyncedVault`] keeps a local [`Vault`](crate::core::operations::Vault)
//! in step with one, applying mutations locally first.

pub mod memory;
pub mod snapshot;
pub mod vault;

pub use memory::MemoryGateway;
pub use snapshot::SnapshotGateway;
pub use vault::SyncedVault;

use crate::core::data::{Collection, CollectionUpdate, Prompt, PromptUpdate};
use crate::utils::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Backend holding the authoritative copy of every user's records.
///
/// All calls are scoped to `user_id`; records of other users are never
/// returned or touched.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn list_prompts(&self, user_id: &str) -> AppResult<Vec<Prompt>>;
    async fn list_collections(&self, user_id: &str) -> AppResult<Vec<Collection>>;

    /// Store a new prompt, returning the record as the backend keeps it
    async fn create_prompt(&self, prompt: &Prompt) -> AppResult<Prompt>;
    async fn update_prompt(
        &self,
        user_id: &str,
        id: &str,
        updates: &PromptUpdate,
    ) -> AppResult<Prompt>;
    /// Deleting an unknown id succeeds
    async fn delete_prompt(&self, user_id: &str, id: &str) -> AppResult<()>;

    async fn create_collection(&self, collection: &Collection) -> AppResult<Collection>;
    async fn update_collection(
        &self,
        user_id: &str,
        id: &str,
        updates: &CollectionUpdate,
    ) -> AppResult<Collection>;
    async fn delete_collection(&self, user_id: &str, id: &str) -> AppResult<()>;
}

/// What happens to an optimistic local change when the gateway rejects it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// Leave the local change in place and report the error
    #[default]
    KeepLocal,
    /// Restore the record as it was before the mutation
    Rollback,
}

impl std::fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcilePolicy::KeepLocal => write!(f, "keep-local"),
            ReconcilePolicy::Rollback => write!(f, "rollback"),
        }
    }
}
