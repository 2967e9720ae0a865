use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::data::{Collection, CollectionUpdate, Prompt, PromptUpdate, VaultState};
use crate::storage::{COLLECTIONS_KEY, FileSnapshotStore, PROMPTS_KEY, SnapshotStore};
use crate::sync::PersistenceGateway;
use crate::utils::error::{AppError, AppResult};

/// Gateway persisting every user's records in local snapshot files.
///
/// Each call reads the file for the record kind it touches, applies its
/// change and writes that file back. Unreadable or unparsable files are
/// errors and are never overwritten.
pub struct SnapshotGateway {
    store: FileSnapshotStore,
    lock: Mutex<()>,
}

impl SnapshotGateway {
    pub fn new(store: FileSnapshotStore) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &FileSnapshotStore {
        &self.store
    }

    /// Write `state` if nothing has been stored yet. Returns whether it did.
    pub async fn seed_if_empty(&self, state: VaultState) -> AppResult<bool> {
        let _guard = self.lock.lock().await;
        for key in [PROMPTS_KEY, COLLECTIONS_KEY] {
            if self.store.load(key).map_err(gateway_error)?.is_some() {
                return Ok(false);
            }
        }
        info!(
            dir = %self.store.dir().display(),
            prompts = state.prompts.len(),
            "seeding snapshot with demo data"
        );
        self.write(PROMPTS_KEY, &state.prompts)?;
        self.write(COLLECTIONS_KEY, &state.collections)?;
        Ok(true)
    }

    /// Records stored under `key`; a missing file is an empty list
    fn read<E: DeserializeOwned>(&self, key: &str) -> AppResult<Vec<E>> {
        match self.store.load(key).map_err(gateway_error)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                AppError::Serialization(format!("snapshot '{}' is unreadable: {}", key, e))
            }),
            None => Ok(Vec::new()),
        }
    }

    fn write<E: Serialize>(&self, key: &str, records: &[E]) -> AppResult<()> {
        let json = serde_json::to_string_pretty(records)?;
        self.store.save(key, &json).map_err(gateway_error)
    }

    /// Run `change` against the records under `key` and persist the result
    async fn modify<E, T>(
        &self,
        key: &str,
        change: impl FnOnce(&mut Vec<E>) -> AppResult<T>,
    ) -> AppResult<T>
    where
        E: Serialize + DeserializeOwned,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.read(key)?;
        let result = change(&mut records)?;
        self.write(key, &records)?;
        Ok(result)
    }
}

fn gateway_error(err: AppError) -> AppError {
    AppError::Gateway(err.to_string())
}

#[async_trait]
impl PersistenceGateway for SnapshotGateway {
    async fn list_prompts(&self, user_id: &str) -> AppResult<Vec<Prompt>> {
        let _guard = self.lock.lock().await;
        let mut prompts: Vec<Prompt> = self.read(PROMPTS_KEY)?;
        prompts.retain(|p| p.user_id == user_id);
        Ok(prompts)
    }

    async fn list_collections(&self, user_id: &str) -> AppResult<Vec<Collection>> {
        let _guard = self.lock.lock().await;
        let mut collections: Vec<Collection> = self.read(COLLECTIONS_KEY)?;
        collections.retain(|c| c.user_id == user_id);
        Ok(collections)
    }

    async fn create_prompt(&self, prompt: &Prompt) -> AppResult<Prompt> {
        let stored = self
            .modify(PROMPTS_KEY, |prompts: &mut Vec<Prompt>| {
                if prompts.iter().any(|p| p.id == prompt.id) {
                    return Err(AppError::Gateway(format!("prompt {} already exists", prompt.id)));
                }
                prompts.insert(0, prompt.clone());
                Ok(prompt.clone())
            })
            .await?;
        debug!(id = %stored.id, "wrote prompt to snapshot");
        Ok(stored)
    }

    async fn update_prompt(
        &self,
        user_id: &str,
        id: &str,
        updates: &PromptUpdate,
    ) -> AppResult<Prompt> {
        self.modify(PROMPTS_KEY, |prompts: &mut Vec<Prompt>| {
            let prompt = prompts
                .iter_mut()
                .find(|p| p.id == id && p.user_id == user_id)
                .ok_or_else(|| AppError::not_found("Prompt", id))?;
            updates.apply_to(prompt);
            prompt.updated_at = Utc::now().max(prompt.updated_at);
            Ok(prompt.clone())
        })
        .await
    }

    async fn delete_prompt(&self, user_id: &str, id: &str) -> AppResult<()> {
        self.modify(PROMPTS_KEY, |prompts: &mut Vec<Prompt>| {
            prompts.retain(|p| !(p.id == id && p.user_id == user_id));
            Ok(())
        })
        .await
    }

    async fn create_collection(&self, collection: &Collection) -> AppResult<Collection> {
        self.modify(COLLECTIONS_KEY, |collections: &mut Vec<Collection>| {
            if collections.iter().any(|c| c.id == collection.id) {
                return Err(AppError::Gateway(format!(
                    "collection {} already exists",
                    collection.id
                )));
            }
            collections.insert(0, collection.clone());
            Ok(collection.clone())
        })
        .await
    }

    async fn update_collection(
        &self,
        user_id: &str,
        id: &str,
        updates: &CollectionUpdate,
    ) -> AppResult<Collection> {
        self.modify(COLLECTIONS_KEY, |collections: &mut Vec<Collection>| {
            let collection = collections
                .iter_mut()
                .find(|c| c.id == id && c.user_id == user_id)
                .ok_or_else(|| AppError::not_found("Collection", id))?;
            updates.apply_to(collection);
            collection.updated_at = Utc::now().max(collection.updated_at);
            Ok(collection.clone())
        })
        .await
    }

    async fn delete_collection(&self, user_id: &str, id: &str) -> AppResult<()> {
        self.modify(COLLECTIONS_KEY, |collections: &mut Vec<Collection>| {
            collections.retain(|c| !(c.id == id && c.user_id == user_id));
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::NewPrompt;
    use crate::core::demo::demo_state;
    use crate::core::operations::Vault;
    use crate::storage::load_state;
    use crate::sync::SyncedVault;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_seed_only_once() {
        let dir = tempdir().unwrap();
        let gateway = SnapshotGateway::new(FileSnapshotStore::new(dir.path()));

        assert!(gateway.seed_if_empty(demo_state("alice")).await.unwrap());
        assert!(!gateway.seed_if_empty(VaultState::default()).await.unwrap());
        assert_eq!(gateway.list_prompts("alice").await.unwrap().len(), 6);
        assert!(gateway.list_prompts("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_changes_survive_reopen() {
        let dir = tempdir().unwrap();
        let created = {
            let gateway = SnapshotGateway::new(FileSnapshotStore::new(dir.path()));
            let mut synced = SyncedVault::new(Vault::for_user("alice", VaultState::default()), gateway);
            synced
                .create_prompt(NewPrompt::new("Standup", "daily standup"))
                .await
                .unwrap()
        };

        let gateway = SnapshotGateway::new(FileSnapshotStore::new(dir.path()));
        let mut synced = SyncedVault::new(Vault::for_user("alice", VaultState::default()), gateway);
        synced.refresh().await.unwrap();
        assert_eq!(synced.query().find_prompt(&created.id), Some(&created));
    }

    #[tokio::test]
    async fn test_update_missing_prompt_leaves_files_alone() {
        let dir = tempdir().unwrap();
        let gateway = SnapshotGateway::new(FileSnapshotStore::new(dir.path()));
        gateway.seed_if_empty(demo_state("alice")).await.unwrap();

        let err = gateway
            .update_prompt("alice", "missing", &PromptUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(load_state(gateway.store()), Some(demo_state("alice")));
    }

    #[tokio::test]
    async fn test_corrupt_prompts_file_is_an_error_and_kept() {
        let dir = tempdir().unwrap();
        let gateway = SnapshotGateway::new(FileSnapshotStore::new(dir.path()));
        gateway.seed_if_empty(demo_state("alice")).await.unwrap();

        let path = dir.path().join("promptvault_prompts.json");
        let full = std::fs::read_to_string(&path).unwrap();
        let truncated = &full[..full.len() - 2];
        std::fs::write(&path, truncated).unwrap();

        assert!(matches!(
            gateway.list_prompts("alice").await,
            Err(AppError::Serialization(_))
        ));

        let now = Utc::now();
        let prompt = Prompt {
            id: "new".to_string(),
            user_id: "alice".to_string(),
            collection_id: None,
            title: "Standup".to_string(),
            content: "daily standup".to_string(),
            output: String::new(),
            tags: Vec::new(),
            is_favorite: false,
            is_template: false,
            created_at: now,
            updated_at: now,
        };
        assert!(gateway.create_prompt(&prompt).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), truncated);

        // a corrupt file also stops the demo seed from replacing it
        assert!(!gateway.seed_if_empty(demo_state("alice")).await.unwrap());

        let mut synced = SyncedVault::new(Vault::for_user("alice", VaultState::default()), gateway);
        assert!(synced.refresh().await.is_err());
    }

    #[tokio::test]
    async fn test_prompt_change_leaves_collections_file_alone() {
        let dir = tempdir().unwrap();
        let gateway = SnapshotGateway::new(FileSnapshotStore::new(dir.path()));
        gateway.seed_if_empty(demo_state("alice")).await.unwrap();

        let collections = dir.path().join("promptvault_collections.json");
        std::fs::remove_file(&collections).unwrap();

        let updates = PromptUpdate {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        gateway.update_prompt("alice", "prompt-1", &updates).await.unwrap();
        gateway.delete_prompt("alice", "prompt-2").await.unwrap();
        assert!(!collections.exists());

        let prompts = gateway.list_prompts("alice").await.unwrap();
        assert_eq!(prompts.len(), 5);
        assert_eq!(prompts[0].title, "Renamed");
    }
}
