//! Local snapshot storage
//!
//! A small key-value store used to keep a copy of the vault between runs.
//! Snapshot failures are never fatal: the helpers log them and carry on.

use crate::core::data::{Collection, Prompt, VaultState};
use crate::utils::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PROMPTS_KEY: &str = "promptvault_prompts";
pub const COLLECTIONS_KEY: &str = "promptvault_collections";

pub trait SnapshotStore {
    fn save(&self, key: &str, value: &str) -> AppResult<()>;

    /// `Ok(None)` when nothing was stored under `key`
    fn load(&self, key: &str) -> AppResult<Option<String>>;

    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::validation("key", format!("'{}' is not a valid snapshot key", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn ensure_storage_exists(&self) -> AppResult<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|e| {
                AppError::Io(format!("Failed to create {}: {}", self.dir.display(), e))
            })?;
        }
        Ok(())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        self.ensure_storage_exists()?;

        // write then rename so a crash never leaves a half-written snapshot
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .map_err(|e| AppError::Io(format!("Failed to write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| AppError::Io(format!("Failed to replace {}: {}", path.display(), e)))?;
        Ok(())
    }

    fn load(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(format!("Failed to read {}: {}", path.display(), e))),
        }
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(format!("Failed to remove {}: {}", path.display(), e))),
        }
    }
}

/// In-memory snapshot store
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Serialize and save `value`. Returns whether the save succeeded.
pub fn save_snapshot<T: Serialize>(store: &dyn SnapshotStore, key: &str, value: &T) -> bool {
    let result = serde_json::to_string_pretty(value)
        .map_err(AppError::from)
        .and_then(|json| store.save(key, &json));
    match result {
        Ok(()) => {
            debug!(key, "saved snapshot");
            true
        }
        Err(e) => {
            warn!(key, error = %e, "failed to save snapshot");
            false
        }
    }
}

/// Load and deserialize `key`, falling back when missing or unreadable
pub fn load_snapshot<T: DeserializeOwned>(store: &dyn SnapshotStore, key: &str, fallback: T) -> T {
    match store.load(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to parse snapshot, using fallback");
                fallback
            }
        },
        Ok(None) => fallback,
        Err(e) => {
            warn!(key, error = %e, "failed to load snapshot, using fallback");
            fallback
        }
    }
}

pub fn remove_snapshot(store: &dyn SnapshotStore, key: &str) {
    if let Err(e) = store.remove(key) {
        warn!(key, error = %e, "failed to remove snapshot");
    }
}

/// Save both record lists of a vault
pub fn save_state(store: &dyn SnapshotStore, state: &VaultState) -> bool {
    let prompts = save_snapshot(store, PROMPTS_KEY, &state.prompts);
    let collections = save_snapshot(store, COLLECTIONS_KEY, &state.collections);
    prompts && collections
}

/// Load a saved vault, or `None` when no snapshot has been taken yet
pub fn load_state(store: &dyn SnapshotStore) -> Option<VaultState> {
    let has_snapshot = [PROMPTS_KEY, COLLECTIONS_KEY]
        .iter()
        .any(|key| matches!(store.load(key), Ok(Some(_))));
    if !has_snapshot {
        return None;
    }

    Some(VaultState {
        prompts: load_snapshot::<Vec<Prompt>>(store, PROMPTS_KEY, Vec::new()),
        collections: load_snapshot::<Vec<Collection>>(store, COLLECTIONS_KEY, Vec::new()),
    })
}

pub fn clear_state(store: &dyn SnapshotStore) {
    remove_snapshot(store, PROMPTS_KEY);
    remove_snapshot(store, COLLECTIONS_KEY);
}
