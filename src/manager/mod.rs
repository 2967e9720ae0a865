// Command handlers driving the vault from the CLI
pub mod collection; // Collection management
pub mod config;     // Configuration management
pub mod crud;       // Prompt create, show, edit, delete
pub mod query;      // Listing, search, tags and rendering

use tracing::debug;

use crate::config::Config;
use crate::core::data::{Collection, Prompt, VaultState};
use crate::core::demo::demo_state;
use crate::core::operations::Vault;
use crate::core::query::PromptQuery;
use crate::storage::FileSnapshotStore;
use crate::sync::{SnapshotGateway, SyncedVault};
use crate::utils::error::{AppError, AppResult};

pub type CliVault = SyncedVault<SnapshotGateway>;

/// Open the configured user's vault, backed by the snapshot directory
pub async fn open_vault(config: &Config) -> AppResult<CliVault> {
    let user_id = config.general.user_id.clone();
    let gateway = SnapshotGateway::new(FileSnapshotStore::new(config.general.data_dir.clone()));

    if config.general.seed_demo_data {
        gateway.seed_if_empty(demo_state(&user_id)).await?;
    }

    let vault = Vault::for_user(user_id, VaultState::default())
        .with_default_color(config.general.default_collection_color.clone())?;
    let mut synced = SyncedVault::new(vault, gateway).with_policy(config.sync.reconcile);
    synced.refresh().await?;

    debug!(
        dir = %config.general.data_dir.display(),
        prompts = synced.query().prompts().len(),
        "opened vault"
    );
    Ok(synced)
}

/// Find a prompt by id, short id, exact title or partial title
pub fn find_prompt<'a>(query: &PromptQuery<'a>, identifier: &str) -> Option<&'a Prompt> {
    resolve(query.prompts(), identifier, |p| p.id.as_str(), |p| p.title.as_str())
}

/// Find a collection by id, short id, exact name or partial name
pub fn find_collection<'a>(query: &PromptQuery<'a>, identifier: &str) -> Option<&'a Collection> {
    resolve(query.collections(), identifier, |c| c.id.as_str(), |c| c.name.as_str())
}

/// Resolve a collection argument to its id, failing when nothing matches
pub fn require_collection_id(query: &PromptQuery<'_>, identifier: &str) -> AppResult<String> {
    find_collection(query, identifier)
        .map(|c| c.id.clone())
        .ok_or_else(|| AppError::not_found("Collection", identifier))
}

fn resolve<'a, T>(
    items: &'a [T],
    identifier: &str,
    id: impl Fn(&T) -> &str,
    label: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return None;
    }
    let lowered = identifier.to_lowercase();

    items
        .iter()
        .find(|&item| id(item) == identifier)
        .or_else(|| {
            let mut by_prefix = items.iter().filter(|&item| id(item).starts_with(identifier));
            // a short id must be unambiguous
            match (identifier.len() >= 4, by_prefix.next(), by_prefix.next()) {
                (true, Some(item), None) => Some(item),
                _ => None,
            }
        })
        .or_else(|| items.iter().find(|&item| label(item).to_lowercase() == lowered))
        .or_else(|| items.iter().find(|&item| label(item).to_lowercase().contains(&lowered)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn demo_query_state() -> VaultState {
        demo_state("me")
    }

    #[test]
    fn test_find_prompt_by_id_and_title() {
        let state = demo_query_state();
        let query = PromptQuery::new(&state.prompts, &state.collections);

        assert_eq!(find_prompt(&query, "prompt-2").map(|p| p.id.as_str()), Some("prompt-2"));
        let by_title = find_prompt(&query, "character development worksheet").unwrap();
        assert_eq!(by_title.id, "prompt-2");
        let partial = find_prompt(&query, "meeting summary").unwrap();
        assert_eq!(partial.id, "prompt-6");
        assert!(find_prompt(&query, "no such prompt").is_none());
        assert!(find_prompt(&query, "  ").is_none());
    }

    #[test]
    fn test_short_id_must_be_unique() {
        let state = demo_query_state();
        let query = PromptQuery::new(&state.prompts, &state.collections);

        // every demo id starts with "prompt-"
        assert!(resolve(query.prompts(), "prom", |p| p.id.as_str(), |_| "").is_none());
        assert_eq!(
            resolve(query.prompts(), "prompt-4", |p| p.id.as_str(), |_| "").map(|p| p.id.as_str()),
            Some("prompt-4")
        );
    }

    #[test]
    fn test_require_collection_id() {
        let state = demo_query_state();
        let query = PromptQuery::new(&state.prompts, &state.collections);

        assert_eq!(require_collection_id(&query, "col-2").unwrap(), "col-2");
        assert!(matches!(
            require_collection_id(&query, "missing"),
            Err(AppError::NotFound { entity: "Collection", .. })
        ));
    }

    #[tokio::test]
    async fn test_open_vault_seeds_demo_data_once() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.general.data_dir = dir.path().to_path_buf();
        config.general.user_id = "me".to_string();

        let vault = open_vault(&config).await.unwrap();
        assert_eq!(vault.query().prompts().len(), 6);

        let mut vault = open_vault(&config).await.unwrap();
        vault.delete_prompt("prompt-1").await.unwrap();
        let vault = open_vault(&config).await.unwrap();
        assert_eq!(vault.query().prompts().len(), 5);
    }

    #[tokio::test]
    async fn test_open_vault_without_seed_is_empty() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.general.data_dir = dir.path().join("vault");
        config.general.seed_demo_data = false;

        let vault = open_vault(&config).await.unwrap();
        assert!(vault.query().prompts().is_empty());
        assert!(vault.query().collections().is_empty());
    }
}
