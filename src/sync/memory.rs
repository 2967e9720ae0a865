use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::data::{Collection, CollectionUpdate, Prompt, PromptUpdate, VaultState};
use crate::sync::PersistenceGateway;
use crate::utils::error::{AppError, AppResult};

/// In-process gateway, shared between clones
#[derive(Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<Mutex<MemoryGatewayInner>>,
}

#[derive(Default)]
struct MemoryGatewayInner {
    prompts: Vec<Prompt>,
    collections: Vec<Collection>,
    failures: Vec<String>,
    calls: usize,
}

impl MemoryGatewayInner {
    /// Count the call and fail it if a failure was queued
    fn begin(&mut self) -> AppResult<()> {
        self.calls += 1;
        if self.failures.is_empty() {
            return Ok(());
        }
        let message = self.failures.remove(0);
        Err(AppError::Gateway(message))
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: VaultState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryGatewayInner {
                prompts: state.prompts,
                collections: state.collections,
                ..Default::default()
            })),
        }
    }

    /// Make the next call fail with `message`. Calls queue up in order.
    pub async fn fail_next(&self, message: impl Into<String>) {
        self.inner.lock().await.failures.push(message.into());
    }

    /// Number of calls received, failed ones included
    pub async fn calls(&self) -> usize {
        self.inner.lock().await.calls
    }

    pub async fn snapshot(&self) -> VaultState {
        let inner = self.inner.lock().await;
        VaultState {
            prompts: inner.prompts.clone(),
            collections: inner.collections.clone(),
        }
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn list_prompts(&self, user_id: &str) -> AppResult<Vec<Prompt>> {
        let mut inner = self.inner.lock().await;
        inner.begin()?;
        Ok(inner
            .prompts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_collections(&self, user_id: &str) -> AppResult<Vec<Collection>> {
        let mut inner = self.inner.lock().await;
        inner.begin()?;
        Ok(inner
            .collections
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_prompt(&self, prompt: &Prompt) -> AppResult<Prompt> {
        let mut inner = self.inner.lock().await;
        inner.begin()?;
        if inner.prompts.iter().any(|p| p.id == prompt.id) {
            return Err(AppError::Gateway(format!("prompt {} already exists", prompt.id)));
        }
        inner.prompts.insert(0, prompt.clone());
        debug!(id = %prompt.id, "gateway stored prompt");
        Ok(prompt.clone())
    }

    async fn update_prompt(
        &self,
        user_id: &str,
        id: &str,
        updates: &PromptUpdate,
    ) -> AppResult<Prompt> {
        let mut inner = self.inner.lock().await;
        inner.begin()?;
        let prompt = inner
            .prompts
            .iter_mut()
            .find(|p| p.id == id && p.user_id == user_id)
            .ok_or_else(|| AppError::not_found("Prompt", id))?;
        updates.apply_to(prompt);
        prompt.updated_at = Utc::now().max(prompt.updated_at);
        Ok(prompt.clone())
    }

    async fn delete_prompt(&self, user_id: &str, id: &str) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        inner.begin()?;
        inner.prompts.retain(|p| !(p.id == id && p.user_id == user_id));
        Ok(())
    }

    async fn create_collection(&self, collection: &Collection) -> AppResult<Collection> {
        let mut inner = self.inner.lock().await;
        inner.begin()?;
        if inner.collections.iter().any(|c| c.id == collection.id) {
            return Err(AppError::Gateway(format!(
                "collection {} already exists",
                collection.id
            )));
        }
        inner.collections.insert(0, collection.clone());
        debug!(id = %collection.id, "gateway stored collection");
        Ok(collection.clone())
    }

    async fn update_collection(
        &self,
        user_id: &str,
        id: &str,
        updates: &CollectionUpdate,
    ) -> AppResult<Collection> {
        let mut inner = self.inner.lock().await;
        inner.begin()?;
        let collection = inner
            .collections
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
            .ok_or_else(|| AppError::not_found("Collection", id))?;
        updates.apply_to(collection);
        collection.updated_at = Utc::now().max(collection.updated_at);
        Ok(collection.clone())
    }

    async fn delete_collection(&self, user_id: &str, id: &str) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        inner.begin()?;
        inner
            .collections
            .retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(())
    }
}
