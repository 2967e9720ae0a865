use crate::core::traits::SessionProvider;
use crate::utils::error::{AppError, AppResult};
use tracing::debug;

/// Single-user session held in memory
#[derive(Debug, Clone, Default)]
pub struct LocalSession {
    user_id: Option<String>,
}

impl LocalSession {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, user_id: &str) -> AppResult<()> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::validation("user_id", "must not be empty"));
        }
        debug!(user_id, "signed in");
        self.user_id = Some(user_id.to_string());
        Ok(())
    }

    /// Local sessions have no account registry, so signing up signs in
    pub fn sign_up(&mut self, user_id: &str) -> AppResult<()> {
        self.sign_in(user_id)
    }

    pub fn sign_out(&mut self) {
        if let Some(user_id) = self.user_id.take() {
            debug!(user_id = %user_id, "signed out");
        }
    }
}

impl SessionProvider for LocalSession {
    fn current_user(&self) -> Option<String> {
        self.user_id.clone()
    }
}
