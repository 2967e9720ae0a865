use crate::core::operations::validate_color;
use crate::core::data::DEFAULT_COLLECTION_COLOR;
use crate::core::query::DEFAULT_RECENT_LIMIT;
use crate::sync::ReconcilePolicy;
use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "promptvault";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding the vault snapshots
    pub data_dir: PathBuf,
    /// Identity of the local user owning the vault
    pub user_id: String,
    pub color: bool,
    #[serde(default)]
    pub content_preview: bool,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_collection_color")]
    pub default_collection_color: String,
    /// Seed the demo prompts when no snapshot exists yet
    #[serde(default)]
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub reconcile: ReconcilePolicy,
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

fn default_collection_color() -> String {
    DEFAULT_COLLECTION_COLOR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Self {
            general: GeneralConfig {
                data_dir,
                user_id: default_user_id(),
                color: true,
                content_preview: true,
                recent_limit: DEFAULT_RECENT_LIMIT,
                default_collection_color: default_collection_color(),
                seed_demo_data: true,
            },
            sync: SyncConfig::default(),
        }
    }
}

/// Local account name, falling back to a fixed id
fn default_user_id() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "local-user".to_string())
}

impl Config {
    pub fn load() -> AppResult<Self> {
        Self::load_custom(&Self::config_file_path())
    }

    pub fn ensure_config_exists() -> AppResult<()> {
        let config_path = Self::config_file_path();
        if !config_path.exists() {
            Config::default().save()?;
        }
        Ok(())
    }

    /// Load from `config_path`, writing the defaults there first if missing
    pub fn load_custom(config_path: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save_to(config_path)?;
            return Ok(default_config);
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| AppError::Io(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.general.user_id.trim().is_empty() {
            return Err(AppError::Config("User id cannot be empty".to_string()));
        }

        if self.general.recent_limit == 0 {
            return Err(AppError::Config(
                "Recent limit must be at least 1".to_string(),
            ));
        }

        if validate_color(&self.general.default_collection_color).is_err() {
            return Err(AppError::Config(format!(
                "Default collection color '{}' is not a #RRGGBB hex colour",
                self.general.default_collection_color
            )));
        }

        Ok(())
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_file_path())
    }

    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Io(e.to_string()))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content).map_err(|e| AppError::Io(e.to_string()))?;

        Ok(())
    }

    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }
}
