//! PromptVault - a personal library of AI prompts
//!
//! Prompts are grouped into collections, tagged, starred and marked as
//! reusable templates. The library holds the in-memory store, the query
//! engine, and the gateway layer that mirrors changes to a backend.

pub mod cli;
pub mod manager;
pub mod config;
pub mod core;
pub mod storage;
pub mod sync;
pub mod utils;

// Re-export core types and traits for easier use
pub use self::core::{
    data::{Collection, NewCollection, NewPrompt, Prompt, PromptUpdate, SearchFilters, VaultState},
    operations::Vault,
    query::PromptQuery,
    session::LocalSession,
    traits::SessionProvider,
};
pub use self::sync::{MemoryGateway, PersistenceGateway, ReconcilePolicy, SyncedVault};
pub use self::utils::error::{AppError, AppResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
