//! Core business logic layer
//!
//! This module contains the records, the entity store, the mutation API
//! and the query engine that form the heart of the vault.

pub mod data;
pub mod demo;
pub mod operations;
pub mod query;
pub mod session;
pub mod store;
pub mod traits;
