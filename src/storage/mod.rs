// ABOUTME: Local persisted key-value state (offline queue, dead letters, preferences, query cache)
// ABOUTME: LocalStore trait with SQLite and in-memory implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Local Storage
//!
//! The device keeps a handful of string values under well-known keys (see
//! [`ironlog_core::constants::storage`]). Values are JSON documents owned by
//! their feature; the store itself is a plain key-value map.

/// In-memory store
pub mod memory;
/// Small typed preferences
pub mod preferences;
/// Persisted backend read cache
pub mod query_cache;
/// SQLite-backed store
pub mod sqlite;

pub use memory::MemoryStore;
pub use preferences::Preferences;
pub use query_cache::QueryCache;
pub use sqlite::SqliteStore;

use crate::config::StoreUrl;
use async_trait::async_trait;
use ironlog_core::errors::AppResult;
use std::sync::Arc;

/// String key-value persistence
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Value stored under `key`
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete `key`; deleting a missing key is not an error
    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// Open the store described by `url`
///
/// # Errors
///
/// Returns a storage error if the SQLite database cannot be opened or migrated.
pub async fn open_store(url: &StoreUrl) -> AppResult<Arc<dyn LocalStore>> {
    match url {
        StoreUrl::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreUrl::Sqlite { .. } => Ok(Arc::new(SqliteStore::open(url).await?)),
    }
}
