// ABOUTME: Persisted snapshot of backend read results so screens render offline
// ABOUTME: Snapshots older than the configured maximum age are discarded on restore
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::LocalStore;
use chrono::{DateTime, Utc};
use ironlog_core::constants::storage;
use ironlog_core::errors::AppResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    saved_at: DateTime<Utc>,
    entries: BTreeMap<String, Value>,
}

/// Backend read cache with a persisted snapshot
pub struct QueryCache {
    store: Arc<dyn LocalStore>,
    max_age: Duration,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl QueryCache {
    /// Empty cache persisted in `store`
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>, max_age: Duration) -> Self {
        Self {
            store,
            max_age,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load the persisted snapshot, returning the number of restored entries
    ///
    /// A snapshot older than the maximum age, or one that cannot be parsed,
    /// is deleted and nothing is restored.
    pub async fn restore(&self, now: DateTime<Utc>) -> usize {
        let raw = match self.store.get(storage::QUERY_CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return 0,
            Err(e) => {
                warn!(error = %e, "Failed to read query cache snapshot");
                return 0;
            }
        };

        let snapshot = match serde_json::from_str::<Snapshot>(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Discarding unparsable query cache snapshot");
                self.discard().await;
                return 0;
            }
        };

        let age = now.signed_duration_since(snapshot.saved_at);
        let expired = age.to_std().is_ok_and(|age| age > self.max_age);
        if expired {
            info!(age_secs = age.num_seconds(), "Query cache snapshot expired");
            self.discard().await;
            return 0;
        }

        let restored = snapshot.entries.len();
        *self.entries.write().await = snapshot.entries;
        debug!(restored, "Query cache restored");
        restored
    }

    async fn discard(&self) {
        if let Err(e) = self.store.remove(storage::QUERY_CACHE_KEY).await {
            warn!(error = %e, "Failed to delete query cache snapshot");
        }
    }

    /// Cached value for a query key
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    /// Cache a query result in memory; call [`QueryCache::persist`] to save it
    pub async fn put(&self, key: impl Into<String>, value: Value) {
        self.entries.write().await.insert(key.into(), value);
    }

    /// Number of cached queries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is cached
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Write the snapshot
    ///
    /// # Errors
    ///
    /// Returns a serialization or storage error.
    pub async fn persist(&self, now: DateTime<Utc>) -> AppResult<()> {
        let snapshot = Snapshot {
            saved_at: now,
            entries: self.entries.read().await.clone(),
        };
        let raw = serde_json::to_string(&snapshot)?;
        self.store.set(storage::QUERY_CACHE_KEY, &raw).await
    }

    /// Drop every entry and the persisted snapshot (sign-out)
    ///
    /// # Errors
    ///
    /// Returns a storage error if the snapshot cannot be deleted.
    pub async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        self.store.remove(storage::QUERY_CACHE_KEY).await
    }
}
