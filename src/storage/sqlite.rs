// ABOUTME: SQLite-backed LocalStore using a single kv_store table
// ABOUTME: Creates the database file and parent directory on first open
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::LocalStore;
use crate::config::StoreUrl;
use async_trait::async_trait;
use chrono::Utc;
use ironlog_core::errors::{AppError, AppResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

/// Key-value store persisted in SQLite
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (and create if needed) the store at `url`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created, the
    /// database cannot be opened, or the schema cannot be created.
    pub async fn open(url: &StoreUrl) -> AppResult<Self> {
        let connection = match url {
            StoreUrl::Memory => url.to_connection_string(),
            StoreUrl::Sqlite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::storage(format!(
                            "Failed to create store directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
                format!("{}?mode=rwc", url.to_connection_string())
            }
        };

        // an in-memory database exists per connection, so keep exactly one
        let pool = SqlitePoolOptions::new()
            .max_connections(if url.is_memory() { 1 } else { 4 })
            .connect(&connection)
            .await
            .map_err(|e| AppError::storage(format!("Failed to open local store: {e}")))?;

        let store = Self { pool };
        store.migrate().await?;
        info!(store = %url, "Local store opened");
        Ok(store)
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to create kv_store table: {e}")))?;
        Ok(())
    }

    /// Underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LocalStore for SqliteStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let row = sqlx::query(r"SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to read {key}: {e}")))?;
        row.map(|r| r.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| AppError::storage(format!("Failed to decode {key}: {e}")))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value, updated_at) VALUES ($1, $2, $3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to write {key}: {e}")))?;
        debug!(key, bytes = value.len(), "Local value written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        sqlx::query(r"DELETE FROM kv_store WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to delete {key}: {e}")))?;
        Ok(())
    }
}
