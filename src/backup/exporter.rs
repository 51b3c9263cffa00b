// ABOUTME: Full-account backup export from the remote backend
// ABOUTME: Reads every collection into a versioned BackupFile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::{DateTime, Utc};
use ironlog_core::errors::AppResult;
use ironlog_core::models::{BackupCollection, BackupFile};
use ironlog_providers::RemoteBackend;
use std::sync::Arc;
use tracing::info;

/// Reads every backed-up collection
#[derive(Clone)]
pub struct Exporter {
    backend: Arc<dyn RemoteBackend>,
}

impl Exporter {
    /// Exporter reading from `backend`
    #[must_use]
    pub fn new(backend: Arc<dyn RemoteBackend>) -> Self {
        Self { backend }
    }

    /// Snapshot every collection
    ///
    /// # Errors
    ///
    /// Returns the first backend read failure; a partial backup is never produced.
    pub async fn export(&self, exported_at: DateTime<Utc>) -> AppResult<BackupFile> {
        let mut backup = BackupFile::empty(exported_at);
        for collection in BackupCollection::IMPORT_ORDER {
            let rows = self.backend.select_all(collection.table()).await?;
            *backup.rows_mut(collection) = rows;
        }
        info!(rows = backup.total_rows(), "Backup exported");
        Ok(backup)
    }

    /// Snapshot every collection as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns a backend or serialization failure.
    pub async fn export_json(&self, exported_at: DateTime<Utc>) -> AppResult<String> {
        let backup = self.export(exported_at).await?;
        Ok(serde_json::to_string_pretty(&backup)?)
    }
}
