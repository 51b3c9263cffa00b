// ABOUTME: In-memory RemoteBackend used when no backend URL is configured and in tests
// ABOUTME: Keeps insertion order per table and rejects duplicate ids like a primary key would
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::{row_id, RemoteBackend};
use async_trait::async_trait;
use ironlog_core::constants::service_names;
use ironlog_core::errors::provider::{ProviderError, ProviderResult};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Backend holding every table in process memory
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryBackend {
    /// Empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of a table in insertion order
    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of rows in a table
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }
}

fn conflict(table: &str, id: &str) -> ProviderError {
    ProviderError::ApiError {
        provider: service_names::BACKEND.to_owned(),
        status_code: 409,
        message: format!("duplicate key {id} in {table}"),
        retryable: false,
    }
}

#[async_trait]
impl RemoteBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_rows(&self, table: &str, rows: Vec<Value>) -> ProviderResult<Vec<Value>> {
        let mut tables = self.tables.write().await;
        let stored = tables.entry(table.to_owned()).or_default();

        let mut prepared = Vec::with_capacity(rows.len());
        for mut row in rows {
            let id = if let Some(id) = row_id(&row) {
                id
            } else {
                let Some(fields) = row.as_object_mut() else {
                    return Err(ProviderError::from_status(
                        service_names::BACKEND,
                        400,
                        "row must be a JSON object",
                    ));
                };
                let id = Uuid::new_v4().to_string();
                fields.insert("id".to_owned(), Value::String(id.clone()));
                id
            };
            let duplicate = stored
                .iter()
                .chain(prepared.iter())
                .any(|existing| row_id(existing).as_deref() == Some(id.as_str()));
            if duplicate {
                return Err(conflict(table, &id));
            }
            prepared.push(row);
        }

        stored.extend(prepared.iter().cloned());
        Ok(prepared)
    }

    async fn update_row(&self, table: &str, id: &str, row: Value) -> ProviderResult<()> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r).as_deref() == Some(id)))
            .ok_or_else(|| ProviderError::NotFound {
                provider: service_names::BACKEND.to_owned(),
                resource: format!("{table}/{id}"),
            })?;
        let mut row = row;
        if let Value::Object(fields) = &mut row {
            fields.insert("id".to_owned(), Value::String(id.to_owned()));
        }
        *existing = row;
        Ok(())
    }

    async fn select_by_id(&self, table: &str, id: &str) -> ProviderResult<Option<Value>> {
        Ok(self.tables.read().await.get(table).and_then(|rows| {
            rows.iter()
                .find(|r| row_id(r).as_deref() == Some(id))
                .cloned()
        }))
    }

    async fn select_all(&self, table: &str) -> ProviderResult<Vec<Value>> {
        Ok(self.rows(table).await)
    }

    async fn delete_row(&self, table: &str, id: &str) -> ProviderResult<()> {
        if let Some(rows) = self.tables.write().await.get_mut(table) {
            rows.retain(|r| row_id(r).as_deref() != Some(id));
        }
        Ok(())
    }
}
