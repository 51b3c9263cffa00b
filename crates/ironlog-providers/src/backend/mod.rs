// ABOUTME: Remote row-store abstraction used for workout logs, plans, programs and backups
// ABOUTME: Rows are JSON objects identified by their "id" field; tables are addressed by name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Remote Backend
//!
//! The managed backend exposes simple row CRUD over named collections.
//! [`RemoteBackend`] captures exactly that surface so the sync executor,
//! the importer and the exporter can run against the REST client in
//! production and an in-memory store in tests.

/// In-process backend
pub mod memory;
/// PostgREST-style HTTP backend
pub mod rest;

pub use memory::InMemoryBackend;
pub use rest::{RestBackend, RestBackendConfig};

use async_trait::async_trait;
use ironlog_core::errors::provider::ProviderResult;
use serde_json::Value;

/// Row-based CRUD over named tables
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Short service name for logs
    fn name(&self) -> &'static str;

    /// Insert rows and return them as stored (with server-assigned ids)
    async fn insert_rows(&self, table: &str, rows: Vec<Value>) -> ProviderResult<Vec<Value>>;

    /// Replace the row with the given id
    async fn update_row(&self, table: &str, id: &str, row: Value) -> ProviderResult<()>;

    /// Fetch a single row by id
    async fn select_by_id(&self, table: &str, id: &str) -> ProviderResult<Option<Value>>;

    /// Fetch every row of a table
    async fn select_all(&self, table: &str) -> ProviderResult<Vec<Value>>;

    /// Delete the row with the given id
    async fn delete_row(&self, table: &str, id: &str) -> ProviderResult<()>;
}

/// Extract a row id, accepting string or numeric ids
#[must_use]
pub fn row_id(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
