// ABOUTME: Shared test utilities for IronLog integration tests
// ABOUTME: Quiet logging, a fault-injecting backend wrapper, and sample workout payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `ironlog`
//!
//! This module provides common setup functions to reduce duplication
//! across integration tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use ironlog::config::SyncConfig;
use ironlog::errors::provider::{ProviderError, ProviderResult};
use ironlog::models::{
    CompletedWorkout, ExerciseId, LogWorkoutPayload, PerformanceEntry, PerformedSet,
};
use ironlog::offline::{ConnectivityMonitor, OfflineContext};
use ironlog::providers::{InMemoryBackend, RemoteBackend};
use ironlog::services::WorkoutRepository;
use ironlog::storage::{LocalStore, MemoryStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; default to WARN for quiet tests
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fixed reference time so backoff assertions are deterministic
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap()
}

/// In-memory backend with switchable failures
///
/// Every call made while offline fails with a network error.
/// `fail_inserts` makes the next N inserts into a table fail with a
/// retryable 503; `fail_rows_named` does the same for every insert of a
/// row with that `name`; `reject_inserts` answers a permanent 400 from then on.
#[derive(Default)]
pub struct FlakyBackend {
    pub inner: InMemoryBackend,
    offline: AtomicBool,
    transient_failures: Mutex<HashMap<String, usize>>,
    rejected_tables: Mutex<Vec<String>>,
    failing_names: Mutex<Vec<String>>,
    insert_calls: AtomicUsize,
    delay: Mutex<Option<std::time::Duration>>,
}

impl FlakyBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fail_inserts(&self, table: &str, count: usize) {
        self.transient_failures
            .lock()
            .unwrap()
            .insert(table.to_owned(), count);
    }

    pub fn fail_rows_named(&self, name: &str) {
        self.failing_names.lock().unwrap().push(name.to_owned());
    }

    pub fn reject_inserts(&self, table: &str) {
        self.rejected_tables.lock().unwrap().push(table.to_owned());
    }

    pub fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> ProviderResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ProviderError::Network {
                provider: "backend".to_owned(),
                message: "connection refused".to_owned(),
            });
        }
        Ok(())
    }

    fn injected_insert_failure(&self, table: &str, rows: &[Value]) -> Option<ProviderError> {
        let failing_names = self.failing_names.lock().unwrap();
        if rows.iter().any(|row| {
            row["name"]
                .as_str()
                .is_some_and(|name| failing_names.iter().any(|n| n == name))
        }) {
            return Some(ProviderError::from_status("backend", 503, "unavailable"));
        }
        drop(failing_names);
        if self.rejected_tables.lock().unwrap().iter().any(|t| t == table) {
            return Some(ProviderError::from_status("backend", 400, "row rejected"));
        }
        let mut failures = self.transient_failures.lock().unwrap();
        match failures.get_mut(table) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Some(ProviderError::from_status("backend", 503, "unavailable"))
            }
            _ => None,
        }
    }
}

#[async_trait]
impl RemoteBackend for FlakyBackend {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn insert_rows(&self, table: &str, rows: Vec<Value>) -> ProviderResult<Vec<Value>> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_online()?;
        if let Some(error) = self.injected_insert_failure(table, &rows) {
            return Err(error);
        }
        self.inner.insert_rows(table, rows).await
    }

    async fn update_row(&self, table: &str, id: &str, row: Value) -> ProviderResult<()> {
        self.check_online()?;
        self.inner.update_row(table, id, row).await
    }

    async fn select_by_id(&self, table: &str, id: &str) -> ProviderResult<Option<Value>> {
        self.check_online()?;
        self.inner.select_by_id(table, id).await
    }

    async fn select_all(&self, table: &str) -> ProviderResult<Vec<Value>> {
        self.check_online()?;
        self.inner.select_all(table).await
    }

    async fn delete_row(&self, table: &str, id: &str) -> ProviderResult<()> {
        self.check_online()?;
        self.inner.delete_row(table, id).await
    }
}

/// A one-exercise workout payload
pub fn sample_payload(name: &str) -> LogWorkoutPayload {
    let workout_id = uuid::Uuid::new_v4().to_string();
    let started_at = reference_time();
    let sets = vec![
        PerformedSet {
            weight: 100.0,
            reps: 5,
        },
        PerformedSet {
            weight: 100.0,
            reps: 5,
        },
    ];
    LogWorkoutPayload {
        workout: CompletedWorkout {
            id: workout_id.clone(),
            plan_id: None,
            name: name.to_owned(),
            started_at,
            ended_at: started_at + Duration::minutes(45),
            duration_secs: 2_700,
            total_volume: 1_000.0,
        },
        performances: vec![PerformanceEntry {
            id: uuid::Uuid::new_v4().to_string(),
            workout_id,
            exercise_id: ExerciseId::new(),
            exercise_name: "Back Squat".to_owned(),
            best_set: Some(sets[0]),
            sets,
            estimated_1rm: 117,
            total_volume: 1_000.0,
            is_pr: true,
            performed_at: started_at,
        }],
    }
}

/// Payload serialized the way the workout logger queues it
pub fn sample_payload_value(name: &str) -> Value {
    serde_json::to_value(sample_payload(name)).unwrap()
}

/// Sync settings with short delays for paused-clock tests
pub fn fast_sync_config() -> SyncConfig {
    SyncConfig {
        reconnect_delay: std::time::Duration::from_millis(1_000),
        startup_delay: std::time::Duration::from_millis(2_000),
        backoff_base: std::time::Duration::from_secs(2),
        backoff_max: std::time::Duration::from_secs(60),
        max_attempts: 3,
        probe_interval: std::time::Duration::from_secs(15),
    }
}

/// Offline context over `backend` and a fresh in-memory store
pub async fn offline_context(
    backend: Arc<dyn RemoteBackend>,
    online: bool,
) -> (Arc<OfflineContext>, Arc<dyn LocalStore>) {
    offline_context_with_store(backend, Arc::new(MemoryStore::new()), online).await
}

/// Offline context over `backend` and an existing store
pub async fn offline_context_with_store(
    backend: Arc<dyn RemoteBackend>,
    store: Arc<dyn LocalStore>,
    online: bool,
) -> (Arc<OfflineContext>, Arc<dyn LocalStore>) {
    init_test_logging();
    let context = OfflineContext::load(
        Arc::clone(&store),
        WorkoutRepository::new(backend),
        Arc::new(ConnectivityMonitor::new(online)),
        fast_sync_config(),
    )
    .await;
    (Arc::new(context), store)
}
