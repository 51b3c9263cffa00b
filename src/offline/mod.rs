// ABOUTME: Offline-first write path: action queue, sync executor and connectivity monitor
// ABOUTME: OfflineContext is the explicit application-state object owning all three
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Offline Context
//!
//! Writes are always queued first and then synced, whatever the
//! connectivity at call time. A background trigger task runs a pass
//! shortly after startup when work is pending, and again after every
//! offline to online transition. While online it also sleeps until the
//! earliest backoff deadline in the queue and retries then, so a write
//! that failed just before a reconnect is not left waiting for the next
//! transition.

/// Connectivity monitor and probes
pub mod connectivity;
/// Persistent action queue
pub mod queue;
/// Sync executor and retry policy
pub mod sync;

pub use connectivity::{spawn_probe, ConnectivityMonitor, ConnectivityProbe, HttpProbe};
pub use queue::{ActionQueue, Settlement};
pub use sync::{RetryPolicy, SyncExecutor, SyncOutcome, SyncReport};

use crate::config::SyncConfig;
use crate::services::WorkoutRepository;
use crate::storage::LocalStore;
use chrono::{DateTime, Utc};
use ironlog_core::constants::sync::RETRY_WAKE_FLOOR_MS;
use ironlog_core::errors::AppResult;
use ironlog_core::models::{QueuedAction, QueuedActionKind};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Snapshot shown by the pending-sync badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OfflineStatus {
    /// Backend considered reachable
    pub is_online: bool,
    /// A sync pass is running
    pub is_syncing: bool,
    /// Actions waiting to be written
    pub pending: usize,
    /// Actions that exhausted their retries
    pub dead_lettered: usize,
}

/// Owns the offline queue and everything that drains it
pub struct OfflineContext {
    queue: Arc<ActionQueue>,
    executor: Arc<SyncExecutor>,
    monitor: Arc<ConnectivityMonitor>,
    config: SyncConfig,
}

impl OfflineContext {
    /// Load the persisted queue and wire the executor to `repository`
    pub async fn load(
        store: Arc<dyn LocalStore>,
        repository: WorkoutRepository,
        monitor: Arc<ConnectivityMonitor>,
        config: SyncConfig,
    ) -> Self {
        let queue = Arc::new(ActionQueue::load(store).await);
        let executor = Arc::new(SyncExecutor::new(
            Arc::clone(&queue),
            repository,
            RetryPolicy::from_config(&config),
        ));
        Self {
            queue,
            executor,
            monitor,
            config,
        }
    }

    /// Current status
    pub async fn status(&self) -> OfflineStatus {
        OfflineStatus {
            is_online: self.monitor.is_online(),
            is_syncing: self.executor.is_syncing(),
            pending: self.queue.len().await,
            dead_lettered: self.queue.dead_letter_count().await,
        }
    }

    /// Connectivity monitor shared with probes
    #[must_use]
    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        &self.monitor
    }

    /// Underlying queue
    #[must_use]
    pub fn queue(&self) -> &Arc<ActionQueue> {
        &self.queue
    }

    /// Enqueue an action, then run a sync pass if online
    pub async fn queue_action(&self, kind: QueuedActionKind, payload: Value) -> QueuedAction {
        let action = self.queue.enqueue(kind, payload, Utc::now()).await;
        if self.monitor.is_online() {
            self.executor.sync().await;
        } else {
            debug!(action.id = %action.id, "Offline, action left in queue");
        }
        action
    }

    /// Run a normal sync pass now
    pub async fn sync_now(&self) -> SyncOutcome {
        self.executor.sync().await
    }

    /// Run a pass that ignores backoff
    pub async fn force_sync(&self) -> SyncOutcome {
        self.executor.force_sync().await
    }

    /// Actions that exhausted their retries
    pub async fn dead_letters(&self) -> Vec<QueuedAction> {
        self.queue.dead_letters().await
    }

    /// Requeue a dead letter at the tail of the queue
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown id.
    pub async fn retry_dead_letter(&self, id: &str) -> AppResult<QueuedAction> {
        self.queue.retry_dead_letter(id).await
    }

    /// Drop a dead letter
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown id.
    pub async fn discard_dead_letter(&self, id: &str) -> AppResult<QueuedAction> {
        self.queue.discard_dead_letter(id).await
    }

    /// Spawn the sync trigger task
    ///
    /// The task runs until its handle is aborted.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let context = Arc::clone(self);
        let mut changes = self.monitor.subscribe();
        let mut was_online = *changes.borrow_and_update();
        tokio::spawn(async move {
            if was_online && !context.queue.is_empty().await {
                info!(
                    delay_ms = context.config.startup_delay.as_millis(),
                    "Pending actions at startup, scheduling sync"
                );
                tokio::time::sleep(context.config.startup_delay).await;
                if context.monitor.is_online() {
                    context.executor.sync().await;
                }
            }

            loop {
                let next_retry = if was_online {
                    context.queue.next_retry_at().await
                } else {
                    None
                };
                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let online = *changes.borrow_and_update();
                        if online && !was_online {
                            tokio::time::sleep(context.config.reconnect_delay).await;
                            was_online = *changes.borrow_and_update();
                            if was_online {
                                context.executor.sync().await;
                            }
                        } else {
                            was_online = online;
                        }
                    }
                    () = context.queue.changed() => {}
                    () = sleep_until_due(next_retry) => {
                        if let Some(due) = next_retry {
                            debug!(%due, "Backoff elapsed, retrying deferred actions");
                            context.executor.run_pass(Utc::now().max(due), false).await;
                        }
                    }
                }
            }
        })
    }
}

/// Sleep until `due`, or forever when nothing is backed off
async fn sleep_until_due(due: Option<DateTime<Utc>>) {
    let Some(due) = due else {
        return std::future::pending().await;
    };
    let wait = (due - Utc::now()).to_std().unwrap_or(Duration::ZERO);
    tokio::time::sleep(wait.max(Duration::from_millis(RETRY_WAKE_FLOOR_MS))).await;
}
