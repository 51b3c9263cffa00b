// ABOUTME: Sync executor draining the offline queue against the remote backend
// ABOUTME: Single-flight passes, in-order attempts, exponential backoff and dead-lettering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Sync Executor
//!
//! A pass snapshots the queue and attempts every due action front to back.
//! A failure never blocks later actions in the same pass. Failed actions
//! stay in the queue with `next_attempt_at` pushed out by an exponential
//! backoff; after `max_attempts` failures, or on a failure that retrying
//! cannot fix, they move to the dead-letter list.

use super::queue::{ActionQueue, Settlement};
use crate::config::SyncConfig;
use crate::services::WorkoutRepository;
use chrono::{DateTime, Utc};
use ironlog_core::constants::sync::{BACKOFF_BASE_MS, BACKOFF_MAX_MS, MAX_ATTEMPTS};
use ironlog_core::errors::{AppError, AppResult};
use ironlog_core::models::{LogWorkoutPayload, QueuedAction, QueuedActionKind};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Backoff and poison-item policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after the first failure
    pub base: Duration,
    /// Upper bound on the delay
    pub max: Duration,
    /// Failures before an action is dead-lettered
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(BACKOFF_BASE_MS),
            max: Duration::from_millis(BACKOFF_MAX_MS),
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// Policy from the sync configuration
    #[must_use]
    pub const fn from_config(config: &SyncConfig) -> Self {
        Self {
            base: config.backoff_base,
            max: config.backoff_max,
            max_attempts: config.max_attempts,
        }
    }

    /// `min(base * 2^(attempts - 1), max)`
    #[must_use]
    pub fn delay_for(&self, attempts: u32) -> Duration {
        let exponent = attempts.saturating_sub(1).min(31);
        self.base.saturating_mul(1_u32 << exponent).min(self.max)
    }

    /// Record a failed attempt on `action`
    fn settle_failure(
        &self,
        mut action: QueuedAction,
        error: &AppError,
        now: DateTime<Utc>,
    ) -> Settlement {
        action.attempts = action.attempts.saturating_add(1);
        action.last_error = Some(error.to_string());

        if !error.is_transient() || action.attempts >= self.max_attempts {
            action.next_attempt_at = None;
            return Settlement::DeadLetter(action);
        }

        let delay = self.delay_for(action.attempts);
        let delay = chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());
        action.next_attempt_at = Some(now.checked_add_signed(delay).unwrap_or(now));
        Settlement::Retry(action)
    }
}

/// Counters for one sync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Actions attempted
    pub attempted: usize,
    /// Actions written remotely and removed
    pub succeeded: usize,
    /// Actions that failed this pass (including dead-lettered ones)
    pub failed: usize,
    /// Actions skipped because their backoff has not elapsed
    pub deferred: usize,
    /// Actions moved to the dead-letter list
    pub dead_lettered: usize,
    /// Queue length after the pass
    pub remaining: usize,
}

/// Result of asking for a sync pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Queue was empty
    Idle,
    /// Another pass holds the single-flight guard
    AlreadyRunning,
    /// A pass ran
    Completed(SyncReport),
}

impl SyncOutcome {
    /// Report of a completed pass
    #[must_use]
    pub const fn report(&self) -> Option<&SyncReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Idle | Self::AlreadyRunning => None,
        }
    }
}

/// Resets the syncing flag even if the pass future is dropped
struct SyncingFlag<'a>(&'a AtomicBool);

impl<'a> SyncingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for SyncingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drains the [`ActionQueue`]
pub struct SyncExecutor {
    queue: Arc<ActionQueue>,
    repository: WorkoutRepository,
    policy: RetryPolicy,
    guard: Mutex<()>,
    syncing: AtomicBool,
}

impl SyncExecutor {
    /// Executor writing through `repository`
    #[must_use]
    pub fn new(
        queue: Arc<ActionQueue>,
        repository: WorkoutRepository,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            queue,
            repository,
            policy,
            guard: Mutex::new(()),
            syncing: AtomicBool::new(false),
        }
    }

    /// Queue drained by this executor
    #[must_use]
    pub fn queue(&self) -> &Arc<ActionQueue> {
        &self.queue
    }

    /// Retry policy in effect
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Whether a pass is in progress
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    /// Run a normal pass: actions still in backoff are skipped
    pub async fn sync(&self) -> SyncOutcome {
        self.run_pass(Utc::now(), false).await
    }

    /// Run a pass that ignores backoff
    pub async fn force_sync(&self) -> SyncOutcome {
        self.run_pass(Utc::now(), true).await
    }

    /// Run a pass as of `now`
    pub async fn run_pass(&self, now: DateTime<Utc>, force: bool) -> SyncOutcome {
        let Ok(_guard) = self.guard.try_lock() else {
            debug!("Sync pass already running");
            return SyncOutcome::AlreadyRunning;
        };

        let snapshot = self.queue.snapshot().await;
        if snapshot.is_empty() {
            return SyncOutcome::Idle;
        }
        let _flag = SyncingFlag::raise(&self.syncing);
        info!(queue.pending = snapshot.len(), force, "Sync pass started");

        let mut report = SyncReport::default();
        let mut settlements = HashMap::with_capacity(snapshot.len());

        for action in snapshot {
            if !force && !action.is_due(now) {
                report.deferred += 1;
                continue;
            }
            report.attempted += 1;

            match self.execute(&action).await {
                Ok(()) => {
                    report.succeeded += 1;
                    settlements.insert(action.id.clone(), Settlement::Succeeded);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        action.id = %action.id,
                        action.attempts = action.attempts + 1,
                        error = %e,
                        "Queued action failed"
                    );
                    let id = action.id.clone();
                    let settlement = self.policy.settle_failure(action, &e, now);
                    if matches!(settlement, Settlement::DeadLetter(_)) {
                        report.dead_lettered += 1;
                    }
                    settlements.insert(id, settlement);
                }
            }
        }

        self.queue.settle(settlements).await;
        report.remaining = self.queue.len().await;

        info!(
            sync.attempted = report.attempted,
            sync.succeeded = report.succeeded,
            sync.failed = report.failed,
            sync.deferred = report.deferred,
            sync.dead_lettered = report.dead_lettered,
            sync.remaining = report.remaining,
            "Sync pass finished"
        );
        SyncOutcome::Completed(report)
    }

    async fn execute(&self, action: &QueuedAction) -> AppResult<()> {
        match action.kind {
            QueuedActionKind::LogWorkout => {
                let payload: LogWorkoutPayload = serde_json::from_value(action.payload.clone())?;
                self.repository.log_workout(&payload).await?;
                Ok(())
            }
            other => Err(AppError::invalid_input(format!(
                "Unsupported queued action {}",
                other.as_str()
            ))),
        }
    }
}
