// ABOUTME: Ordered offline action queue persisted in local storage
// ABOUTME: Rehydrates on startup, persists on every mutation, and keeps a dead-letter list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Action Queue
//!
//! Pending writes are kept in insertion order. Every mutation writes the
//! full list back to the [`LocalStore`]; a failed write is logged and the
//! in-memory queue stays authoritative for the rest of the process.
//!
//! Sync passes do not replace the queue wholesale. They report a
//! [`Settlement`] per attempted action and the queue applies it in place,
//! so actions enqueued while a pass is running are never lost.

use crate::storage::LocalStore;
use chrono::{DateTime, Utc};
use ironlog_core::constants::storage;
use ironlog_core::errors::{AppError, AppResult};
use ironlog_core::models::{QueuedAction, QueuedActionKind};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};

/// Result of one attempted action in a sync pass
#[derive(Debug, Clone)]
pub enum Settlement {
    /// Remote write succeeded; drop the action
    Succeeded,
    /// Remote write failed; keep the action with updated retry bookkeeping
    Retry(QueuedAction),
    /// Retry budget exhausted or the failure is permanent
    DeadLetter(QueuedAction),
}

#[derive(Debug, Default)]
struct QueueState {
    pending: Vec<QueuedAction>,
    dead_letters: Vec<QueuedAction>,
}

/// Persistent FIFO of pending remote writes
pub struct ActionQueue {
    store: Arc<dyn LocalStore>,
    state: Mutex<QueueState>,
    changed: Notify,
}

impl ActionQueue {
    /// Rehydrate the queue and the dead-letter list from `store`
    ///
    /// Missing or unparsable data yields an empty list.
    pub async fn load(store: Arc<dyn LocalStore>) -> Self {
        let pending = read_list(store.as_ref(), storage::OFFLINE_QUEUE_KEY).await;
        let dead_letters = read_list(store.as_ref(), storage::DEAD_LETTER_KEY).await;
        info!(
            queue.pending = pending.len(),
            queue.dead_lettered = dead_letters.len(),
            "Offline queue loaded"
        );
        Self {
            store,
            state: Mutex::new(QueueState {
                pending,
                dead_letters,
            }),
            changed: Notify::new(),
        }
    }

    /// Append an action and persist the queue
    pub async fn enqueue(
        &self,
        kind: QueuedActionKind,
        payload: Value,
        now: DateTime<Utc>,
    ) -> QueuedAction {
        let action = QueuedAction::new(kind, payload, now);
        let mut state = self.state.lock().await;
        state.pending.push(action.clone());
        debug!(
            action.id = %action.id,
            action.kind = kind.as_str(),
            queue.pending = state.pending.len(),
            "Action queued"
        );
        self.persist_pending(&state.pending).await;
        self.changed.notify_one();
        action
    }

    /// Copy of the pending actions in queue order
    pub async fn snapshot(&self) -> Vec<QueuedAction> {
        self.state.lock().await.pending.clone()
    }

    /// Number of pending actions
    pub async fn len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Whether nothing is pending
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.pending.is_empty()
    }

    /// Copy of the dead-letter list
    pub async fn dead_letters(&self) -> Vec<QueuedAction> {
        self.state.lock().await.dead_letters.clone()
    }

    /// Earliest backoff deadline among pending actions
    pub async fn next_retry_at(&self) -> Option<DateTime<Utc>> {
        self.state
            .lock()
            .await
            .pending
            .iter()
            .filter_map(|action| action.next_attempt_at)
            .min()
    }

    /// Resolves after the pending list is next changed
    ///
    /// A change made while nobody is waiting is remembered for the next caller.
    pub async fn changed(&self) {
        self.changed.notified().await;
    }

    /// Number of dead-lettered actions
    pub async fn dead_letter_count(&self) -> usize {
        self.state.lock().await.dead_letters.len()
    }

    /// Apply the outcome of a sync pass
    ///
    /// Actions without a settlement (not attempted, or enqueued during the
    /// pass) stay where they are.
    pub async fn settle(&self, mut settlements: HashMap<String, Settlement>) {
        if settlements.is_empty() {
            return;
        }
        let mut state = self.state.lock().await;
        let mut dead_letters_changed = false;
        let mut kept = Vec::with_capacity(state.pending.len());

        for action in std::mem::take(&mut state.pending) {
            match settlements.remove(&action.id) {
                None => kept.push(action),
                Some(Settlement::Succeeded) => {}
                Some(Settlement::Retry(updated)) => kept.push(updated),
                Some(Settlement::DeadLetter(updated)) => {
                    warn!(
                        action.id = %updated.id,
                        action.attempts = updated.attempts,
                        error = updated.last_error.as_deref().unwrap_or_default(),
                        "Action moved to dead letters"
                    );
                    state.dead_letters.push(updated);
                    dead_letters_changed = true;
                }
            }
        }
        state.pending = kept;

        self.persist_pending(&state.pending).await;
        if dead_letters_changed {
            self.persist_dead_letters(&state.dead_letters).await;
        }
        self.changed.notify_one();
    }

    /// Move a dead-lettered action back to the tail of the queue with a fresh retry budget
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no dead letter has this id.
    pub async fn retry_dead_letter(&self, id: &str) -> AppResult<QueuedAction> {
        let mut state = self.state.lock().await;
        let position = state
            .dead_letters
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AppError::not_found(format!("Dead letter {id}")))?;
        let mut action = state.dead_letters.remove(position);
        action.attempts = 0;
        action.last_error = None;
        action.next_attempt_at = None;
        state.pending.push(action.clone());
        info!(action.id = %id, "Dead letter requeued");

        self.persist_pending(&state.pending).await;
        self.persist_dead_letters(&state.dead_letters).await;
        self.changed.notify_one();
        Ok(action)
    }

    /// Permanently drop a dead-lettered action
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no dead letter has this id.
    pub async fn discard_dead_letter(&self, id: &str) -> AppResult<QueuedAction> {
        let mut state = self.state.lock().await;
        let position = state
            .dead_letters
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AppError::not_found(format!("Dead letter {id}")))?;
        let action = state.dead_letters.remove(position);
        info!(action.id = %id, "Dead letter discarded");
        self.persist_dead_letters(&state.dead_letters).await;
        Ok(action)
    }

    async fn persist_pending(&self, pending: &[QueuedAction]) {
        write_list(self.store.as_ref(), storage::OFFLINE_QUEUE_KEY, pending).await;
    }

    async fn persist_dead_letters(&self, dead_letters: &[QueuedAction]) {
        write_list(self.store.as_ref(), storage::DEAD_LETTER_KEY, dead_letters).await;
    }
}

async fn read_list(store: &dyn LocalStore, key: &str) -> Vec<QueuedAction> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted queue, starting empty");
            return Vec::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "Persisted queue is unparsable, starting empty");
        Vec::new()
    })
}

async fn write_list(store: &dyn LocalStore, key: &str, actions: &[QueuedAction]) {
    let raw = match serde_json::to_string(actions) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "Failed to serialize queue");
            return;
        }
    };
    if let Err(e) = store.set(key, &raw).await {
        warn!(key, error = %e, "Failed to persist queue");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_settle_keeps_actions_enqueued_during_pass() {
        let queue = ActionQueue::load(Arc::new(MemoryStore::new())).await;
        let first = queue
            .enqueue(QueuedActionKind::LogWorkout, json!({"n": 1}), Utc::now())
            .await;
        let late = queue
            .enqueue(QueuedActionKind::LogWorkout, json!({"n": 2}), Utc::now())
            .await;

        let settlements = HashMap::from([(first.id.clone(), Settlement::Succeeded)]);
        queue.settle(settlements).await;

        let remaining = queue.snapshot().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, late.id);
    }

    #[tokio::test]
    async fn test_next_retry_at_is_earliest_backoff() {
        let queue = ActionQueue::load(Arc::new(MemoryStore::new())).await;
        let now = Utc::now();
        let mut actions = Vec::new();
        for n in 0..3 {
            actions.push(
                queue
                    .enqueue(QueuedActionKind::LogWorkout, json!({ "n": n }), now)
                    .await,
            );
        }
        assert_eq!(queue.next_retry_at().await, None);

        let later = now + chrono::Duration::seconds(30);
        let sooner = now + chrono::Duration::seconds(4);
        let mut settlements = HashMap::new();
        for (action, at) in actions.iter().zip([later, sooner]) {
            let mut updated = action.clone();
            updated.attempts = 1;
            updated.next_attempt_at = Some(at);
            settlements.insert(action.id.clone(), Settlement::Retry(updated));
        }
        queue.settle(settlements).await;

        assert_eq!(queue.next_retry_at().await, Some(sooner));
    }

    #[tokio::test]
    async fn test_unparsable_persisted_queue_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(storage::OFFLINE_QUEUE_KEY, "{not json")
            .await
            .unwrap();
        let queue = ActionQueue::load(store).await;
        assert!(queue.is_empty().await);
    }
}
