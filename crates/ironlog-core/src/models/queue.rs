// ABOUTME: Offline action queue models persisted in local storage
// ABOUTME: QueuedAction envelope with retry bookkeeping and the log-workout payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::workout::{CompletedWorkout, PerformanceEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operation carried by a queued action
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueuedActionKind {
    /// Insert a completed workout header and its performance rows
    LogWorkout,
}

impl QueuedActionKind {
    /// Stable name for logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LogWorkout => "log_workout",
        }
    }
}

/// A pending write awaiting connectivity
///
/// `created_at` is informational; ordering is the position in the queue.
/// Retry fields default so queues persisted without them still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedAction {
    /// Unique identifier generated at enqueue time
    pub id: String,
    /// Operation tag
    #[serde(rename = "type")]
    pub kind: QueuedActionKind,
    /// Operation input, opaque to the queue
    pub payload: serde_json::Value,
    /// Enqueue timestamp
    pub created_at: DateTime<Utc>,
    /// Failed remote attempts so far
    #[serde(default)]
    pub attempts: u32,
    /// Last failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Earliest time the next attempt is allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_attempt_at: Option<DateTime<Utc>>,
}

impl QueuedAction {
    /// Create a fresh action with a generated id
    #[must_use]
    pub fn new(
        kind: QueuedActionKind,
        payload: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            payload,
            created_at,
            attempts: 0,
            last_error: None,
            next_attempt_at: None,
        }
    }

    /// Whether a normal sync pass may attempt this action at `now`
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_attempt_at.map_or(true, |at| at <= now)
    }
}

/// Payload of [`QueuedActionKind::LogWorkout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogWorkoutPayload {
    /// Header row
    pub workout: CompletedWorkout,
    /// Performance rows
    pub performances: Vec<PerformanceEntry>,
}
