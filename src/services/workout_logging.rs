// ABOUTME: Completed-workout persistence through the offline queue
// ABOUTME: WorkoutLogger enqueues finished sessions; WorkoutRepository performs the two remote inserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use crate::offline::OfflineContext;
use crate::workout::CompletedSession;
use ironlog_core::constants::tables;
use ironlog_core::errors::provider::ProviderError;
use ironlog_core::errors::{AppError, AppResult};
use ironlog_core::models::{LogWorkoutPayload, QueuedActionKind};
use ironlog_providers::{row_id, RemoteBackend};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Whether an insert failed only because the row already exists
fn is_duplicate(error: &ProviderError) -> bool {
    matches!(
        error,
        ProviderError::ApiError {
            status_code: 409,
            ..
        }
    )
}

/// Remote writes for completed workouts
#[derive(Clone)]
pub struct WorkoutRepository {
    backend: Arc<dyn RemoteBackend>,
}

impl WorkoutRepository {
    /// Repository writing to `backend`
    #[must_use]
    pub fn new(backend: Arc<dyn RemoteBackend>) -> Self {
        Self { backend }
    }

    /// Insert the workout header, then its performance rows under the stored header id
    ///
    /// Replaying a payload whose rows already exist succeeds, so an action
    /// that failed halfway can be retried safely.
    ///
    /// # Errors
    ///
    /// Returns the backend failure of either insert.
    pub async fn log_workout(&self, payload: &LogWorkoutPayload) -> AppResult<String> {
        let header = serde_json::to_value(&payload.workout)?;
        let workout_id = match self
            .backend
            .insert_rows(tables::WORKOUT_LOGS, vec![header])
            .await
        {
            Ok(stored) => stored
                .first()
                .and_then(row_id)
                .unwrap_or_else(|| payload.workout.id.clone()),
            Err(e) if is_duplicate(&e) => {
                debug!(workout.id = %payload.workout.id, "Workout header already stored");
                payload.workout.id.clone()
            }
            Err(e) => return Err(e.into()),
        };

        if payload.performances.is_empty() {
            return Ok(workout_id);
        }

        let rows = payload
            .performances
            .iter()
            .map(|entry| {
                let mut entry = entry.clone();
                entry.workout_id.clone_from(&workout_id);
                serde_json::to_value(entry)
            })
            .collect::<Result<Vec<Value>, _>>()?;

        match self
            .backend
            .insert_rows(tables::EXERCISE_PERFORMANCES, rows.clone())
            .await
        {
            Ok(_) => {}
            Err(e) if is_duplicate(&e) => self.insert_missing(rows).await?,
            Err(e) => return Err(e.into()),
        }

        info!(
            workout.id = %workout_id,
            performances = payload.performances.len(),
            "Workout logged remotely"
        );
        Ok(workout_id)
    }

    async fn insert_missing(&self, rows: Vec<Value>) -> AppResult<()> {
        for row in rows {
            match self
                .backend
                .insert_rows(tables::EXERCISE_PERFORMANCES, vec![row])
                .await
            {
                Ok(_) => {}
                Err(e) if is_duplicate(&e) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Entry point for saving a finished session
#[derive(Clone)]
pub struct WorkoutLogger {
    offline: Arc<OfflineContext>,
}

impl WorkoutLogger {
    /// Logger that routes every write through the offline queue
    #[must_use]
    pub fn new(offline: Arc<OfflineContext>) -> Self {
        Self { offline }
    }

    /// Queue the completed session and trigger a sync pass; returns the action id
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the payload cannot be encoded.
    pub async fn log(&self, completed: CompletedSession) -> AppResult<String> {
        let payload = completed.into_payload();
        if payload.workout.name.trim().is_empty() {
            return Err(AppError::invalid_input("Workout name is required"));
        }
        let value = serde_json::to_value(&payload)?;
        let action = self
            .offline
            .queue_action(QueuedActionKind::LogWorkout, value)
            .await;
        Ok(action.id)
    }
}
