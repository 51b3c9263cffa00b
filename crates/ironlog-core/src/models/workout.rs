// ABOUTME: Workout models covering plans, in-session sets and completed records
// ABOUTME: CompletedWorkout header rows and per-exercise PerformanceEntry rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::exercise::ExerciseId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A planned exercise slot in a workout plan or program day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExercise {
    /// Exercise being performed
    pub exercise_id: ExerciseId,
    /// Display name
    pub name: String,
    /// Number of working sets
    pub sets: u32,
    /// Target reps per set
    pub reps: u32,
    /// Suggested load in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Rest between sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_secs: Option<u32>,
}

/// A saved or generated workout plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Unique identifier
    pub id: String,
    /// Plan name
    pub name: String,
    /// Focus (push, pull, legs, full body...)
    pub focus: String,
    /// Exercises in order
    pub exercises: Vec<PlannedExercise>,
    /// Expected duration
    pub estimated_minutes: u32,
}

/// A set inside an active session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    /// Load in kilograms
    pub weight: f64,
    /// Repetitions
    pub reps: u32,
    /// Whether the set has been performed
    pub completed: bool,
}

impl SetEntry {
    /// A not-yet-completed set
    #[must_use]
    pub const fn pending(weight: f64, reps: u32) -> Self {
        Self {
            weight,
            reps,
            completed: false,
        }
    }
}

/// A set that was actually performed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformedSet {
    /// Load in kilograms
    pub weight: f64,
    /// Repetitions
    pub reps: u32,
}

impl PerformedSet {
    /// Weight multiplied by reps
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// Header row of a completed workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedWorkout {
    /// Unique identifier
    pub id: String,
    /// Plan the session was started from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// Session name
    pub name: String,
    /// Session start
    pub started_at: DateTime<Utc>,
    /// Session end
    pub ended_at: DateTime<Utc>,
    /// Active duration (pauses excluded)
    pub duration_secs: u64,
    /// Sum of weight x reps across completed sets
    pub total_volume: f64,
}

/// Per-exercise performance row of a completed workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    /// Unique identifier
    pub id: String,
    /// Header row this entry belongs to
    pub workout_id: String,
    /// Exercise performed
    pub exercise_id: ExerciseId,
    /// Display name at the time of the workout
    pub exercise_name: String,
    /// Completed sets in order
    pub sets: Vec<PerformedSet>,
    /// Set with the highest estimated 1RM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_set: Option<PerformedSet>,
    /// Epley estimate of the best set, rounded to the nearest integer
    pub estimated_1rm: u32,
    /// Sum of weight x reps
    pub total_volume: f64,
    /// Whether `estimated_1rm` beats every earlier estimate for this exercise
    pub is_pr: bool,
    /// When the workout was performed
    pub performed_at: DateTime<Utc>,
}
