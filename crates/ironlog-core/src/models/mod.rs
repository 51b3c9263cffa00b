// ABOUTME: Core data models shared across the IronLog workspace
// ABOUTME: Exercises, workouts, performances, queued actions, nutrition, programs and backups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Data Models
//!
//! Plain serde-friendly types. Rows exchanged with the remote backend use the
//! same field names, so each model serializes directly into a table row.

/// Backup file format used by import and export
pub mod backup;
/// Exercise catalogue types and the stable exercise identifier
pub mod exercise;
/// Body measurement records
pub mod measurement;
/// Food items, food log entries and meal types
pub mod nutrition;
/// Multi-week training programs
pub mod program;
/// Pending offline actions
pub mod queue;
/// Recipes and ingredients
pub mod recipe;
/// Workout plans, completed workouts and performance entries
pub mod workout;

pub use backup::{BackupCollection, BackupFile};
pub use exercise::{Equipment, Exercise, ExerciseId, MuscleGroup};
pub use measurement::BodyMeasurement;
pub use nutrition::{FoodItem, FoodLogEntry, MealType};
pub use program::{Program, ProgramDay, ProgramWeek};
pub use queue::{LogWorkoutPayload, QueuedAction, QueuedActionKind};
pub use recipe::{Recipe, RecipeIngredient};
pub use workout::{
    CompletedWorkout, PerformanceEntry, PerformedSet, PlannedExercise, SetEntry, WorkoutPlan,
};
