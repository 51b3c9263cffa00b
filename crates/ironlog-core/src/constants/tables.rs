// ABOUTME: Remote backend collection names
// ABOUTME: Row-based collections addressed by the backend client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

/// Exercise catalogue
pub const EXERCISES: &str = "exercises";
/// Saved workout plans
pub const WORKOUT_PLANS: &str = "workout_plans";
/// Completed workout headers
pub const WORKOUT_LOGS: &str = "workout_logs";
/// Per-exercise performance rows of a completed workout
pub const EXERCISE_PERFORMANCES: &str = "exercise_performances";
/// Multi-week programs
pub const PROGRAMS: &str = "programs";
/// Saved recipes
pub const RECIPES: &str = "recipes";
/// Food intake entries
pub const FOOD_LOGS: &str = "food_logs";
/// Body measurements
pub const MEASUREMENTS: &str = "measurements";
/// User profiles
pub const PROFILES: &str = "profiles";
