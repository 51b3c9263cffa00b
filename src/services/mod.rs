// ABOUTME: Application services composing storage, providers and algorithms
// ABOUTME: Workout logging, generated content and nutrition lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

/// Model-first generation with fallbacks
pub mod generation;
/// Food lookup with a local fallback
pub mod nutrition;
/// Completed workout persistence
pub mod workout_logging;

pub use generation::GenerationService;
pub use nutrition::{FoodLookup, LookupSource, NutritionService};
pub use workout_logging::{WorkoutLogger, WorkoutRepository};
