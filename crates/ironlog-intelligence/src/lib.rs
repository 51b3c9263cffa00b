// ABOUTME: Pure workout, nutrition and generated-content algorithms
// ABOUTME: Extracted from the application crate so they stay side-effect free and cheap to test
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![deny(unsafe_code)]

//! # IronLog Intelligence
//!
//! Deterministic algorithms used by the application layer:
//!
//! - **`plate_math`**: greedy per-side plate loading for a barbell
//! - **`strength`**: Epley 1RM estimates, best-set selection and PR detection
//! - **`history`**: per-exercise performance history keyed by stable id
//! - **`streak`**: consecutive training-day streaks
//! - **`suggestion`**: auto-fill values for a newly added set
//! - **`progression`**: progressive-overload rules and clamping of suggested adjustments
//! - **`generation`**: validation of generated recipes, workouts, programs and
//!   exercise metadata, plus the local fallback generators
//! - **`nutrition`**: daily intake totals
//! - **`measurements`**: body measurement change summaries

pub use ironlog_core::errors;
pub use ironlog_core::models;

/// Validation and fallback generation for generated content
pub mod generation;
/// Per-exercise performance history
pub mod history;
/// Body measurement change summaries
pub mod measurements;
/// Daily nutrition totals
pub mod nutrition;
/// Greedy plate loading calculator
pub mod plate_math;
/// Progressive-overload rules
pub mod progression;
/// Training-day streaks
pub mod streak;
/// 1RM estimates and personal records
pub mod strength;
/// Set auto-fill suggestions
pub mod suggestion;

pub use history::PerformanceHistory;
pub use plate_math::{calculate_plates, PlateBreakdown};
pub use streak::{current_streak, longest_streak};
pub use strength::{best_set, epley_one_rep_max, estimated_one_rep_max, is_personal_record};
pub use suggestion::suggest_next_set;
