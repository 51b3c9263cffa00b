// ABOUTME: Progressive-overload rules and bounds for suggested load changes
// ABOUTME: Rule-based fallback adjustment and clamping of externally suggested adjustments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use ironlog_core::constants::generation::{
    DELOAD_AFTER_MISSES, DELOAD_RATIO, MAX_REP_ADJUSTMENT, MAX_WEIGHT_ADJUSTMENT_RATIO,
    PROGRESSION_INCREMENT_KG,
};
use ironlog_core::models::{ExerciseId, PerformanceEntry};
use serde::{Deserialize, Serialize};

/// Suggested change to the working load of one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionAdjustment {
    /// Exercise the adjustment applies to
    pub exercise_id: ExerciseId,
    /// Change in kilograms (negative for a deload)
    pub weight_change_kg: f64,
    /// Change in target reps
    pub rep_change: i32,
    /// Short explanation shown to the user
    pub rationale: String,
}

impl ProgressionAdjustment {
    /// No change
    #[must_use]
    pub fn hold(exercise_id: ExerciseId, rationale: impl Into<String>) -> Self {
        Self {
            exercise_id,
            weight_change_kg: 0.0,
            rep_change: 0,
            rationale: rationale.into(),
        }
    }
}

fn hit_target(entry: &PerformanceEntry, target_reps: u32) -> bool {
    !entry.sets.is_empty() && entry.sets.iter().all(|s| s.reps >= target_reps)
}

/// Working weight of an entry: heaviest completed set
fn working_weight(entry: &PerformanceEntry) -> f64 {
    entry.sets.iter().map(|s| s.weight).fold(0.0, f64::max)
}

/// Round to the nearest 0.5 kg
fn round_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

/// Deterministic overload rule used when no external suggestion is available
///
/// `recent` must be chronological. Every set at or above `target_reps` in the
/// latest session adds [`PROGRESSION_INCREMENT_KG`]; missing the target in each
/// of the last [`DELOAD_AFTER_MISSES`] sessions deloads by 10%.
#[must_use]
pub fn rule_based_adjustment(
    exercise_id: ExerciseId,
    recent: &[PerformanceEntry],
    target_reps: u32,
) -> ProgressionAdjustment {
    let Some(latest) = recent.last() else {
        return ProgressionAdjustment::hold(exercise_id, "No history yet");
    };

    if hit_target(latest, target_reps) {
        return ProgressionAdjustment {
            exercise_id,
            weight_change_kg: PROGRESSION_INCREMENT_KG,
            rep_change: 0,
            rationale: format!("All sets reached {target_reps} reps"),
        };
    }

    let misses = recent
        .iter()
        .rev()
        .take_while(|e| !hit_target(e, target_reps))
        .count();
    if misses >= DELOAD_AFTER_MISSES {
        let weight = working_weight(latest);
        return ProgressionAdjustment {
            exercise_id,
            weight_change_kg: round_half(weight * DELOAD_RATIO) - weight,
            rep_change: 0,
            rationale: format!("Target missed in {misses} consecutive sessions"),
        };
    }

    ProgressionAdjustment::hold(exercise_id, "Repeat the current load")
}

/// Bound an adjustment to +/-10% of the working weight and +/-3 reps
///
/// With no working weight the bound is one progression increment. Non-finite
/// values become zero.
#[must_use]
pub fn clamp_adjustment(
    adjustment: ProgressionAdjustment,
    current_weight: f64,
) -> ProgressionAdjustment {
    let max_change = if current_weight > 0.0 {
        current_weight * MAX_WEIGHT_ADJUSTMENT_RATIO
    } else {
        PROGRESSION_INCREMENT_KG
    };
    let weight_change_kg = if adjustment.weight_change_kg.is_finite() {
        adjustment.weight_change_kg.clamp(-max_change, max_change)
    } else {
        0.0
    };
    ProgressionAdjustment {
        weight_change_kg,
        rep_change: adjustment
            .rep_change
            .clamp(-MAX_REP_ADJUSTMENT, MAX_REP_ADJUSTMENT),
        ..adjustment
    }
}
