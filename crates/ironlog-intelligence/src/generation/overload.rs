// ABOUTME: Progressive-overload request, model draft validation and the rule-based fallback
// ABOUTME: Accepted adjustments are clamped to +/-10% of the working weight and +/-3 reps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::ValidationError;
use crate::progression::{clamp_adjustment, rule_based_adjustment, ProgressionAdjustment};
use ironlog_core::models::{ExerciseId, PerformanceEntry};
use serde::{Deserialize, Serialize};

/// Recent performances of one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadRequest {
    /// Exercise to adjust
    pub exercise_id: ExerciseId,
    /// Display name
    pub exercise_name: String,
    /// Target reps per set
    pub target_reps: u32,
    /// Recent sessions, oldest first
    pub recent: Vec<PerformanceEntry>,
}

impl OverloadRequest {
    /// Heaviest completed set of the latest session
    #[must_use]
    pub fn working_weight(&self) -> f64 {
        self.recent
            .last()
            .map_or(0.0, |e| e.sets.iter().map(|s| s.weight).fold(0.0, f64::max))
    }
}

/// Adjustment shape expected from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadDraft {
    /// Suggested weight change in kilograms
    pub weight_change_kg: f64,
    /// Suggested rep change
    #[serde(default)]
    pub rep_change: i32,
    /// Explanation
    #[serde(default)]
    pub rationale: String,
}

/// Accept a drafted adjustment, clamped to the allowed bounds
///
/// # Errors
///
/// Returns [`ValidationError::OutOfRange`] for a non-finite weight change.
pub fn validate_overload(
    draft: OverloadDraft,
    request: &OverloadRequest,
) -> Result<ProgressionAdjustment, ValidationError> {
    if !draft.weight_change_kg.is_finite() {
        return Err(ValidationError::OutOfRange {
            field: "weight_change_kg",
            value: draft.weight_change_kg,
        });
    }
    let rationale = if draft.rationale.trim().is_empty() {
        "Suggested adjustment".to_owned()
    } else {
        draft.rationale.trim().to_owned()
    };
    let adjustment = ProgressionAdjustment {
        exercise_id: request.exercise_id,
        weight_change_kg: draft.weight_change_kg,
        rep_change: draft.rep_change,
        rationale,
    };
    Ok(clamp_adjustment(adjustment, request.working_weight()))
}

/// Rule-based adjustment used when the model is unavailable
#[must_use]
pub fn fallback_overload(request: &OverloadRequest) -> ProgressionAdjustment {
    rule_based_adjustment(request.exercise_id, &request.recent, request.target_reps)
}
