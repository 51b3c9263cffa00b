// ABOUTME: Change summaries over body measurement history
// ABOUTME: First-to-latest deltas for each tracked metric
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use ironlog_core::models::BodyMeasurement;
use serde::{Deserialize, Serialize};

/// Change between the earliest and latest value of each metric
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasurementChange {
    /// Body weight delta in kilograms
    pub weight_kg: Option<f64>,
    /// Body fat delta in percentage points
    pub body_fat_pct: Option<f64>,
    /// Waist delta in centimeters
    pub waist_cm: Option<f64>,
    /// Chest delta in centimeters
    pub chest_cm: Option<f64>,
    /// Arm delta in centimeters
    pub arm_cm: Option<f64>,
}

fn delta(
    sorted: &[&BodyMeasurement],
    metric: impl Fn(&BodyMeasurement) -> Option<f64>,
) -> Option<f64> {
    let first = sorted.iter().find_map(|m| metric(m))?;
    let last = sorted.iter().rev().find_map(|m| metric(m))?;
    Some(last - first)
}

/// Per-metric change across the history; metrics never recorded are `None`
///
/// A metric recorded once has a change of zero.
#[must_use]
pub fn measurement_change(history: &[BodyMeasurement]) -> MeasurementChange {
    let mut sorted: Vec<&BodyMeasurement> = history.iter().collect();
    sorted.sort_by_key(|m| m.measured_at);

    MeasurementChange {
        weight_kg: delta(&sorted, |m| m.weight_kg),
        body_fat_pct: delta(&sorted, |m| m.body_fat_pct),
        waist_cm: delta(&sorted, |m| m.waist_cm),
        chest_cm: delta(&sorted, |m| m.chest_cm),
        arm_cm: delta(&sorted, |m| m.arm_cm),
    }
}
