// ABOUTME: Greedy plate-loading calculator for barbell lifts
// ABOUTME: Per-side breakdown, unloadable remainder, and the closest achievable weight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use ironlog_core::constants::workout::{MAX_LOAD_PER_SIDE_KG, PLATE_DENOMINATIONS_KG};
use serde::{Deserialize, Serialize};

/// Result of a plate calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateBreakdown {
    /// Plates to load on ONE side, heaviest first
    pub plates: Vec<f64>,
    /// Weight that could not be loaded, across both sides
    pub remainder: f64,
    /// Bar plus both sides as actually loaded
    pub closest_valid_weight: f64,
}

impl PlateBreakdown {
    /// Bar only, nothing loaded
    #[must_use]
    pub const fn empty(bar_weight: f64) -> Self {
        Self {
            plates: Vec::new(),
            remainder: 0.0,
            closest_valid_weight: bar_weight,
        }
    }
}

/// Round to two decimals to keep repeated subtraction from drifting
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the per-side plates for `target_weight` using the standard plate set
///
/// Greedy selection is optimal here because the standard denominations form a
/// canonical coin system.
///
/// # Example
///
/// ```
/// use ironlog_intelligence::plate_math::calculate_plates;
///
/// let result = calculate_plates(100.0, 20.0);
/// assert_eq!(result.plates, vec![25.0, 15.0]);
/// assert!((result.closest_valid_weight - 100.0).abs() < f64::EPSILON);
/// ```
#[must_use]
pub fn calculate_plates(target_weight: f64, bar_weight: f64) -> PlateBreakdown {
    calculate_plates_with(target_weight, bar_weight, &PLATE_DENOMINATIONS_KG)
}

/// Compute the per-side plates using a custom denomination set
///
/// `denominations` must be sorted heaviest first. At most
/// [`MAX_LOAD_PER_SIDE_KG`] is loaded per side; anything beyond that is
/// reported in the remainder.
#[must_use]
pub fn calculate_plates_with(
    target_weight: f64,
    bar_weight: f64,
    denominations: &[f64],
) -> PlateBreakdown {
    if !target_weight.is_finite() || target_weight <= bar_weight {
        return PlateBreakdown::empty(bar_weight);
    }

    let per_side = round2((target_weight - bar_weight) / 2.0);
    let mut remaining = per_side.min(MAX_LOAD_PER_SIDE_KG);
    let mut plates = Vec::new();

    for &plate in denominations.iter().filter(|p| **p > 0.0) {
        while remaining >= plate {
            plates.push(plate);
            remaining = round2(remaining - plate);
        }
    }

    let loaded_per_side: f64 = round2(plates.iter().sum());
    PlateBreakdown {
        plates,
        remainder: round2((per_side - loaded_per_side) * 2.0),
        closest_valid_weight: round2(bar_weight + loaded_per_side * 2.0),
    }
}
