// ABOUTME: One-repetition-maximum estimation and personal record detection
// ABOUTME: Epley formula, best-set selection over performed sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use ironlog_core::models::PerformedSet;

/// Epley estimate: `weight * (1 + reps / 30)`
///
/// A zero-rep set carries no information and estimates to zero.
#[must_use]
pub fn epley_one_rep_max(weight: f64, reps: u32) -> f64 {
    if reps == 0 || weight <= 0.0 {
        return 0.0;
    }
    weight * (1.0 + f64::from(reps) / 30.0)
}

/// Epley estimate rounded to the nearest integer
///
/// # Example
///
/// ```
/// use ironlog_intelligence::strength::estimated_one_rep_max;
///
/// assert_eq!(estimated_one_rep_max(100.0, 5), 117);
/// ```
#[must_use]
pub fn estimated_one_rep_max(weight: f64, reps: u32) -> u32 {
    epley_one_rep_max(weight, reps).round().max(0.0) as u32
}

/// Set with the highest estimated 1RM, with that estimate
///
/// Ties keep the earliest set.
#[must_use]
pub fn best_set(sets: &[PerformedSet]) -> Option<(PerformedSet, u32)> {
    sets.iter().fold(None, |best, set| {
        let estimate = estimated_one_rep_max(set.weight, set.reps);
        match best {
            Some((_, best_estimate)) if best_estimate >= estimate => best,
            _ => Some((*set, estimate)),
        }
    })
}

/// A new estimate is a PR only if it strictly beats the previous best
///
/// With no previous estimate, any positive estimate is a PR.
#[must_use]
pub fn is_personal_record(estimate: u32, previous_best: Option<u32>) -> bool {
    previous_best.map_or(estimate > 0, |best| estimate > best)
}
