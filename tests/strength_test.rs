// ABOUTME: Integration tests for the deterministic workout calculators
// ABOUTME: Plate loading, Epley estimates, personal records and training streaks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::float_cmp)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use ironlog::intelligence::{
    best_set, calculate_plates, current_streak, epley_one_rep_max, estimated_one_rep_max,
    is_personal_record, longest_streak,
};
use ironlog::models::PerformedSet;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

// ============================================================================
// Plate math
// ============================================================================

#[test]
fn test_exact_load() {
    let result = calculate_plates(100.0, 20.0);
    assert_eq!(result.plates, vec![25.0, 15.0]);
    assert_eq!(result.remainder, 0.0);
    assert_eq!(result.closest_valid_weight, 100.0);
}

#[test]
fn test_unloadable_remainder_is_reported() {
    let result = calculate_plates(143.0, 20.0);
    assert_eq!(result.plates, vec![25.0, 25.0, 10.0, 1.25]);
    assert_eq!(result.remainder, 0.5);
    assert_eq!(result.closest_valid_weight, 142.5);
}

#[test]
fn test_target_at_or_below_bar_loads_nothing() {
    for target in [20.0, 15.0, 0.0] {
        let result = calculate_plates(target, 20.0);
        assert!(result.plates.is_empty());
        assert_eq!(result.remainder, 0.0);
        assert_eq!(result.closest_valid_weight, 20.0);
    }
}

#[test]
fn test_plates_are_heaviest_first() {
    let result = calculate_plates(187.5, 20.0);
    assert!(result.plates.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(result.closest_valid_weight, 187.5);
}

#[test]
fn test_lighter_bar() {
    let result = calculate_plates(35.0, 15.0);
    assert_eq!(result.plates, vec![10.0]);
}

// ============================================================================
// One-rep max and records
// ============================================================================

#[test]
fn test_epley_estimate() {
    assert_eq!(estimated_one_rep_max(100.0, 5), 117);
    assert_eq!(estimated_one_rep_max(60.0, 10), 80);
    assert_eq!(estimated_one_rep_max(100.0, 0), 0);
    assert!((epley_one_rep_max(90.0, 3) - 99.0).abs() < 1e-9);
}

#[test]
fn test_best_set_picks_highest_estimate() {
    let sets = [
        PerformedSet {
            weight: 100.0,
            reps: 5,
        },
        PerformedSet {
            weight: 110.0,
            reps: 2,
        },
        PerformedSet {
            weight: 90.0,
            reps: 10,
        },
    ];
    let (set, estimate) = best_set(&sets).unwrap();
    assert_eq!(set.weight, 90.0);
    assert_eq!(estimate, 120);
    assert!(best_set(&[]).is_none());
}

#[test]
fn test_record_requires_strict_improvement() {
    assert!(is_personal_record(118, Some(117)));
    assert!(!is_personal_record(117, Some(117)));
    assert!(is_personal_record(1, None));
    assert!(!is_personal_record(0, None));
}

// ============================================================================
// Streaks
// ============================================================================

#[test]
fn test_streak_ending_today() {
    let dates = [day(8), day(9), day(10)];
    assert_eq!(current_streak(&dates, day(10)), 3);
}

#[test]
fn test_streak_ending_yesterday_still_counts() {
    let dates = [day(7), day(8), day(9)];
    assert_eq!(current_streak(&dates, day(10)), 3);
}

#[test]
fn test_gap_breaks_streak() {
    let dates = [day(5), day(6), day(8)];
    assert_eq!(current_streak(&dates, day(10)), 0);
    assert_eq!(longest_streak(&dates), 2);
}

#[test]
fn test_duplicate_and_future_dates_are_ignored() {
    let dates = [day(9), day(9), day(10), day(12)];
    assert_eq!(current_streak(&dates, day(10)), 2);
}

#[test]
fn test_longest_streak_across_history() {
    let dates = [day(1), day(2), day(3), day(4), day(10), day(11), day(20)];
    assert_eq!(longest_streak(&dates), 4);
    assert_eq!(longest_streak(&[]), 0);
}
