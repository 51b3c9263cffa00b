// ABOUTME: Auto-fill values for a set added during an active workout
// ABOUTME: Previous set in the session first, then the latest historical set, then the plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use ironlog_core::constants::workout::DEFAULT_SET_REPS;
use ironlog_core::models::{PerformedSet, SetEntry};

/// Values for a newly added (not yet completed) set
///
/// Priority:
/// 1. the immediately preceding set of this exercise in the current session
/// 2. the last set of the most recent historical performance of the exercise
/// 3. the planned target, or an empty bar with the default rep count
#[must_use]
pub fn suggest_next_set(
    current_sets: &[SetEntry],
    last_historical: Option<PerformedSet>,
    planned: Option<(f64, u32)>,
) -> SetEntry {
    if let Some(previous) = current_sets.last() {
        return SetEntry::pending(previous.weight, previous.reps);
    }
    if let Some(previous) = last_historical {
        return SetEntry::pending(previous.weight, previous.reps);
    }
    let (weight, reps) = planned.unwrap_or((0.0, DEFAULT_SET_REPS));
    SetEntry::pending(weight, reps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_set_wins_over_history() {
        let current = [SetEntry {
            weight: 80.0,
            reps: 8,
            completed: true,
        }];
        let history = Some(PerformedSet {
            weight: 100.0,
            reps: 5,
        });
        let next = suggest_next_set(&current, history, None);
        assert!((next.weight - 80.0).abs() < f64::EPSILON);
        assert_eq!(next.reps, 8);
        assert!(!next.completed);
    }

    #[test]
    fn test_history_used_for_first_set() {
        let history = Some(PerformedSet {
            weight: 100.0,
            reps: 5,
        });
        let next = suggest_next_set(&[], history, Some((60.0, 12)));
        assert!((next.weight - 100.0).abs() < f64::EPSILON);
        assert_eq!(next.reps, 5);
    }

    #[test]
    fn test_defaults_without_any_reference() {
        let next = suggest_next_set(&[], None, None);
        assert!(next.weight.abs() < f64::EPSILON);
        assert_eq!(next.reps, DEFAULT_SET_REPS);
    }
}
