// ABOUTME: Consecutive training-day streak calculation
// ABOUTME: Current streak anchored at today or yesterday, and the longest historical run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Consecutive days with at least one completed workout, ending today or yesterday
///
/// A streak whose most recent day is older than yesterday is broken and counts
/// as zero. Duplicate dates and dates after `today` are ignored.
#[must_use]
pub fn current_streak(workout_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = workout_dates
        .iter()
        .copied()
        .filter(|d| *d <= today)
        .collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive training days in the history
#[must_use]
pub fn longest_streak(workout_dates: &[NaiveDate]) -> u32 {
    let days: BTreeSet<NaiveDate> = workout_dates.iter().copied().collect();
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in days {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn test_longest_streak_spans_gaps() {
        let dates = [date(1), date(2), date(3), date(5), date(6)];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(current_streak(&[], date(10)), 0);
        assert_eq!(longest_streak(&[]), 0);
    }
}
