// ABOUTME: Per-exercise performance history keyed by stable exercise id
// ABOUTME: Latest performance lookup, best 1RM, and PR checks for new estimates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use crate::strength::is_personal_record;
use ironlog_core::models::{ExerciseId, PerformanceEntry, PerformedSet};
use std::collections::HashMap;

/// Performance history grouped by exercise, each list in chronological order
#[derive(Debug, Clone, Default)]
pub struct PerformanceHistory {
    by_exercise: HashMap<ExerciseId, Vec<PerformanceEntry>>,
}

impl PerformanceHistory {
    /// Build a history from entries in any order
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = PerformanceEntry>) -> Self {
        let mut history = Self::default();
        for entry in entries {
            history.record(entry);
        }
        history
    }

    /// Add an entry, keeping chronological order
    pub fn record(&mut self, entry: PerformanceEntry) {
        let list = self.by_exercise.entry(entry.exercise_id).or_default();
        let position = list.partition_point(|e| e.performed_at <= entry.performed_at);
        list.insert(position, entry);
    }

    /// Every entry for an exercise, oldest first
    #[must_use]
    pub fn entries_for(&self, exercise_id: ExerciseId) -> &[PerformanceEntry] {
        self.by_exercise
            .get(&exercise_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Most recent entry for an exercise
    #[must_use]
    pub fn latest_for(&self, exercise_id: ExerciseId) -> Option<&PerformanceEntry> {
        self.entries_for(exercise_id).last()
    }

    /// Last set of the most recent entry for an exercise
    #[must_use]
    pub fn last_set_for(&self, exercise_id: ExerciseId) -> Option<PerformedSet> {
        self.latest_for(exercise_id)
            .and_then(|entry| entry.sets.last().copied())
    }

    /// Highest estimated 1RM ever recorded for an exercise
    #[must_use]
    pub fn best_one_rep_max(&self, exercise_id: ExerciseId) -> Option<u32> {
        self.entries_for(exercise_id)
            .iter()
            .map(|e| e.estimated_1rm)
            .max()
    }

    /// Whether `estimate` would be a new personal record for the exercise
    #[must_use]
    pub fn is_personal_record(&self, exercise_id: ExerciseId, estimate: u32) -> bool {
        is_personal_record(estimate, self.best_one_rep_max(exercise_id))
    }

    /// Number of exercises with history
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.by_exercise.len()
    }
}
