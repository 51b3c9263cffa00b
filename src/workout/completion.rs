// ABOUTME: Conversion of a finished session into a workout header and performance rows
// ABOUTME: Best set, Epley estimate, volume and personal-record flag per exercise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::session::ActiveWorkoutSession;
use chrono::{DateTime, Utc};
use ironlog_core::models::{
    CompletedWorkout, ExerciseId, LogWorkoutPayload, PerformanceEntry, PerformedSet,
};
use ironlog_intelligence::strength::{best_set, is_personal_record};
use ironlog_intelligence::PerformanceHistory;
use std::collections::HashMap;
use uuid::Uuid;

/// A finished session ready to be logged
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSession {
    /// Header row
    pub workout: CompletedWorkout,
    /// One row per exercise with at least one completed set
    pub performances: Vec<PerformanceEntry>,
}

impl CompletedSession {
    /// Entries that set a new personal record
    pub fn personal_records(&self) -> impl Iterator<Item = &PerformanceEntry> {
        self.performances.iter().filter(|p| p.is_pr)
    }

    /// Payload for the offline queue
    #[must_use]
    pub fn into_payload(self) -> LogWorkoutPayload {
        LogWorkoutPayload {
            workout: self.workout,
            performances: self.performances,
        }
    }
}

pub(crate) fn build_completed_session(
    session: &ActiveWorkoutSession,
    ended_at: DateTime<Utc>,
    history: &PerformanceHistory,
) -> CompletedSession {
    let workout_id = session.id().to_owned();
    let performed_at = session.started_at();
    // an exercise listed twice in one session must beat its own earlier entry too
    let mut session_best: HashMap<ExerciseId, u32> = HashMap::new();

    let mut performances = Vec::new();
    for exercise in session.exercises() {
        let sets: Vec<PerformedSet> = exercise
            .sets
            .iter()
            .filter(|s| s.completed)
            .map(|s| PerformedSet {
                weight: s.weight,
                reps: s.reps,
            })
            .collect();
        if sets.is_empty() {
            continue;
        }

        let best = best_set(&sets);
        let estimate = best.map_or(0, |(_, estimate)| estimate);
        let previous = history
            .best_one_rep_max(exercise.exercise_id)
            .max(session_best.get(&exercise.exercise_id).copied());
        let is_pr = is_personal_record(estimate, previous);
        let entry = session_best.entry(exercise.exercise_id).or_insert(0);
        *entry = (*entry).max(estimate);

        performances.push(PerformanceEntry {
            id: Uuid::new_v4().to_string(),
            workout_id: workout_id.clone(),
            exercise_id: exercise.exercise_id,
            exercise_name: exercise.name.clone(),
            total_volume: sets.iter().map(PerformedSet::volume).sum(),
            best_set: best.map(|(set, _)| set),
            estimated_1rm: estimate,
            is_pr,
            performed_at,
            sets,
        });
    }

    let total_volume = performances.iter().map(|p| p.total_volume).sum();
    CompletedSession {
        workout: CompletedWorkout {
            id: workout_id,
            plan_id: session.plan_id().map(str::to_owned),
            name: session.name().to_owned(),
            started_at: session.started_at(),
            ended_at,
            duration_secs: session.elapsed_secs(),
            total_volume,
        },
        performances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironlog_core::models::PlannedExercise;

    fn squat(id: ExerciseId) -> PlannedExercise {
        PlannedExercise {
            exercise_id: id,
            name: "Back Squat".to_owned(),
            sets: 2,
            reps: 5,
            weight: Some(100.0),
            rest_secs: Some(0),
        }
    }

    fn past_entry(id: ExerciseId, estimated_1rm: u32) -> PerformanceEntry {
        PerformanceEntry {
            id: "past".to_owned(),
            workout_id: "w0".to_owned(),
            exercise_id: id,
            exercise_name: "Squat".to_owned(),
            sets: vec![PerformedSet {
                weight: 100.0,
                reps: 5,
            }],
            best_set: None,
            estimated_1rm,
            total_volume: 500.0,
            is_pr: true,
            performed_at: Utc::now() - chrono::Duration::days(7),
        }
    }

    #[test]
    fn test_only_completed_sets_are_recorded() {
        let id = ExerciseId::new();
        let mut session = ActiveWorkoutSession::start("Legs", vec![squat(id)], Utc::now());
        session.complete_set(0, 0).unwrap();
        let completed = session
            .finish(Utc::now(), &PerformanceHistory::default())
            .unwrap();

        assert_eq!(completed.performances.len(), 1);
        let entry = &completed.performances[0];
        assert_eq!(entry.sets.len(), 1);
        assert_eq!(entry.estimated_1rm, 117);
        assert!((entry.total_volume - 500.0).abs() < f64::EPSILON);
        assert!((completed.workout.total_volume - 500.0).abs() < f64::EPSILON);
        assert_eq!(entry.workout_id, completed.workout.id);
    }

    #[test]
    fn test_equal_estimate_is_not_a_record() {
        let id = ExerciseId::new();
        let history = PerformanceHistory::from_entries([past_entry(id, 117)]);
        let mut session = ActiveWorkoutSession::start("Legs", vec![squat(id)], Utc::now());
        session.complete_set(0, 0).unwrap();
        let completed = session.finish(Utc::now(), &history).unwrap();
        assert!(!completed.performances[0].is_pr);
        assert_eq!(completed.personal_records().count(), 0);
    }

    #[test]
    fn test_higher_estimate_is_a_record() {
        let id = ExerciseId::new();
        let history = PerformanceHistory::from_entries([past_entry(id, 110)]);
        let mut session = ActiveWorkoutSession::start("Legs", vec![squat(id)], Utc::now());
        session.complete_set(0, 1).unwrap();
        let completed = session.finish(Utc::now(), &history).unwrap();
        assert!(completed.performances[0].is_pr);
    }

    #[test]
    fn test_exercise_without_completed_sets_is_skipped() {
        let mut session =
            ActiveWorkoutSession::start("Legs", vec![squat(ExerciseId::new())], Utc::now());
        let completed = session
            .finish(Utc::now(), &PerformanceHistory::default())
            .unwrap();
        assert!(completed.performances.is_empty());
        assert!(completed.workout.total_volume.abs() < f64::EPSILON);
    }
}
