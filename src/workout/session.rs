// ABOUTME: Active workout session state machine
// ABOUTME: Running, paused, resting and finished states with per-set completion and rest countdowns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Active Workout Session
//!
//! The session is driven one second at a time by [`ActiveWorkoutSession::tick`].
//! Elapsed time stops while paused. Completing a set starts the exercise's
//! rest countdown; when it reaches zero the session returns to running and
//! [`SessionEvent::RestFinished`] is emitted so the caller can pulse haptics.

use super::completion::{build_completed_session, CompletedSession};
use chrono::{DateTime, Utc};
use ironlog_core::constants::workout::DEFAULT_REST_SECS;
use ironlog_core::errors::AppError;
use ironlog_core::models::{ExerciseId, PlannedExercise, SetEntry, WorkoutPlan};
use ironlog_intelligence::{suggest_next_set, PerformanceHistory};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum SessionState {
    /// Elapsed time is ticking
    Running,
    /// Nothing ticks; `resume_rest` holds a frozen rest countdown
    Paused {
        /// Rest seconds to resume with, if paused while resting
        resume_rest: Option<u32>,
    },
    /// Rest countdown between sets
    Resting {
        /// Seconds until the next set
        remaining_secs: u32,
    },
    /// Session ended
    Finished,
}

/// Notable things that happen on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Rest countdown reached zero
    RestFinished,
}

/// Rejected session operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The session has already been finished
    #[error("workout session already finished")]
    Finished,
    /// Exercise index does not exist
    #[error("no exercise at position {0}")]
    NoSuchExercise(usize),
    /// Set index does not exist
    #[error("exercise {exercise} has no set at position {set}")]
    NoSuchSet {
        /// Exercise position
        exercise: usize,
        /// Set position
        set: usize,
    },
    /// Weight must be finite and non-negative
    #[error("invalid weight {0}")]
    InvalidWeight(f64),
}

impl From<SessionError> for AppError {
    fn from(error: SessionError) -> Self {
        Self::invalid_input(error.to_string()).with_source(error)
    }
}

/// An exercise inside the active session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveExercise {
    /// Stable id used for history and records
    pub exercise_id: ExerciseId,
    /// Display name
    pub name: String,
    /// Rest after each completed set
    pub rest_secs: Option<u32>,
    /// Planned load and reps, used to fill sets without any reference
    pub planned: Option<(f64, u32)>,
    /// Sets in order
    pub sets: Vec<SetEntry>,
}

impl From<PlannedExercise> for ActiveExercise {
    fn from(planned: PlannedExercise) -> Self {
        let weight = planned.weight.unwrap_or(0.0);
        Self {
            exercise_id: planned.exercise_id,
            name: planned.name,
            rest_secs: planned.rest_secs,
            planned: Some((weight, planned.reps)),
            sets: (0..planned.sets)
                .map(|_| SetEntry::pending(weight, planned.reps))
                .collect(),
        }
    }
}

/// A workout in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveWorkoutSession {
    id: String,
    plan_id: Option<String>,
    name: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    elapsed_secs: u64,
    default_rest_secs: u32,
    state: SessionState,
    exercises: Vec<ActiveExercise>,
}

impl ActiveWorkoutSession {
    /// Start a session with the given exercises
    #[must_use]
    pub fn start(
        name: impl Into<String>,
        exercises: Vec<PlannedExercise>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            plan_id: None,
            name: name.into(),
            started_at,
            ended_at: None,
            elapsed_secs: 0,
            default_rest_secs: DEFAULT_REST_SECS,
            state: SessionState::Running,
            exercises: exercises.into_iter().map(ActiveExercise::from).collect(),
        }
    }

    /// Start a session from a saved plan
    #[must_use]
    pub fn from_plan(plan: &WorkoutPlan, started_at: DateTime<Utc>) -> Self {
        let mut session = Self::start(plan.name.clone(), plan.exercises.clone(), started_at);
        session.plan_id = Some(plan.id.clone());
        session
    }

    /// Rest used for exercises without their own
    #[must_use]
    pub const fn with_default_rest(mut self, secs: u32) -> Self {
        self.default_rest_secs = secs;
        self
    }

    /// Session id (becomes the workout log id)
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Plan the session was started from
    #[must_use]
    pub fn plan_id(&self) -> Option<&str> {
        self.plan_id.as_deref()
    }

    /// Session name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start time
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// End time once finished
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Active seconds (pauses excluded)
    #[must_use]
    pub const fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Exercises in order
    #[must_use]
    pub fn exercises(&self) -> &[ActiveExercise] {
        &self.exercises
    }

    /// Rest seconds left, including a countdown frozen by a pause
    #[must_use]
    pub const fn rest_remaining(&self) -> Option<u32> {
        match self.state {
            SessionState::Resting { remaining_secs } => Some(remaining_secs),
            SessionState::Paused { resume_rest } => resume_rest,
            SessionState::Running | SessionState::Finished => None,
        }
    }

    /// Whether the session has been finished
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished)
    }

    /// Weight x reps over completed sets
    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.completed)
            .map(|s| s.weight * f64::from(s.reps))
            .sum()
    }

    /// Number of completed sets
    #[must_use]
    pub fn completed_sets(&self) -> usize {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.completed)
            .count()
    }

    /// Advance the clock by one second
    pub fn tick(&mut self) -> Option<SessionEvent> {
        match self.state {
            SessionState::Running => {
                self.elapsed_secs += 1;
                None
            }
            SessionState::Resting { remaining_secs } => {
                self.elapsed_secs += 1;
                let remaining_secs = remaining_secs.saturating_sub(1);
                if remaining_secs == 0 {
                    self.state = SessionState::Running;
                    Some(SessionEvent::RestFinished)
                } else {
                    self.state = SessionState::Resting { remaining_secs };
                    None
                }
            }
            SessionState::Paused { .. } | SessionState::Finished => None,
        }
    }

    /// Pause or resume; returns the new state
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Finished`] after the session ended.
    pub fn toggle_pause(&mut self) -> Result<SessionState, SessionError> {
        self.state = match self.state {
            SessionState::Running => SessionState::Paused { resume_rest: None },
            SessionState::Resting { remaining_secs } => SessionState::Paused {
                resume_rest: Some(remaining_secs),
            },
            SessionState::Paused { resume_rest: None } => SessionState::Running,
            SessionState::Paused {
                resume_rest: Some(remaining_secs),
            } => SessionState::Resting { remaining_secs },
            SessionState::Finished => return Err(SessionError::Finished),
        };
        Ok(self.state)
    }

    /// Mark a set done and start the rest countdown
    ///
    /// Completing an already completed set changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown positions or a finished session.
    pub fn complete_set(&mut self, exercise: usize, set: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        let default_rest = self.default_rest_secs;
        let active = self.exercise_mut(exercise)?;
        let rest = active.rest_secs.unwrap_or(default_rest);
        let entry = set_mut(active, exercise, set)?;
        if entry.completed {
            return Ok(());
        }
        entry.completed = true;

        self.state = match self.state {
            SessionState::Paused { .. } => SessionState::Paused {
                resume_rest: (rest > 0).then_some(rest),
            },
            _ if rest == 0 => SessionState::Running,
            _ => SessionState::Resting {
                remaining_secs: rest,
            },
        };
        Ok(())
    }

    /// Mark a set as not done; the rest countdown is left alone
    ///
    /// # Errors
    ///
    /// Returns an error for unknown positions or a finished session.
    pub fn uncomplete_set(&mut self, exercise: usize, set: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        let active = self.exercise_mut(exercise)?;
        set_mut(active, exercise, set)?.completed = false;
        Ok(())
    }

    /// Change the weight and reps of a set
    ///
    /// # Errors
    ///
    /// Returns an error for unknown positions, a negative or non-finite
    /// weight, or a finished session.
    pub fn update_set(
        &mut self,
        exercise: usize,
        set: usize,
        weight: f64,
        reps: u32,
    ) -> Result<(), SessionError> {
        self.ensure_active()?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(SessionError::InvalidWeight(weight));
        }
        let active = self.exercise_mut(exercise)?;
        let entry = set_mut(active, exercise, set)?;
        entry.weight = weight;
        entry.reps = reps;
        Ok(())
    }

    /// Append a set pre-filled from this session, then history, then the plan
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown exercise or a finished session.
    pub fn add_set(
        &mut self,
        exercise: usize,
        history: &PerformanceHistory,
    ) -> Result<SetEntry, SessionError> {
        self.ensure_active()?;
        let active = self.exercise_mut(exercise)?;
        let entry = suggest_next_set(
            &active.sets,
            history.last_set_for(active.exercise_id),
            active.planned,
        );
        active.sets.push(entry);
        Ok(entry)
    }

    /// Remove a set
    ///
    /// # Errors
    ///
    /// Returns an error for unknown positions or a finished session.
    pub fn remove_set(&mut self, exercise: usize, set: usize) -> Result<SetEntry, SessionError> {
        self.ensure_active()?;
        let active = self.exercise_mut(exercise)?;
        if set >= active.sets.len() {
            return Err(SessionError::NoSuchSet { exercise, set });
        }
        Ok(active.sets.remove(set))
    }

    /// End the rest countdown now; returns whether one was running
    pub fn skip_rest(&mut self) -> bool {
        match self.state {
            SessionState::Resting { .. } => {
                self.state = SessionState::Running;
                true
            }
            SessionState::Paused {
                resume_rest: Some(_),
            } => {
                self.state = SessionState::Paused { resume_rest: None };
                true
            }
            SessionState::Running
            | SessionState::Paused { resume_rest: None }
            | SessionState::Finished => false,
        }
    }

    /// Add seconds to the rest countdown; returns the new remaining time
    pub fn extend_rest(&mut self, secs: u32) -> Option<u32> {
        match self.state {
            SessionState::Resting { remaining_secs } => {
                let remaining_secs = remaining_secs.saturating_add(secs);
                self.state = SessionState::Resting { remaining_secs };
                Some(remaining_secs)
            }
            SessionState::Paused {
                resume_rest: Some(remaining),
            } => {
                let remaining = remaining.saturating_add(secs);
                self.state = SessionState::Paused {
                    resume_rest: Some(remaining),
                };
                Some(remaining)
            }
            SessionState::Running
            | SessionState::Paused { resume_rest: None }
            | SessionState::Finished => None,
        }
    }

    /// Stamp the end time and convert completed sets into records
    ///
    /// Personal records are judged against `history`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Finished`] if called twice.
    pub fn finish(
        &mut self,
        ended_at: DateTime<Utc>,
        history: &PerformanceHistory,
    ) -> Result<CompletedSession, SessionError> {
        self.ensure_active()?;
        self.state = SessionState::Finished;
        self.ended_at = Some(ended_at);
        Ok(build_completed_session(self, ended_at, history))
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::Finished);
        }
        Ok(())
    }

    fn exercise_mut(&mut self, exercise: usize) -> Result<&mut ActiveExercise, SessionError> {
        self.exercises
            .get_mut(exercise)
            .ok_or(SessionError::NoSuchExercise(exercise))
    }
}

fn set_mut(
    active: &mut ActiveExercise,
    exercise: usize,
    set: usize,
) -> Result<&mut SetEntry, SessionError> {
    active
        .sets
        .get_mut(set)
        .ok_or(SessionError::NoSuchSet { exercise, set })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_day(rest_secs: Option<u32>) -> ActiveWorkoutSession {
        ActiveWorkoutSession::start("Push", vec![bench_press(rest_secs)], Utc::now())
    }

    fn bench_press(rest_secs: Option<u32>) -> PlannedExercise {
        PlannedExercise {
            exercise_id: ExerciseId::new(),
            name: "Bench Press".to_owned(),
            sets: 3,
            reps: 5,
            weight: Some(80.0),
            rest_secs,
        }
    }

    #[test]
    fn test_completing_set_starts_configured_rest() {
        let mut session = push_day(Some(90));
        session.complete_set(0, 0).unwrap();
        assert_eq!(session.state(), SessionState::Resting { remaining_secs: 90 });
    }

    #[test]
    fn test_rest_defaults_to_sixty_seconds() {
        let mut session = ActiveWorkoutSession::start("Push", vec![bench_press(None)], Utc::now());
        session.complete_set(0, 0).unwrap();
        assert_eq!(session.rest_remaining(), Some(60));
    }

    #[test]
    fn test_countdown_reaching_zero_emits_event() {
        let mut session = push_day(Some(2));
        session.complete_set(0, 0).unwrap();
        assert_eq!(session.tick(), None);
        assert_eq!(session.tick(), Some(SessionEvent::RestFinished));
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.elapsed_secs(), 2);
    }

    #[test]
    fn test_pause_freezes_elapsed_and_rest() {
        let mut session = push_day(Some(30));
        session.complete_set(0, 0).unwrap();
        session.tick();
        session.toggle_pause().unwrap();
        for _ in 0..10 {
            assert_eq!(session.tick(), None);
        }
        assert_eq!(session.elapsed_secs(), 1);
        assert_eq!(session.rest_remaining(), Some(29));

        let resumed = session.toggle_pause().unwrap();
        assert_eq!(resumed, SessionState::Resting { remaining_secs: 29 });
    }

    #[test]
    fn test_skip_and_extend_rest() {
        let mut session = push_day(Some(60));
        assert_eq!(session.extend_rest(30), None);
        session.complete_set(0, 0).unwrap();
        assert_eq!(session.extend_rest(30), Some(90));
        assert!(session.skip_rest());
        assert_eq!(session.state(), SessionState::Running);
        assert!(!session.skip_rest());
    }

    #[test]
    fn test_finished_session_rejects_changes() {
        let mut session = ActiveWorkoutSession::start("Push", vec![bench_press(None)], Utc::now());
        session
            .finish(Utc::now(), &PerformanceHistory::default())
            .unwrap();
        assert_eq!(session.complete_set(0, 0), Err(SessionError::Finished));
        assert_eq!(session.toggle_pause(), Err(SessionError::Finished));
        assert_eq!(session.tick(), None);
    }

    #[test]
    fn test_unknown_positions_are_rejected() {
        let mut session = ActiveWorkoutSession::start("Push", vec![bench_press(None)], Utc::now());
        assert_eq!(
            session.complete_set(3, 0),
            Err(SessionError::NoSuchExercise(3))
        );
        assert_eq!(
            session.update_set(0, 7, 50.0, 5),
            Err(SessionError::NoSuchSet {
                exercise: 0,
                set: 7
            })
        );
        assert_eq!(
            session.update_set(0, 0, f64::NAN, 5).map_err(|e| e.to_string()),
            Err("invalid weight NaN".to_owned())
        );
    }
}
