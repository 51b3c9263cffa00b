// ABOUTME: Multi-week program generation with schedule shape validation
// ABOUTME: Fallback builds a linear program from a split template with periodic deload weeks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::workout::{
    exercise_count, focus_groups, pick_exercises, validate_exercises, ExerciseDraft,
    WorkoutRequest,
};
use super::{check_range, ValidationError};
use ironlog_core::constants::generation;
use ironlog_core::models::{Equipment, Exercise, Program, ProgramDay, ProgramWeek};
use serde::{Deserialize, Serialize};

/// Every fourth week is a deload week in generated programs
const DELOAD_EVERY_WEEKS: u32 = 4;

/// Session length assumed when picking exercises for a program day
const PROGRAM_DAY_MINUTES: u32 = 50;

/// Parameters for a generated program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRequest {
    /// Goal keyword (strength, hypertrophy, endurance)
    pub goal: String,
    /// Program length
    pub weeks: u32,
    /// Training days per week
    pub days_per_week: u32,
    /// Available equipment; empty means anything
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    /// Known exercises
    #[serde(default)]
    pub catalogue: Vec<Exercise>,
}

/// One day as proposed by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDayDraft {
    /// Day number within the week
    pub day: u32,
    /// Day label
    pub name: String,
    /// Exercises
    pub exercises: Vec<ExerciseDraft>,
}

/// One week as proposed by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramWeekDraft {
    /// Week number
    pub week: u32,
    /// Days
    pub days: Vec<ProgramDayDraft>,
}

/// Program shape expected from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDraft {
    /// Program name
    pub name: String,
    /// Weeks
    pub weeks: u32,
    /// Training days per week
    pub days_per_week: u32,
    /// Week-by-week schedule
    pub schedule: Vec<ProgramWeekDraft>,
}

/// Accept a drafted program if its schedule matches its declared shape
///
/// # Errors
///
/// Returns a [`ValidationError`] when the week or day counts are out of range,
/// the schedule does not have the declared number of weeks and days, or any
/// day fails exercise validation.
pub fn validate_program(
    draft: ProgramDraft,
    request: &ProgramRequest,
    id: String,
) -> Result<Program, ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::Missing("name"));
    }
    check_range(
        "weeks",
        f64::from(draft.weeks),
        1.0,
        f64::from(generation::MAX_PROGRAM_WEEKS),
    )?;
    check_range("days_per_week", f64::from(draft.days_per_week), 1.0, 7.0)?;
    if draft.schedule.len() != draft.weeks as usize {
        return Err(ValidationError::OutOfRange {
            field: "schedule weeks",
            value: draft.schedule.len() as f64,
        });
    }

    let mut schedule = Vec::with_capacity(draft.schedule.len());
    for week in draft.schedule {
        if week.days.len() != draft.days_per_week as usize {
            return Err(ValidationError::OutOfRange {
                field: "schedule days",
                value: week.days.len() as f64,
            });
        }
        let mut days = Vec::with_capacity(week.days.len());
        for day in week.days {
            days.push(ProgramDay {
                day: day.day,
                name: day.name,
                exercises: validate_exercises(day.exercises, &request.catalogue)?,
            });
        }
        schedule.push(ProgramWeek {
            week: week.week,
            days,
        });
    }

    Ok(Program {
        id,
        name: draft.name.trim().to_owned(),
        goal: request.goal.clone(),
        weeks: draft.weeks,
        days_per_week: draft.days_per_week,
        schedule,
    })
}

/// Sets and reps for a goal keyword
#[must_use]
pub fn goal_volume(goal: &str) -> (u32, u32) {
    let goal = goal.to_lowercase();
    if goal.contains("strength") {
        (5, 5)
    } else if goal.contains("endurance") {
        (3, 15)
    } else {
        (4, 10)
    }
}

/// Day focuses for a weekly frequency
#[must_use]
pub fn split_for(days_per_week: u32) -> &'static [&'static str] {
    match days_per_week {
        0 | 1 => &["full body"],
        2 => &["upper", "lower"],
        3 => &["push", "pull", "legs"],
        4 => &["upper", "lower", "upper", "lower"],
        5 => &["push", "pull", "legs", "upper", "lower"],
        6 => &["push", "pull", "legs", "push", "pull", "legs"],
        _ => &["push", "pull", "legs", "push", "pull", "legs", "full body"],
    }
}

/// Linear program built from a split template
///
/// Week and day counts are clamped to their valid ranges. Every fourth week
/// drops one set per exercise.
#[must_use]
pub fn fallback_program(request: &ProgramRequest, id: String) -> Program {
    let weeks = request.weeks.clamp(1, generation::MAX_PROGRAM_WEEKS);
    let days_per_week = request.days_per_week.clamp(1, 7);
    let (sets, reps) = goal_volume(&request.goal);
    let split = split_for(days_per_week);

    let template: Vec<ProgramDay> = split
        .iter()
        .zip(1..)
        .map(|(focus, day)| {
            let day_request = WorkoutRequest {
                focus: (*focus).to_owned(),
                duration_minutes: PROGRAM_DAY_MINUTES,
                equipment: request.equipment.clone(),
                catalogue: request.catalogue.clone(),
            };
            ProgramDay {
                day,
                name: format!("Day {day}: {focus}"),
                exercises: pick_exercises(
                    focus_groups(focus),
                    exercise_count(PROGRAM_DAY_MINUTES),
                    sets,
                    reps,
                    &day_request,
                ),
            }
        })
        .collect();

    let schedule = (1..=weeks)
        .map(|week| {
            let deload = week % DELOAD_EVERY_WEEKS == 0;
            let days = template
                .iter()
                .map(|day| {
                    let mut day = day.clone();
                    if deload {
                        for exercise in &mut day.exercises {
                            exercise.sets = exercise.sets.saturating_sub(1).max(1);
                        }
                    }
                    day
                })
                .collect();
            ProgramWeek { week, days }
        })
        .collect();

    let goal = if request.goal.trim().is_empty() {
        "hypertrophy".to_owned()
    } else {
        request.goal.trim().to_owned()
    };
    Program {
        id,
        name: format!("{weeks}-week {goal} program"),
        goal,
        weeks,
        days_per_week,
        schedule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(goal: &str, weeks: u32, days: u32) -> ProgramRequest {
        ProgramRequest {
            goal: goal.to_owned(),
            weeks,
            days_per_week: days,
            equipment: Vec::new(),
            catalogue: Vec::new(),
        }
    }

    #[test]
    fn test_fallback_shape_matches_request() {
        let program = fallback_program(&request("strength", 8, 3), "p1".to_owned());
        assert_eq!(program.schedule.len(), 8);
        assert!(program.schedule.iter().all(|w| w.days.len() == 3));
        let first = &program.schedule[0].days[0].exercises[0];
        assert_eq!((first.sets, first.reps), (5, 5));
    }

    #[test]
    fn test_every_fourth_week_is_a_deload() {
        let program = fallback_program(&request("hypertrophy", 4, 2), "p2".to_owned());
        assert_eq!(program.schedule[0].days[0].exercises[0].sets, 4);
        assert_eq!(program.schedule[3].days[0].exercises[0].sets, 3);
    }

    #[test]
    fn test_fallback_clamps_out_of_range_requests() {
        let program = fallback_program(&request("endurance", 40, 9), "p3".to_owned());
        assert_eq!(program.weeks, generation::MAX_PROGRAM_WEEKS);
        assert_eq!(program.days_per_week, 7);
    }

    #[test]
    fn test_draft_with_mismatched_schedule_is_rejected() {
        let draft = ProgramDraft {
            name: "Block".to_owned(),
            weeks: 2,
            days_per_week: 3,
            schedule: vec![ProgramWeekDraft {
                week: 1,
                days: Vec::new(),
            }],
        };
        assert!(matches!(
            validate_program(draft, &request("strength", 2, 3), "p4".to_owned()),
            Err(ValidationError::OutOfRange {
                field: "schedule weeks",
                ..
            })
        ));
    }
}
