// ABOUTME: Single-workout generation: request, model draft validation and catalogue-based fallback
// ABOUTME: Generated exercises are resolved to stable catalogue ids before they are accepted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::{check_range, ValidationError};
use ironlog_core::constants::{generation, workout};
use ironlog_core::models::{
    Equipment, Exercise, ExerciseId, MuscleGroup, PlannedExercise, WorkoutPlan,
};
use serde::{Deserialize, Serialize};

/// Parameters for a generated workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRequest {
    /// Focus keyword (push, pull, legs, upper, lower, core, full body)
    pub focus: String,
    /// Time available
    pub duration_minutes: u32,
    /// Equipment the user has access to; empty means anything
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    /// Known exercises the plan may draw from
    #[serde(default)]
    pub catalogue: Vec<Exercise>,
}

impl WorkoutRequest {
    fn allows(&self, equipment: Equipment) -> bool {
        self.equipment.is_empty() || self.equipment.contains(&equipment)
    }
}

/// One exercise as proposed by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    /// Catalogue id, if the model echoed one back
    #[serde(default)]
    pub exercise_id: Option<ExerciseId>,
    /// Exercise name
    pub name: String,
    /// Working sets
    pub sets: u32,
    /// Reps per set
    pub reps: u32,
    /// Suggested load
    #[serde(default)]
    pub weight: Option<f64>,
    /// Rest between sets
    #[serde(default)]
    pub rest_secs: Option<u32>,
}

/// Workout shape expected from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDraft {
    /// Plan name
    pub name: String,
    /// Exercises in order
    pub exercises: Vec<ExerciseDraft>,
    /// Expected duration
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
}

/// Resolve a drafted exercise against the catalogue
///
/// An echoed id wins when it exists in the catalogue, then a case-insensitive
/// name match. With an empty catalogue any name is accepted under a fresh id.
fn resolve(
    draft: &ExerciseDraft,
    catalogue: &[Exercise],
) -> Result<(ExerciseId, String), ValidationError> {
    if let Some(found) = draft
        .exercise_id
        .and_then(|id| catalogue.iter().find(|e| e.id == id))
    {
        return Ok((found.id, found.name.clone()));
    }
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Missing("exercise name"));
    }
    if let Some(found) = catalogue.iter().find(|e| e.name.eq_ignore_ascii_case(name)) {
        return Ok((found.id, found.name.clone()));
    }
    if catalogue.is_empty() {
        return Ok((ExerciseId::new(), name.to_owned()));
    }
    Err(ValidationError::UnknownValue {
        field: "exercise",
        value: name.to_owned(),
    })
}

/// Validate a list of drafted exercises, shared by workouts and program days
pub(crate) fn validate_exercises(
    drafts: Vec<ExerciseDraft>,
    catalogue: &[Exercise],
) -> Result<Vec<PlannedExercise>, ValidationError> {
    if drafts.is_empty() {
        return Err(ValidationError::Missing("exercises"));
    }
    drafts
        .into_iter()
        .map(|draft| {
            check_range("sets", f64::from(draft.sets), 1.0, f64::from(generation::MAX_SETS))?;
            check_range("reps", f64::from(draft.reps), 1.0, f64::from(generation::MAX_REPS))?;
            if let Some(rest) = draft.rest_secs {
                check_range(
                    "rest_secs",
                    f64::from(rest),
                    0.0,
                    f64::from(generation::MAX_REST_SECS),
                )?;
            }
            if let Some(weight) = draft.weight {
                check_range("weight", weight, 0.0, 1_000.0)?;
            }
            let (exercise_id, name) = resolve(&draft, catalogue)?;
            Ok(PlannedExercise {
                exercise_id,
                name,
                sets: draft.sets,
                reps: draft.reps,
                weight: draft.weight,
                rest_secs: draft.rest_secs,
            })
        })
        .collect()
}

/// Accept a drafted workout
///
/// # Errors
///
/// Returns a [`ValidationError`] if the plan is empty, a value is out of
/// range, or an exercise is not in the catalogue.
pub fn validate_workout(
    draft: WorkoutDraft,
    request: &WorkoutRequest,
    id: String,
) -> Result<WorkoutPlan, ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::Missing("name"));
    }
    let exercises = validate_exercises(draft.exercises, &request.catalogue)?;
    Ok(WorkoutPlan {
        id,
        name: draft.name.trim().to_owned(),
        focus: request.focus.clone(),
        estimated_minutes: draft.estimated_minutes.unwrap_or(request.duration_minutes),
        exercises,
    })
}

/// Muscle groups trained by a focus keyword
#[must_use]
pub fn focus_groups(focus: &str) -> &'static [MuscleGroup] {
    use MuscleGroup::{
        Back, Biceps, Calves, Chest, Core, Glutes, Hamstrings, Quads, Shoulders, Triceps,
    };
    let focus = focus.to_lowercase();
    if focus.contains("push") {
        &[Chest, Shoulders, Triceps]
    } else if focus.contains("pull") {
        &[Back, Biceps]
    } else if focus.contains("leg") || focus.contains("lower") {
        &[Quads, Hamstrings, Glutes, Calves]
    } else if focus.contains("upper") {
        &[Chest, Back, Shoulders, Biceps, Triceps]
    } else if focus.contains("core") || focus.contains("abs") {
        &[Core]
    } else {
        &[Quads, Chest, Back, Hamstrings, Shoulders, Core]
    }
}

fn builtin_name(group: MuscleGroup) -> &'static str {
    match group {
        MuscleGroup::Chest => "Push-up",
        MuscleGroup::Back => "Inverted Row",
        MuscleGroup::Shoulders => "Pike Push-up",
        MuscleGroup::Biceps => "Chin-up",
        MuscleGroup::Triceps => "Bench Dip",
        MuscleGroup::Quads => "Bodyweight Squat",
        MuscleGroup::Hamstrings => "Glute Bridge Walkout",
        MuscleGroup::Glutes => "Glute Bridge",
        MuscleGroup::Calves => "Calf Raise",
        MuscleGroup::Core => "Plank",
        MuscleGroup::FullBody => "Burpee",
    }
}

/// Pick `count` exercises for the given groups, round-robin across groups
///
/// Falls back to any allowed catalogue exercise, then to built-in bodyweight
/// movements when the catalogue cannot fill the slots.
pub(crate) fn pick_exercises(
    groups: &[MuscleGroup],
    count: usize,
    sets: u32,
    reps: u32,
    request: &WorkoutRequest,
) -> Vec<PlannedExercise> {
    let allowed: Vec<&Exercise> = request
        .catalogue
        .iter()
        .filter(|e| request.allows(e.equipment))
        .collect();

    let mut picked: Vec<&Exercise> = Vec::with_capacity(count);
    loop {
        let before = picked.len();
        for group in groups {
            if picked.len() == count {
                break;
            }
            if let Some(exercise) = allowed
                .iter()
                .copied()
                .find(|e| e.muscle_group == *group && !picked.iter().any(|p| p.id == e.id))
            {
                picked.push(exercise);
            }
        }
        if picked.len() == count || picked.len() == before {
            break;
        }
    }
    for exercise in allowed {
        if picked.len() == count {
            break;
        }
        if !picked.iter().any(|p| p.id == exercise.id) {
            picked.push(exercise);
        }
    }

    let mut planned: Vec<PlannedExercise> = picked
        .into_iter()
        .map(|e| PlannedExercise {
            exercise_id: e.id,
            name: e.name.clone(),
            sets,
            reps,
            weight: None,
            rest_secs: Some(e.default_rest_secs.unwrap_or(workout::DEFAULT_REST_SECS)),
        })
        .collect();

    for group in groups.iter().cycle().take(count.saturating_sub(planned.len())) {
        let name = builtin_name(*group);
        if planned.iter().any(|p| p.name == name) {
            continue;
        }
        planned.push(PlannedExercise {
            exercise_id: ExerciseId::new(),
            name: name.to_owned(),
            sets,
            reps,
            weight: None,
            rest_secs: Some(workout::DEFAULT_REST_SECS),
        });
    }
    planned
}

/// Exercises that fit in the available time, between 3 and 8
#[must_use]
pub fn exercise_count(duration_minutes: u32) -> usize {
    (duration_minutes / 10).clamp(3, 8) as usize
}

/// Deterministic workout drawn from the catalogue for the requested focus
#[must_use]
pub fn fallback_workout(request: &WorkoutRequest, id: String) -> WorkoutPlan {
    let groups = focus_groups(&request.focus);
    let exercises = pick_exercises(
        groups,
        exercise_count(request.duration_minutes),
        3,
        workout::DEFAULT_SET_REPS,
        request,
    );
    let focus = if request.focus.trim().is_empty() {
        "full body".to_owned()
    } else {
        request.focus.trim().to_owned()
    };
    WorkoutPlan {
        id,
        name: format!("{} workout", capitalize(&focus)),
        focus,
        exercises,
        estimated_minutes: request.duration_minutes,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
