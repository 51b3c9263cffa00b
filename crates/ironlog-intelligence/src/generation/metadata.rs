// ABOUTME: Exercise metadata suggestions for user-created exercises
// ABOUTME: Model answers are checked against the known vocabularies; fallback matches name keywords
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::{check_range, ValidationError};
use ironlog_core::constants::{generation, workout};
use ironlog_core::models::{Equipment, MuscleGroup};
use serde::{Deserialize, Serialize};

/// Rest suggested for heavy barbell compounds
const COMPOUND_REST_SECS: u32 = 120;

/// Metadata attached to a new exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseMetadata {
    /// Primary muscle group
    pub muscle_group: MuscleGroup,
    /// Required equipment
    pub equipment: Equipment,
    /// Suggested rest between sets
    pub default_rest_secs: u32,
    /// Coaching notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Metadata shape expected from the model, with free-text vocabularies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDraft {
    /// Muscle group name
    pub muscle_group: String,
    /// Equipment name
    pub equipment: String,
    /// Suggested rest
    #[serde(default)]
    pub rest_secs: Option<u32>,
    /// Coaching notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Map a draft onto the known vocabularies
///
/// # Errors
///
/// Returns [`ValidationError::UnknownValue`] for a muscle group or equipment
/// outside the vocabulary, or [`ValidationError::OutOfRange`] for an absurd rest.
pub fn validate_metadata(draft: MetadataDraft) -> Result<ExerciseMetadata, ValidationError> {
    let muscle_group =
        MuscleGroup::parse(&draft.muscle_group).ok_or_else(|| ValidationError::UnknownValue {
            field: "muscle_group",
            value: draft.muscle_group.clone(),
        })?;
    let equipment =
        Equipment::parse(&draft.equipment).ok_or_else(|| ValidationError::UnknownValue {
            field: "equipment",
            value: draft.equipment.clone(),
        })?;
    let default_rest_secs = draft.rest_secs.unwrap_or(workout::DEFAULT_REST_SECS);
    check_range(
        "rest_secs",
        f64::from(default_rest_secs),
        0.0,
        f64::from(generation::MAX_REST_SECS),
    )?;
    Ok(ExerciseMetadata {
        muscle_group,
        equipment,
        default_rest_secs,
        notes: draft.notes.filter(|n| !n.trim().is_empty()),
    })
}

const MUSCLE_KEYWORDS: &[(&str, MuscleGroup)] = &[
    ("bench", MuscleGroup::Chest),
    ("chest", MuscleGroup::Chest),
    ("fly", MuscleGroup::Chest),
    ("push-up", MuscleGroup::Chest),
    ("pushup", MuscleGroup::Chest),
    ("squat", MuscleGroup::Quads),
    ("lunge", MuscleGroup::Quads),
    ("leg press", MuscleGroup::Quads),
    ("leg extension", MuscleGroup::Quads),
    ("romanian", MuscleGroup::Hamstrings),
    ("leg curl", MuscleGroup::Hamstrings),
    ("hamstring", MuscleGroup::Hamstrings),
    ("deadlift", MuscleGroup::Back),
    ("row", MuscleGroup::Back),
    ("pull-up", MuscleGroup::Back),
    ("pullup", MuscleGroup::Back),
    ("pulldown", MuscleGroup::Back),
    ("chin", MuscleGroup::Biceps),
    ("curl", MuscleGroup::Biceps),
    ("overhead press", MuscleGroup::Shoulders),
    ("shoulder", MuscleGroup::Shoulders),
    ("lateral raise", MuscleGroup::Shoulders),
    ("pushdown", MuscleGroup::Triceps),
    ("tricep", MuscleGroup::Triceps),
    ("dip", MuscleGroup::Triceps),
    ("skull", MuscleGroup::Triceps),
    ("hip thrust", MuscleGroup::Glutes),
    ("glute", MuscleGroup::Glutes),
    ("calf", MuscleGroup::Calves),
    ("plank", MuscleGroup::Core),
    ("crunch", MuscleGroup::Core),
    ("sit-up", MuscleGroup::Core),
    ("clean", MuscleGroup::FullBody),
    ("snatch", MuscleGroup::FullBody),
    ("burpee", MuscleGroup::FullBody),
];

const EQUIPMENT_KEYWORDS: &[(&str, Equipment)] = &[
    ("dumbbell", Equipment::Dumbbell),
    ("db ", Equipment::Dumbbell),
    ("kettlebell", Equipment::Kettlebell),
    ("cable", Equipment::Cable),
    ("pushdown", Equipment::Cable),
    ("pulldown", Equipment::Cable),
    ("machine", Equipment::Machine),
    ("leg press", Equipment::Machine),
    ("leg curl", Equipment::Machine),
    ("leg extension", Equipment::Machine),
    ("band", Equipment::Band),
    ("push-up", Equipment::Bodyweight),
    ("pushup", Equipment::Bodyweight),
    ("pull-up", Equipment::Bodyweight),
    ("pullup", Equipment::Bodyweight),
    ("chin", Equipment::Bodyweight),
    ("dip", Equipment::Bodyweight),
    ("plank", Equipment::Bodyweight),
    ("crunch", Equipment::Bodyweight),
    ("burpee", Equipment::Bodyweight),
    ("barbell", Equipment::Barbell),
];

/// Keyword-based metadata guess from the exercise name
///
/// Unmatched names default to a full-body barbell movement.
#[must_use]
pub fn fallback_metadata(name: &str) -> ExerciseMetadata {
    let lower = format!("{} ", name.to_lowercase());
    let muscle_group = MUSCLE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(MuscleGroup::FullBody, |(_, group)| *group);
    let equipment = EQUIPMENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(Equipment::Barbell, |(_, equipment)| *equipment);

    let compound = equipment == Equipment::Barbell
        && matches!(
            muscle_group,
            MuscleGroup::Chest
                | MuscleGroup::Back
                | MuscleGroup::Quads
                | MuscleGroup::Hamstrings
                | MuscleGroup::Shoulders
                | MuscleGroup::FullBody
        );
    ExerciseMetadata {
        muscle_group,
        equipment,
        default_rest_secs: if compound {
            COMPOUND_REST_SECS
        } else {
            workout::DEFAULT_REST_SECS
        },
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_vocabulary_is_rejected() {
        let draft = MetadataDraft {
            muscle_group: "forearms-ish".to_owned(),
            equipment: "barbell".to_owned(),
            rest_secs: None,
            notes: None,
        };
        assert!(matches!(
            validate_metadata(draft),
            Err(ValidationError::UnknownValue {
                field: "muscle_group",
                ..
            })
        ));
    }

    #[test]
    fn test_keyword_fallback() {
        let incline = fallback_metadata("Incline Dumbbell Bench");
        assert_eq!(incline.muscle_group, MuscleGroup::Chest);
        assert_eq!(incline.equipment, Equipment::Dumbbell);
        assert_eq!(incline.default_rest_secs, workout::DEFAULT_REST_SECS);

        let squat = fallback_metadata("Back Squat");
        assert_eq!(squat.muscle_group, MuscleGroup::Quads);
        assert_eq!(squat.equipment, Equipment::Barbell);
        assert_eq!(squat.default_rest_secs, COMPOUND_REST_SECS);
    }
}
