// ABOUTME: Exercise catalogue model with a stable identifier
// ABOUTME: Names are display-only; history and records are keyed by ExerciseId
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable exercise identifier
///
/// Renaming an exercise never changes its id, so performance history and
/// personal records stay attached to the right movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub Uuid);

impl ExerciseId {
    /// Generate a new random identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExerciseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Primary muscle group trained by an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    /// Pectorals
    Chest,
    /// Lats, traps, rhomboids
    Back,
    /// Deltoids
    Shoulders,
    /// Biceps
    Biceps,
    /// Triceps
    Triceps,
    /// Quadriceps
    Quads,
    /// Hamstrings
    Hamstrings,
    /// Glutes
    Glutes,
    /// Calves
    Calves,
    /// Abdominals and obliques
    Core,
    /// Compound or whole-body movement
    FullBody,
}

impl MuscleGroup {
    /// Every known muscle group
    pub const ALL: [Self; 11] = [
        Self::Chest,
        Self::Back,
        Self::Shoulders,
        Self::Biceps,
        Self::Triceps,
        Self::Quads,
        Self::Hamstrings,
        Self::Glutes,
        Self::Calves,
        Self::Core,
        Self::FullBody,
    ];

    /// Parse a muscle group, returning `None` for unknown values
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "chest" | "pecs" => Some(Self::Chest),
            "back" | "lats" => Some(Self::Back),
            "shoulders" | "delts" => Some(Self::Shoulders),
            "biceps" => Some(Self::Biceps),
            "triceps" => Some(Self::Triceps),
            "quads" | "quadriceps" => Some(Self::Quads),
            "hamstrings" => Some(Self::Hamstrings),
            "glutes" => Some(Self::Glutes),
            "calves" => Some(Self::Calves),
            "core" | "abs" => Some(Self::Core),
            "full_body" | "fullbody" => Some(Self::FullBody),
            _ => None,
        }
    }
}

/// Equipment needed for an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    /// Barbell (plate-loaded)
    Barbell,
    /// Dumbbells
    Dumbbell,
    /// Cable stack
    Cable,
    /// Selectorized or plate-loaded machine
    Machine,
    /// Kettlebell
    Kettlebell,
    /// No equipment
    Bodyweight,
    /// Resistance band
    Band,
}

impl Equipment {
    /// Parse equipment, returning `None` for unknown values
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "barbell" => Some(Self::Barbell),
            "dumbbell" | "dumbbells" => Some(Self::Dumbbell),
            "cable" | "cables" => Some(Self::Cable),
            "machine" => Some(Self::Machine),
            "kettlebell" => Some(Self::Kettlebell),
            "bodyweight" | "none" => Some(Self::Bodyweight),
            "band" | "bands" => Some(Self::Band),
            _ => None,
        }
    }
}

/// Exercise catalogue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Stable identifier
    pub id: ExerciseId,
    /// Display name
    pub name: String,
    /// Primary muscle group
    pub muscle_group: MuscleGroup,
    /// Required equipment
    pub equipment: Equipment,
    /// Rest between sets, when configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rest_secs: Option<u32>,
    /// Free-form coaching notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
