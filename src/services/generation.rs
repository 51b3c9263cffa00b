// ABOUTME: Generated content service: ask the model, validate, fall back to local generators
// ABOUTME: Recipes, workouts, programs, overload adjustments and exercise metadata never fail outright
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Generation Service
//!
//! Every request follows the same path: build a prompt, call the model,
//! parse the JSON answer, validate it. Any failure along the way is logged
//! and the deterministic fallback generator answers instead. Callers can
//! tell the two apart through [`Generated::source`].

use ironlog_core::constants::generation::RECIPE_CALORIE_TOLERANCE;
use ironlog_core::models::{Program, Recipe, WorkoutPlan};
use ironlog_intelligence::generation::metadata::{
    fallback_metadata, validate_metadata, ExerciseMetadata,
};
use ironlog_intelligence::generation::overload::{
    fallback_overload, validate_overload, OverloadDraft, OverloadRequest,
};
use ironlog_intelligence::generation::program::{
    fallback_program, validate_program, ProgramDraft, ProgramRequest,
};
use ironlog_intelligence::generation::recipe::{
    fallback_recipe, validate_recipe, RecipeDraft, RecipeRequest,
};
use ironlog_intelligence::generation::workout::{
    fallback_workout, validate_workout, WorkoutDraft, WorkoutRequest,
};
use ironlog_intelligence::generation::{parse_response, Generated, ValidationError};
use ironlog_intelligence::progression::ProgressionAdjustment;
use ironlog_providers::{GenerationKind, GenerationPrompt, GenerativeModel};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

const RECIPE_INSTRUCTIONS: &str = "Create one recipe as JSON with fields title, servings, \
calories, protein_g, carbs_g, fat_g (per serving), ingredients [{name, quantity, unit}], \
steps [string], prep_minutes, tags [string]. Stay close to target_calories.";

const WORKOUT_INSTRUCTIONS: &str = "Create one workout as JSON with fields name, \
estimated_minutes and exercises [{exercise_id, name, sets, reps, weight, rest_secs}]. \
Only use exercises from the catalogue and the listed equipment.";

const PROGRAM_INSTRUCTIONS: &str = "Create a training program as JSON with fields name, weeks, \
days_per_week and schedule [{week, days [{day, name, exercises [{exercise_id, name, sets, \
reps, weight, rest_secs}]}]}]. The schedule must contain exactly `weeks` weeks of \
`days_per_week` days.";

const OVERLOAD_INSTRUCTIONS: &str = "Suggest the next progressive-overload step as JSON with \
fields weight_change_kg, rep_change and rationale, based on the recent sessions.";

const METADATA_INSTRUCTIONS: &str = "Describe the exercise as JSON with fields muscle_group \
(chest, back, shoulders, biceps, triceps, quads, hamstrings, glutes, calves, core, full_body), \
equipment (barbell, dumbbell, cable, machine, kettlebell, bodyweight, band), rest_secs and notes.";

/// Model-first content generation with local fallbacks
#[derive(Clone)]
pub struct GenerationService {
    model: Option<Arc<dyn GenerativeModel>>,
    calorie_tolerance: f64,
}

impl GenerationService {
    /// Service using `model`, or only the fallbacks when `None`
    #[must_use]
    pub fn new(model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self {
            model,
            calorie_tolerance: RECIPE_CALORIE_TOLERANCE,
        }
    }

    /// Accepted recipe calorie deviation as a fraction of the target
    #[must_use]
    pub const fn with_calorie_tolerance(mut self, tolerance: f64) -> Self {
        self.calorie_tolerance = tolerance;
        self
    }

    /// Whether a model is configured
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// A recipe near the requested calories
    pub async fn recipe(&self, request: &RecipeRequest) -> Generated<Recipe> {
        let id = Uuid::new_v4().to_string();
        let tolerance = self.calorie_tolerance;
        let accepted = self
            .attempt(
                GenerationKind::Recipe,
                RECIPE_INSTRUCTIONS,
                request,
                |draft: RecipeDraft| validate_recipe(draft, request, tolerance, id.clone()),
            )
            .await;
        accepted.map_or_else(
            || Generated::from_fallback(fallback_recipe(request, id.clone())),
            Generated::from_model,
        )
    }

    /// A single workout for the requested focus and duration
    pub async fn workout(&self, request: &WorkoutRequest) -> Generated<WorkoutPlan> {
        let id = Uuid::new_v4().to_string();
        let accepted = self
            .attempt(
                GenerationKind::Workout,
                WORKOUT_INSTRUCTIONS,
                request,
                |draft: WorkoutDraft| validate_workout(draft, request, id.clone()),
            )
            .await;
        accepted.map_or_else(
            || Generated::from_fallback(fallback_workout(request, id.clone())),
            Generated::from_model,
        )
    }

    /// A multi-week program
    pub async fn program(&self, request: &ProgramRequest) -> Generated<Program> {
        let id = Uuid::new_v4().to_string();
        let accepted = self
            .attempt(
                GenerationKind::Program,
                PROGRAM_INSTRUCTIONS,
                request,
                |draft: ProgramDraft| validate_program(draft, request, id.clone()),
            )
            .await;
        accepted.map_or_else(
            || Generated::from_fallback(fallback_program(request, id.clone())),
            Generated::from_model,
        )
    }

    /// The next load change for one exercise
    pub async fn overload(&self, request: &OverloadRequest) -> Generated<ProgressionAdjustment> {
        let accepted = self
            .attempt(
                GenerationKind::Overload,
                OVERLOAD_INSTRUCTIONS,
                request,
                |draft: OverloadDraft| validate_overload(draft, request),
            )
            .await;
        accepted.map_or_else(
            || Generated::from_fallback(fallback_overload(request)),
            Generated::from_model,
        )
    }

    /// Muscle group, equipment and rest for a new exercise
    pub async fn exercise_metadata(&self, name: &str) -> Generated<ExerciseMetadata> {
        let accepted = self
            .attempt(
                GenerationKind::ExerciseMetadata,
                METADATA_INSTRUCTIONS,
                &json!({ "name": name }),
                validate_metadata,
            )
            .await;
        accepted.map_or_else(
            || Generated::from_fallback(fallback_metadata(name)),
            Generated::from_model,
        )
    }

    /// Call the model and validate its answer; `None` means use the fallback
    async fn attempt<R, D, T, F>(
        &self,
        kind: GenerationKind,
        instructions: &str,
        request: &R,
        validate: F,
    ) -> Option<T>
    where
        R: Serialize + Sync + ?Sized,
        D: DeserializeOwned,
        F: FnOnce(D) -> Result<T, ValidationError>,
    {
        let Some(model) = &self.model else {
            debug!(kind = %kind, "No generative model configured, using fallback");
            return None;
        };

        let input = match serde_json::to_value(request) {
            Ok(input) => input,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Failed to encode generation request");
                return None;
            }
        };
        let prompt = GenerationPrompt::new(kind, instructions, input);

        let raw = match model.generate_json(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    kind = %kind,
                    model = model.name(),
                    error = %e,
                    retryable = e.is_retryable(),
                    "Generation failed, using fallback"
                );
                return None;
            }
        };

        match parse_response::<D>(&raw).and_then(validate) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(kind = %kind, error = %e, "Generated content rejected, using fallback");
                None
            }
        }
    }
}
