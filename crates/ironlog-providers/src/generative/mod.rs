// ABOUTME: Generative model abstraction for recipe, workout, program, overload and metadata requests
// ABOUTME: Models return raw JSON text; validation and fallbacks live with the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Generative Model
//!
//! The application never trusts a model answer directly. A [`GenerativeModel`]
//! only turns a [`GenerationPrompt`] into JSON text; the intelligence crate
//! validates it and the generation service decides whether to fall back.

/// Google Gemini client
pub mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

use async_trait::async_trait;
use ironlog_core::errors::provider::ProviderResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    /// A single recipe
    Recipe,
    /// A single workout
    Workout,
    /// A multi-week program
    Program,
    /// A progressive-overload adjustment
    Overload,
    /// Metadata for a new exercise
    ExerciseMetadata,
}

impl GenerationKind {
    /// Stable label for logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recipe => "recipe",
            Self::Workout => "workout",
            Self::Program => "program",
            Self::Overload => "overload",
            Self::ExerciseMetadata => "exercise_metadata",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationPrompt {
    /// What is being generated
    pub kind: GenerationKind,
    /// Instructions describing the expected JSON shape
    pub instructions: String,
    /// The request itself, serialized as JSON
    pub input: serde_json::Value,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationPrompt {
    /// Prompt with default sampling
    pub fn new(
        kind: GenerationKind,
        instructions: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            instructions: instructions.into(),
            input,
            temperature: None,
        }
    }

    /// Override the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A model that answers prompts with JSON text
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model family name for logs
    fn name(&self) -> &'static str;

    /// Produce the raw JSON answer for a prompt
    async fn generate_json(&self, prompt: &GenerationPrompt) -> ProviderResult<String>;
}
