// ABOUTME: Validation of generated content and deterministic local fallbacks
// ABOUTME: Recipes, workouts, programs, overload adjustments and exercise metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Generated Content
//!
//! The generative model answers with JSON. Each submodule defines the request
//! the application sends, the draft shape it expects back, a validator that
//! turns a draft into a domain model (or rejects it), and a fallback generator
//! producing an acceptable result with no network access.
//!
//! Validation never panics and never partially accepts: a draft is either
//! converted in full or discarded.

/// Exercise metadata suggestions
pub mod metadata;
/// Progressive-overload adjustments
pub mod overload;
/// Multi-week programs
pub mod program;
/// Recipes
pub mod recipe;
/// Single workouts
pub mod workout;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a generated value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    /// Accepted model output
    Model,
    /// Local deterministic generator
    Fallback,
}

/// A generated value tagged with its source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generated<T> {
    /// The value
    pub value: T,
    /// Where it came from
    pub source: GenerationSource,
}

impl<T> Generated<T> {
    /// Value produced by the model
    pub const fn from_model(value: T) -> Self {
        Self {
            value,
            source: GenerationSource::Model,
        }
    }

    /// Value produced locally
    pub const fn from_fallback(value: T) -> Self {
        Self {
            value,
            source: GenerationSource::Fallback,
        }
    }

    /// Whether the fallback generator was used
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == GenerationSource::Fallback
    }
}

/// Why a model response was discarded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Response was not the expected JSON shape
    #[error("malformed response: {0}")]
    Malformed(String),
    /// A required list or field was empty
    #[error("missing content: {0}")]
    Missing(&'static str),
    /// A numeric field is outside its accepted range
    #[error("{field} out of range: {value}")]
    OutOfRange {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f64,
    },
    /// A value is not part of the known vocabulary
    #[error("unknown {field}: {value}")]
    UnknownValue {
        /// Field name
        field: &'static str,
        /// Offending value
        value: String,
    },
}

/// Parse a model response, tolerating a surrounding markdown code fence
///
/// # Errors
///
/// Returns [`ValidationError::Malformed`] if the body is not valid JSON for `T`.
pub fn parse_response<T: DeserializeOwned>(raw: &str) -> Result<T, ValidationError> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|e| ValidationError::Malformed(e.to_string()))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Reject values outside `min..=max`
pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_fence_is_stripped() {
        let raw = "```json\n{\"a\": 1}\n```";
        let value: serde_json::Value = parse_response(raw).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let result: Result<serde_json::Value, _> = parse_response("Sure! Here is a recipe");
        assert!(matches!(result, Err(ValidationError::Malformed(_))));
    }
}
