// ABOUTME: Recipe models for generated and saved meals
// ABOUTME: Recipe with per-serving macros, ingredients and preparation steps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use serde::{Deserialize, Serialize};

/// Ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Ingredient name
    pub name: String,
    /// Amount in `unit`
    pub quantity: f64,
    /// Unit of measure (g, ml, piece, tbsp...)
    pub unit: String,
}

/// A recipe with per-serving nutrition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: String,
    /// Recipe title
    pub title: String,
    /// Number of servings produced
    pub servings: u32,
    /// Energy per serving in kcal
    pub calories: f64,
    /// Protein per serving in grams
    pub protein_g: f64,
    /// Carbohydrates per serving in grams
    pub carbs_g: f64,
    /// Fat per serving in grams
    pub fat_g: f64,
    /// Ingredient list
    pub ingredients: Vec<RecipeIngredient>,
    /// Preparation steps, in order
    pub steps: Vec<String>,
    /// Total preparation time in minutes
    pub prep_minutes: u32,
    /// Free-form tags (high-protein, vegetarian...)
    #[serde(default)]
    pub tags: Vec<String>,
}
