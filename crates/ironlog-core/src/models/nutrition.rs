// ABOUTME: Nutrition tracking models for food intake
// ABOUTME: FoodItem (per 100 g composition), FoodLogEntry, and MealType definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type of meal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast meal
    Breakfast,
    /// Lunch meal
    Lunch,
    /// Dinner meal
    Dinner,
    /// Snack between meals
    Snack,
    /// Unspecified or other meal type
    Other,
}

impl MealType {
    /// Parse meal type from string
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "dinner" => Self::Dinner,
            "snack" => Self::Snack,
            _ => Self::Other,
        }
    }
}

/// Food composition record returned by a food database search or barcode lookup
///
/// Nutrient values are per 100 g of product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Barcode or database identifier, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Product name
    pub name: String,
    /// Brand name (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Energy in kcal per 100 g
    pub calories_per_100g: f64,
    /// Protein in grams per 100 g
    pub protein_per_100g: f64,
    /// Carbohydrates in grams per 100 g
    pub carbs_per_100g: f64,
    /// Fat in grams per 100 g
    pub fat_per_100g: f64,
    /// Typical serving size in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size_g: Option<f64>,
}

impl FoodItem {
    /// Build a log entry for `grams` of this food
    #[must_use]
    pub fn portion(
        &self,
        id: String,
        meal_type: MealType,
        grams: f64,
        logged_at: DateTime<Utc>,
    ) -> FoodLogEntry {
        let factor = grams / 100.0;
        FoodLogEntry {
            id,
            logged_at,
            meal_type,
            food_name: self.name.clone(),
            grams,
            calories: self.calories_per_100g * factor,
            protein_g: self.protein_per_100g * factor,
            carbs_g: self.carbs_per_100g * factor,
            fat_g: self.fat_per_100g * factor,
        }
    }
}

/// One logged portion of food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLogEntry {
    /// Unique identifier
    pub id: String,
    /// When the food was eaten
    pub logged_at: DateTime<Utc>,
    /// Meal slot
    pub meal_type: MealType,
    /// Food name (display only)
    pub food_name: String,
    /// Portion size in grams
    pub grams: f64,
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
}
