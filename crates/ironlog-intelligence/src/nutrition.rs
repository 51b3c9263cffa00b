// ABOUTME: Daily nutrition totals from logged food entries
// ABOUTME: Calorie and macro sums per day with optional target comparison
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::NaiveDate;
use ironlog_core::models::FoodLogEntry;
use serde::{Deserialize, Serialize};

/// Totals for a single day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyNutrition {
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
    /// Number of entries counted
    pub entries: usize,
}

impl DailyNutrition {
    /// Calories left (negative when over) against a target
    #[must_use]
    pub fn remaining_calories(&self, target: f64) -> f64 {
        target - self.calories
    }
}

/// Sum every entry logged on `day` (UTC date)
#[must_use]
pub fn summarize_day(entries: &[FoodLogEntry], day: NaiveDate) -> DailyNutrition {
    entries
        .iter()
        .filter(|e| e.logged_at.date_naive() == day)
        .fold(DailyNutrition::default(), |acc, e| DailyNutrition {
            calories: acc.calories + e.calories,
            protein_g: acc.protein_g + e.protein_g,
            carbs_g: acc.carbs_g + e.carbs_g,
            fat_g: acc.fat_g + e.fat_g,
            entries: acc.entries + 1,
        })
}
