// ABOUTME: Recipe request, model draft validation, and the template-based fallback recipe
// ABOUTME: Drafts outside the calorie tolerance of the request are discarded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::{check_range, ValidationError};
use ironlog_core::models::{MealType, Recipe, RecipeIngredient};
use serde::{Deserialize, Serialize};

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRequest {
    /// Target energy per serving in kcal
    pub target_calories: f64,
    /// Meal slot the recipe is for
    pub meal_type: MealType,
    /// Dietary tags (vegetarian, vegan, high-protein...)
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    /// Servings to produce
    pub servings: u32,
}

impl RecipeRequest {
    fn has_tag(&self, tag: &str) -> bool {
        self.dietary_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

const fn default_servings() -> u32 {
    1
}

/// Recipe shape expected from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    /// Title
    pub title: String,
    /// Servings
    #[serde(default = "default_servings")]
    pub servings: u32,
    /// Energy per serving
    pub calories: f64,
    /// Protein per serving
    pub protein_g: f64,
    /// Carbohydrates per serving
    pub carbs_g: f64,
    /// Fat per serving
    pub fat_g: f64,
    /// Ingredients
    pub ingredients: Vec<RecipeIngredient>,
    /// Steps
    pub steps: Vec<String>,
    /// Preparation time
    #[serde(default)]
    pub prep_minutes: u32,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Accept a draft only if it is complete and its calories are within
/// `tolerance` (a fraction, e.g. 0.25) of the requested target
///
/// # Errors
///
/// Returns a [`ValidationError`] describing the first problem found.
pub fn validate_recipe(
    draft: RecipeDraft,
    request: &RecipeRequest,
    tolerance: f64,
    id: String,
) -> Result<Recipe, ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::Missing("title"));
    }
    if draft.ingredients.is_empty() {
        return Err(ValidationError::Missing("ingredients"));
    }
    if draft.steps.iter().all(|s| s.trim().is_empty()) {
        return Err(ValidationError::Missing("steps"));
    }
    check_range("servings", f64::from(draft.servings), 1.0, 12.0)?;

    let low = request.target_calories * (1.0 - tolerance);
    let high = request.target_calories * (1.0 + tolerance);
    check_range("calories", draft.calories, low, high)?;
    for (field, value) in [
        ("protein_g", draft.protein_g),
        ("carbs_g", draft.carbs_g),
        ("fat_g", draft.fat_g),
    ] {
        check_range(field, value, 0.0, draft.calories)?;
    }
    for ingredient in &draft.ingredients {
        check_range("ingredient quantity", ingredient.quantity, 0.0, 10_000.0)?;
    }

    Ok(Recipe {
        id,
        title: draft.title.trim().to_owned(),
        servings: draft.servings,
        calories: draft.calories,
        protein_g: draft.protein_g,
        carbs_g: draft.carbs_g,
        fat_g: draft.fat_g,
        ingredients: draft.ingredients,
        steps: draft.steps,
        prep_minutes: draft.prep_minutes,
        tags: draft.tags,
    })
}

/// Ingredient composition per 100 g: (name, grams, kcal, protein, carbs, fat)
type TemplateIngredient = (&'static str, f64, f64, f64, f64, f64);

const OATS: TemplateIngredient = ("Rolled oats", 60.0, 389.0, 16.9, 66.3, 6.9);
const GREEK_YOGURT: TemplateIngredient = ("Greek yogurt", 150.0, 59.0, 10.0, 3.6, 0.4);
const SOY_YOGURT: TemplateIngredient = ("Soy yogurt", 150.0, 54.0, 3.3, 4.0, 2.7);
const BANANA: TemplateIngredient = ("Banana", 100.0, 89.0, 1.1, 22.8, 0.3);
const CHICKEN: TemplateIngredient = ("Chicken breast", 150.0, 165.0, 31.0, 0.0, 3.6);
const TOFU: TemplateIngredient = ("Firm tofu", 200.0, 76.0, 8.0, 1.9, 4.8);
const RICE: TemplateIngredient = ("Cooked rice", 200.0, 130.0, 2.7, 28.0, 0.3);
const BROCCOLI: TemplateIngredient = ("Broccoli", 150.0, 34.0, 2.8, 7.0, 0.4);
const OLIVE_OIL: TemplateIngredient = ("Olive oil", 10.0, 884.0, 0.0, 0.0, 100.0);
const ALMONDS: TemplateIngredient = ("Almonds", 20.0, 579.0, 21.0, 22.0, 50.0);
const BERRIES: TemplateIngredient = ("Mixed berries", 100.0, 57.0, 0.7, 14.5, 0.3);

fn template(request: &RecipeRequest) -> (&'static str, Vec<TemplateIngredient>, Vec<&'static str>) {
    let plant_based = request.has_tag("vegan") || request.has_tag("vegetarian");
    let yogurt = if request.has_tag("vegan") {
        SOY_YOGURT
    } else {
        GREEK_YOGURT
    };
    match request.meal_type {
        MealType::Breakfast => (
            "Overnight oats with banana",
            vec![OATS, yogurt, BANANA],
            vec![
                "Stir the oats into the yogurt",
                "Slice the banana on top",
                "Refrigerate overnight or eat right away",
            ],
        ),
        MealType::Lunch | MealType::Dinner => (
            if plant_based {
                "Tofu rice bowl with broccoli"
            } else {
                "Chicken rice bowl with broccoli"
            },
            vec![if plant_based { TOFU } else { CHICKEN }, RICE, BROCCOLI, OLIVE_OIL],
            vec![
                "Cook the rice",
                "Pan-sear the protein in the olive oil",
                "Steam the broccoli and assemble the bowl",
            ],
        ),
        MealType::Snack | MealType::Other => (
            "Yogurt parfait with almonds",
            vec![yogurt, BERRIES, ALMONDS],
            vec!["Layer yogurt and berries", "Top with chopped almonds"],
        ),
    }
}

/// Round grams to the nearest 5 g, never below 5 g
fn round_grams(grams: f64) -> f64 {
    ((grams / 5.0).round() * 5.0).max(5.0)
}

/// Template recipe scaled so that one serving hits the calorie target
#[must_use]
pub fn fallback_recipe(request: &RecipeRequest, id: String) -> Recipe {
    let (title, ingredients, steps) = template(request);
    let base_calories: f64 = ingredients.iter().map(|i| i.1 * i.2 / 100.0).sum();
    let factor = if base_calories > 0.0 && request.target_calories > 0.0 {
        request.target_calories / base_calories
    } else {
        1.0
    };
    let servings = request.servings.max(1);

    let mut calories = 0.0;
    let mut protein = 0.0;
    let mut carbs = 0.0;
    let mut fat = 0.0;
    let mut lines = Vec::with_capacity(ingredients.len());
    for (name, grams, kcal, p, c, f) in ingredients {
        let per_serving = round_grams(grams * factor);
        calories += per_serving * kcal / 100.0;
        protein += per_serving * p / 100.0;
        carbs += per_serving * c / 100.0;
        fat += per_serving * f / 100.0;
        lines.push(RecipeIngredient {
            name: name.to_owned(),
            quantity: per_serving * f64::from(servings),
            unit: "g".to_owned(),
        });
    }

    Recipe {
        id,
        title: title.to_owned(),
        servings,
        calories: calories.round(),
        protein_g: protein.round(),
        carbs_g: carbs.round(),
        fat_g: fat.round(),
        ingredients: lines,
        steps: steps.into_iter().map(str::to_owned).collect(),
        prep_minutes: 15,
        tags: request.dietary_tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(target: f64, meal_type: MealType) -> RecipeRequest {
        RecipeRequest {
            target_calories: target,
            meal_type,
            dietary_tags: Vec::new(),
            servings: 1,
        }
    }

    #[test]
    fn test_fallback_hits_calorie_target_for_every_meal() {
        for meal in [MealType::Breakfast, MealType::Lunch, MealType::Snack] {
            let req = request(600.0, meal);
            let recipe = fallback_recipe(&req, "r1".to_owned());
            assert!(
                (recipe.calories - 600.0).abs() <= 600.0 * 0.25,
                "{meal:?} produced {} kcal",
                recipe.calories
            );
        }
    }

    #[test]
    fn test_vegan_fallback_has_no_animal_products() {
        let mut req = request(700.0, MealType::Dinner);
        req.dietary_tags.push("Vegan".to_owned());
        let recipe = fallback_recipe(&req, "r2".to_owned());
        assert!(recipe.ingredients.iter().all(|i| i.name != "Chicken breast"));
    }
}
