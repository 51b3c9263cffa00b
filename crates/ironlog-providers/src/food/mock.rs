// ABOUTME: Bundled food dataset answering searches and barcode lookups without network access
// ABOUTME: Values are per 100 g, rounded from common reference tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::FoodDatabase;
use async_trait::async_trait;
use ironlog_core::errors::provider::ProviderResult;
use ironlog_core::models::FoodItem;

/// (barcode, name, kcal, protein, carbs, fat, serving grams)
type Row = (&'static str, &'static str, f64, f64, f64, f64, Option<f64>);

const DATASET: &[Row] = &[
    ("0000000000017", "Chicken breast, cooked", 165.0, 31.0, 0.0, 3.6, Some(120.0)),
    ("0000000000024", "White rice, cooked", 130.0, 2.7, 28.0, 0.3, Some(150.0)),
    ("0000000000031", "Brown rice, cooked", 123.0, 2.7, 25.6, 1.0, Some(150.0)),
    ("0000000000048", "Rolled oats", 389.0, 16.9, 66.3, 6.9, Some(40.0)),
    ("0000000000055", "Whole egg", 143.0, 12.6, 0.7, 9.5, Some(50.0)),
    ("0000000000062", "Greek yogurt, plain", 59.0, 10.0, 3.6, 0.4, Some(170.0)),
    ("0000000000079", "Whole milk", 61.0, 3.2, 4.8, 3.3, Some(250.0)),
    ("0000000000086", "Banana", 89.0, 1.1, 22.8, 0.3, Some(120.0)),
    ("0000000000093", "Apple", 52.0, 0.3, 13.8, 0.2, Some(180.0)),
    ("0000000000109", "Broccoli", 34.0, 2.8, 7.0, 0.4, Some(90.0)),
    ("0000000000116", "Salmon, cooked", 206.0, 22.0, 0.0, 12.4, Some(120.0)),
    ("0000000000123", "Lean ground beef, cooked", 217.0, 26.1, 0.0, 11.8, Some(100.0)),
    ("0000000000130", "Firm tofu", 76.0, 8.0, 1.9, 4.8, Some(100.0)),
    ("0000000000147", "Almonds", 579.0, 21.0, 22.0, 50.0, Some(28.0)),
    ("0000000000154", "Peanut butter", 588.0, 25.0, 20.0, 50.0, Some(32.0)),
    ("0000000000161", "Whole wheat bread", 247.0, 13.0, 41.0, 3.4, Some(35.0)),
    ("0000000000178", "Sweet potato, baked", 90.0, 2.0, 20.7, 0.2, Some(150.0)),
    ("0000000000185", "Olive oil", 884.0, 0.0, 0.0, 100.0, Some(10.0)),
    ("0000000000192", "Whey protein powder", 400.0, 80.0, 8.0, 6.0, Some(30.0)),
    ("0000000000208", "Cottage cheese", 98.0, 11.1, 3.4, 4.3, Some(110.0)),
];

fn to_item(row: &Row) -> FoodItem {
    let (code, name, calories, protein, carbs, fat, serving) = *row;
    FoodItem {
        code: Some(code.to_owned()),
        name: name.to_owned(),
        brand: None,
        calories_per_100g: calories,
        protein_per_100g: protein,
        carbs_per_100g: carbs,
        fat_per_100g: fat,
        serving_size_g: serving,
    }
}

/// Offline food database backed by a small bundled dataset
#[derive(Debug, Default, Clone, Copy)]
pub struct MockFoodDatabase;

impl MockFoodDatabase {
    /// The bundled dataset
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Number of bundled foods
    #[must_use]
    pub const fn len(self) -> usize {
        DATASET.len()
    }

    /// Whether the dataset is empty
    #[must_use]
    pub const fn is_empty(self) -> bool {
        DATASET.is_empty()
    }
}

#[async_trait]
impl FoodDatabase for MockFoodDatabase {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<FoodItem>> {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        Ok(DATASET
            .iter()
            .filter(|row| {
                let name = row.1.to_lowercase();
                !terms.is_empty() && terms.iter().all(|t| name.contains(t.as_str()))
            })
            .take(limit)
            .map(to_item)
            .collect())
    }

    async fn lookup_barcode(&self, code: &str) -> ProviderResult<Option<FoodItem>> {
        Ok(DATASET.iter().find(|row| row.0 == code).map(to_item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_matches_every_term() {
        let db = MockFoodDatabase::new();
        let results = db.search("rice cooked", 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(db.search("", 10).await.unwrap().is_empty());
        assert_eq!(db.search("o", 3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_barcode_lookup() {
        let db = MockFoodDatabase::new();
        let banana = db.lookup_barcode("0000000000086").await.unwrap().unwrap();
        assert_eq!(banana.name, "Banana");
        assert!(db.lookup_barcode("999").await.unwrap().is_none());
    }
}
