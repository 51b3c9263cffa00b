// ABOUTME: Integration tests for food lookups and daily nutrition totals
// ABOUTME: Remote answers, degraded lookups against the bundled dataset, and portion logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use ironlog::errors::provider::{ProviderError, ProviderResult};
use ironlog::errors::ErrorCode;
use ironlog::models::{FoodItem, MealType};
use ironlog::providers::FoodDatabase;
use ironlog::services::{LookupSource, NutritionService};
use std::sync::Arc;

enum Failure {
    None,
    RateLimited,
    Offline,
    Garbage,
}

/// Remote database holding a single branded product
struct StubRemote {
    failure: Failure,
}

impl StubRemote {
    fn failing(failure: Failure) -> Arc<dyn FoodDatabase> {
        Arc::new(Self { failure })
    }

    fn check(&self) -> ProviderResult<()> {
        match self.failure {
            Failure::None => Ok(()),
            Failure::RateLimited => Err(ProviderError::from_status("stub", 429, "slow down")),
            Failure::Offline => Err(ProviderError::Network {
                provider: "stub".to_owned(),
                message: "dns failure".to_owned(),
            }),
            Failure::Garbage => Err(ProviderError::InvalidResponse {
                provider: "stub".to_owned(),
                message: "expected object".to_owned(),
            }),
        }
    }
}

fn skyr() -> FoodItem {
    FoodItem {
        code: Some("5690000000001".to_owned()),
        name: "Skyr, natural".to_owned(),
        brand: Some("Nordic Dairy".to_owned()),
        calories_per_100g: 63.0,
        protein_per_100g: 11.0,
        carbs_per_100g: 4.0,
        fat_per_100g: 0.2,
        serving_size_g: Some(150.0),
    }
}

#[async_trait]
impl FoodDatabase for StubRemote {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search(&self, _query: &str, _limit: usize) -> ProviderResult<Vec<FoodItem>> {
        self.check()?;
        Ok(vec![skyr()])
    }

    async fn lookup_barcode(&self, code: &str) -> ProviderResult<Option<FoodItem>> {
        self.check()?;
        Ok((code == "5690000000001").then(skyr))
    }
}

fn service(failure: Failure) -> NutritionService {
    common::init_test_logging();
    NutritionService::new(Some(StubRemote::failing(failure)))
}

#[tokio::test]
async fn test_remote_answers_when_available() {
    let found = service(Failure::None).search("skyr", 5).await.unwrap();
    assert_eq!(found.source, LookupSource::Remote);
    assert_eq!(found.value[0].brand.as_deref(), Some("Nordic Dairy"));
}

#[tokio::test]
async fn test_rate_limit_degrades_to_local_dataset() {
    let found = service(Failure::RateLimited).search("banana", 5).await.unwrap();
    assert_eq!(found.source, LookupSource::Local);
    assert_eq!(found.value.len(), 1);
    assert_eq!(found.value[0].name, "Banana");
}

#[tokio::test]
async fn test_offline_barcode_lookup_uses_local_dataset() {
    let found = service(Failure::Offline)
        .lookup_barcode("0000000000017")
        .await
        .unwrap();
    assert_eq!(found.source, LookupSource::Local);
    let chicken = found.value.unwrap();
    assert_eq!(chicken.name, "Chicken breast, cooked");
    assert!((chicken.calories_per_100g - 165.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_unknown_barcode_is_none_not_error() {
    let remote = service(Failure::None).lookup_barcode("123").await.unwrap();
    assert_eq!(remote.source, LookupSource::Remote);
    assert!(remote.value.is_none());

    let local = service(Failure::Offline).lookup_barcode("123").await.unwrap();
    assert!(local.value.is_none());
}

#[tokio::test]
async fn test_invalid_response_is_reported() {
    let error = service(Failure::Garbage).search("skyr", 5).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_no_remote_searches_local_dataset() {
    common::init_test_logging();
    let nutrition = NutritionService::new(None);
    let found = nutrition.search("rolled oats", 5).await.unwrap();
    assert_eq!(found.source, LookupSource::Local);
    assert_eq!(found.value[0].name, "Rolled oats");
}

#[tokio::test]
async fn test_logged_portions_sum_per_day() {
    let nutrition = NutritionService::new(None);
    let chicken = nutrition
        .lookup_barcode("0000000000017")
        .await
        .unwrap()
        .value
        .unwrap();
    let banana = nutrition
        .lookup_barcode("0000000000086")
        .await
        .unwrap()
        .value
        .unwrap();

    let noon = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
    let lunch = nutrition.log_portion(&chicken, MealType::Lunch, 200.0, noon);
    assert!((lunch.calories - 330.0).abs() < 1e-9);
    assert!((lunch.protein_g - 62.0).abs() < 1e-9);
    assert_eq!(lunch.food_name, "Chicken breast, cooked");

    let snack = nutrition.log_portion(&banana, MealType::Snack, 100.0, noon + Duration::hours(4));
    let tomorrow =
        nutrition.log_portion(&banana, MealType::Breakfast, 100.0, noon + Duration::days(1));
    assert_ne!(lunch.id, snack.id);

    let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let totals = nutrition.daily_summary(&[lunch, snack, tomorrow], day);

    assert_eq!(totals.entries, 2);
    assert!((totals.calories - 419.0).abs() < 1e-9);
    assert!((totals.carbs_g - 22.8).abs() < 1e-9);
    assert!((totals.remaining_calories(2_000.0) - 1_581.0).abs() < 1e-9);
}
