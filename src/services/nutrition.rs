// ABOUTME: Food search and barcode lookup with a bundled dataset fallback
// ABOUTME: Rate limits and network failures degrade to the local dataset instead of erroring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::{DateTime, NaiveDate, Utc};
use ironlog_core::errors::AppResult;
use ironlog_core::models::{FoodItem, FoodLogEntry, MealType};
use ironlog_intelligence::nutrition::{summarize_day, DailyNutrition};
use ironlog_providers::{FoodDatabase, MockFoodDatabase};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Which database answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSource {
    /// The configured public database
    Remote,
    /// The bundled dataset
    Local,
}

/// Lookup result tagged with its source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodLookup<T> {
    /// Result
    pub value: T,
    /// Where it came from
    pub source: LookupSource,
}

/// Food lookups for the nutrition log
#[derive(Clone)]
pub struct NutritionService {
    remote: Option<Arc<dyn FoodDatabase>>,
    local: Arc<dyn FoodDatabase>,
}

impl NutritionService {
    /// Service querying `remote` first, with the bundled dataset as fallback
    #[must_use]
    pub fn new(remote: Option<Arc<dyn FoodDatabase>>) -> Self {
        Self {
            remote,
            local: Arc::new(MockFoodDatabase::new()),
        }
    }

    /// Search foods by name
    ///
    /// # Errors
    ///
    /// Returns the remote error when it is not a rate limit or connectivity
    /// failure (for example an unparsable response).
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> AppResult<FoodLookup<Vec<FoodItem>>> {
        if let Some(remote) = &self.remote {
            match remote.search(query, limit).await {
                Ok(items) => {
                    return Ok(FoodLookup {
                        value: items,
                        source: LookupSource::Remote,
                    })
                }
                Err(e) if e.should_fall_back() => {
                    warn!(query, error = %e, "Food search unavailable, using local dataset");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(FoodLookup {
            value: self.local.search(query, limit).await?,
            source: LookupSource::Local,
        })
    }

    /// Look up a barcode
    ///
    /// # Errors
    ///
    /// Returns the remote error when it is not a rate limit or connectivity failure.
    pub async fn lookup_barcode(&self, code: &str) -> AppResult<FoodLookup<Option<FoodItem>>> {
        if let Some(remote) = &self.remote {
            match remote.lookup_barcode(code).await {
                Ok(item) => {
                    return Ok(FoodLookup {
                        value: item,
                        source: LookupSource::Remote,
                    })
                }
                Err(e) if e.should_fall_back() => {
                    warn!(code, error = %e, "Barcode lookup unavailable, using local dataset");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(FoodLookup {
            value: self.local.lookup_barcode(code).await?,
            source: LookupSource::Local,
        })
    }

    /// Build a log entry for a portion of `item`
    #[must_use]
    pub fn log_portion(
        &self,
        item: &FoodItem,
        meal_type: MealType,
        grams: f64,
        logged_at: DateTime<Utc>,
    ) -> FoodLogEntry {
        item.portion(Uuid::new_v4().to_string(), meal_type, grams, logged_at)
    }

    /// Totals for one day
    #[must_use]
    pub fn daily_summary(&self, entries: &[FoodLogEntry], day: NaiveDate) -> DailyNutrition {
        summarize_day(entries, day)
    }
}
