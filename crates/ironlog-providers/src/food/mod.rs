// ABOUTME: Food composition database abstraction with search and barcode lookup
// ABOUTME: Open Food Facts client for production, bundled mock dataset as offline fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

/// Bundled dataset used when the public database is unreachable
pub mod mock;
/// Open Food Facts HTTP client
pub mod open_food_facts;

pub use mock::MockFoodDatabase;
pub use open_food_facts::{OpenFoodFactsClient, OpenFoodFactsConfig};

use async_trait::async_trait;
use ironlog_core::errors::provider::ProviderResult;
use ironlog_core::models::FoodItem;

/// Source of per-100 g food composition data
#[async_trait]
pub trait FoodDatabase: Send + Sync {
    /// Short service name for logs
    fn name(&self) -> &'static str;

    /// Foods whose name matches `query`, at most `limit`
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<FoodItem>>;

    /// Food for a barcode, `None` if unknown
    async fn lookup_barcode(&self, code: &str) -> ProviderResult<Option<FoodItem>>;
}
