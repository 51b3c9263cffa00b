// ABOUTME: Open Food Facts API client for food search and barcode lookup
// ABOUTME: Caches answers for a day and enforces a local per-minute request budget
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Open Food Facts client
//!
//! The API is public and keyless but asks clients to stay under a modest
//! request rate. Once the local budget for the current minute is spent, calls
//! fail with [`ProviderError::RateLimitExceeded`] instead of waiting, so the
//! nutrition service can answer from the bundled dataset right away.
//!
//! API reference: <https://openfoodfacts.github.io/openfoodfacts-server/api/>

use super::FoodDatabase;
use crate::http_client::shared_client;
use async_trait::async_trait;
use ironlog_core::constants::service_names;
use ironlog_core::errors::provider::{ProviderError, ProviderResult};
use ironlog_core::models::FoodItem;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Client configuration
#[derive(Debug, Clone)]
pub struct OpenFoodFactsConfig {
    /// API host (default: <https://world.openfoodfacts.org>)
    pub base_url: String,
    /// Cache TTL in seconds (default: 86400 = 24 hours)
    pub cache_ttl_secs: u64,
    /// Requests allowed per minute (default: 10)
    pub rate_limit_per_minute: u32,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org".to_owned(),
            cache_ttl_secs: 86_400,
            rate_limit_per_minute: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: i64,
    product: Option<Product>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Nutriments {
    #[serde(rename = "energy-kcal_100g")]
    energy_kcal_100g: Option<f64>,
    proteins_100g: Option<f64>,
    carbohydrates_100g: Option<f64>,
    fat_100g: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Product {
    code: Option<String>,
    product_name: Option<String>,
    brands: Option<String>,
    #[serde(default)]
    nutriments: Nutriments,
    /// Sometimes a number, sometimes a string
    serving_quantity: Option<Value>,
}

impl Product {
    /// Products without a name or energy value are useless for logging
    fn into_item(self) -> Option<FoodItem> {
        let name = self.product_name.filter(|n| !n.trim().is_empty())?;
        let calories = self.nutriments.energy_kcal_100g?;
        let serving_size_g = match self.serving_quantity {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        Some(FoodItem {
            code: self.code,
            name: name.trim().to_owned(),
            brand: self
                .brands
                .and_then(|b| b.split(',').next().map(|s| s.trim().to_owned()))
                .filter(|b| !b.is_empty()),
            calories_per_100g: calories,
            protein_per_100g: self.nutriments.proteins_100g.unwrap_or(0.0),
            carbs_per_100g: self.nutriments.carbohydrates_100g.unwrap_or(0.0),
            fat_per_100g: self.nutriments.fat_100g.unwrap_or(0.0),
            serving_size_g,
        })
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// Sliding one-minute request window
#[derive(Debug)]
struct RateLimiter {
    requests: Vec<Instant>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    const fn new(limit: u32, window: Duration) -> Self {
        Self {
            requests: Vec::new(),
            limit,
            window,
        }
    }

    /// Record a request if the budget allows it
    fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        self.requests.retain(|&t| now.duration_since(t) < self.window);
        if self.requests.len() < self.limit as usize {
            self.requests.push(now);
            true
        } else {
            false
        }
    }
}

/// Open Food Facts client
#[derive(Debug)]
pub struct OpenFoodFactsClient {
    config: OpenFoodFactsConfig,
    search_cache: RwLock<HashMap<String, CacheEntry<Vec<FoodItem>>>>,
    barcode_cache: RwLock<HashMap<String, CacheEntry<Option<FoodItem>>>>,
    rate_limiter: Mutex<RateLimiter>,
}

impl OpenFoodFactsClient {
    /// Client with the given settings
    #[must_use]
    pub fn new(config: OpenFoodFactsConfig) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute, Duration::from_secs(60));
        Self {
            config,
            search_cache: RwLock::new(HashMap::new()),
            barcode_cache: RwLock::new(HashMap::new()),
            rate_limiter: Mutex::new(rate_limiter),
        }
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.cache_ttl_secs)
    }

    async fn acquire(&self) -> ProviderResult<()> {
        if self.rate_limiter.lock().await.try_acquire() {
            Ok(())
        } else {
            Err(ProviderError::RateLimitExceeded {
                provider: service_names::FOOD_DATABASE.to_owned(),
                retry_after_secs: 60,
            })
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> ProviderResult<T> {
        self.acquire().await?;
        let response = shared_client()
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(service_names::FOOD_DATABASE, &e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(
                service_names::FOOD_DATABASE,
                status.as_u16(),
                &body,
            ));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                provider: service_names::FOOD_DATABASE.to_owned(),
                message: e.to_string(),
            })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

#[async_trait]
impl FoodDatabase for OpenFoodFactsClient {
    fn name(&self) -> &'static str {
        service_names::FOOD_DATABASE
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<FoodItem>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let cache_key = format!("{}:{limit}", query.to_lowercase());
        if let Some(entry) = self.search_cache.read().await.get(&cache_key) {
            if Instant::now() < entry.expires_at {
                debug!("Food search served from cache");
                return Ok(entry.data.clone());
            }
        }

        let response: SearchResponse = self
            .get_json(
                format!("{}/cgi/search.pl", self.base()),
                &[
                    ("search_terms", query.to_owned()),
                    ("search_simple", "1".to_owned()),
                    ("action", "process".to_owned()),
                    ("json", "1".to_owned()),
                    ("page_size", limit.to_string()),
                ],
            )
            .await?;
        let items: Vec<FoodItem> = response
            .products
            .into_iter()
            .filter_map(Product::into_item)
            .take(limit)
            .collect();

        self.search_cache.write().await.insert(
            cache_key,
            CacheEntry {
                data: items.clone(),
                expires_at: Instant::now() + self.ttl(),
            },
        );
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn lookup_barcode(&self, code: &str) -> ProviderResult<Option<FoodItem>> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }
        if let Some(entry) = self.barcode_cache.read().await.get(code) {
            if Instant::now() < entry.expires_at {
                return Ok(entry.data.clone());
            }
        }

        let response: ProductResponse = match self
            .get_json(
                format!("{}/api/v2/product/{code}.json", self.base()),
                &[],
            )
            .await
        {
            Ok(response) => response,
            Err(ProviderError::NotFound { .. }) => ProductResponse {
                status: 0,
                product: None,
            },
            Err(error) => return Err(error),
        };
        let item = if response.status == 1 {
            response.product.and_then(Product::into_item)
        } else {
            None
        };

        self.barcode_cache.write().await.insert(
            code.to_owned(),
            CacheEntry {
                data: item.clone(),
                expires_at: Instant::now() + self.ttl(),
            },
        );
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_mapping() {
        let product: Product = serde_json::from_value(json!({
            "code": "3017620422003",
            "product_name": "Hazelnut spread",
            "brands": "Brand A, Brand B",
            "nutriments": {"energy-kcal_100g": 539.0, "proteins_100g": 6.3, "carbohydrates_100g": 57.5, "fat_100g": 30.9},
            "serving_quantity": "15"
        }))
        .unwrap();
        let item = product.into_item().unwrap();
        assert_eq!(item.brand.as_deref(), Some("Brand A"));
        assert!((item.calories_per_100g - 539.0).abs() < f64::EPSILON);
        assert_eq!(item.serving_size_g, Some(15.0));
    }

    #[test]
    fn test_product_without_energy_is_skipped() {
        let product: Product =
            serde_json::from_value(json!({"product_name": "Mystery", "nutriments": {}})).unwrap();
        assert!(product.into_item().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_window_slides() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.try_acquire());
    }
}
