// ABOUTME: Environment configuration for local storage, backend, sync policy and external services
// ABOUTME: Unparseable values fall back to defaults with a warning; inconsistent values are rejected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Environment-based configuration

use ironlog_core::constants::{generation, storage, sync, workout};
use ironlog_core::errors::{AppError, AppResult, ErrorCode};
use ironlog_providers::http_client::HttpTimeouts;
use ironlog_providers::{GeminiConfig, OpenFoodFactsConfig, RestBackendConfig};
use std::env;
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Read and parse an environment variable, falling back to `default`
///
/// A present but unparseable value is logged and ignored.
fn env_parse<T: FromStr + Copy + fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(
                key,
                value = %raw,
                default = %default,
                "Invalid value in environment, using default"
            );
            default
        }),
        Err(_) => default,
    }
}

/// Non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Location of the local key-value store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    /// SQLite file
    Sqlite {
        /// Database file path
        path: PathBuf,
    },
    /// Ephemeral in-memory store
    Memory,
}

impl StoreUrl {
    /// Parse `sqlite:<path>`, `sqlite::memory:`, `memory` or a bare path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let s = s.trim();
        if s == "memory" || s == "sqlite::memory:" {
            return Self::Memory;
        }
        let path = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:")).unwrap_or(s);
        Self::Sqlite {
            path: PathBuf::from(path),
        }
    }

    /// `sqlite:<data_dir>/ironlog/local.db`, or the working directory when no data dir exists
    #[must_use]
    pub fn default_location() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::Sqlite {
            path: base.join("ironlog").join(storage::DEFAULT_STORE_FILE),
        }
    }

    /// Connection string understood by sqlx
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::Sqlite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Whether nothing survives the process
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

/// Local persisted state
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Store location (`IRONLOG_STORE_URL`)
    pub url: StoreUrl,
    /// Oldest query-cache snapshot that is still restored (`IRONLOG_QUERY_CACHE_MAX_AGE_SECS`)
    pub query_cache_max_age: Duration,
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            url: env_opt("IRONLOG_STORE_URL")
                .map_or_else(StoreUrl::default_location, |u| StoreUrl::parse_url(&u)),
            query_cache_max_age: Duration::from_secs(env_parse(
                "IRONLOG_QUERY_CACHE_MAX_AGE_SECS",
                storage::QUERY_CACHE_MAX_AGE_SECS,
            )),
        }
    }
}

/// Managed backend connection
#[derive(Clone, Default)]
pub struct BackendConfig {
    /// Project URL (`IRONLOG_BACKEND_URL`); absent means local-only
    pub url: Option<String>,
    /// Public API key (`IRONLOG_BACKEND_KEY`)
    pub api_key: Option<String>,
    /// Signed-in user's token (`IRONLOG_ACCESS_TOKEN`)
    pub access_token: Option<String>,
}

impl BackendConfig {
    fn from_env() -> Self {
        Self {
            url: env_opt("IRONLOG_BACKEND_URL"),
            api_key: env_opt("IRONLOG_BACKEND_KEY"),
            access_token: env_opt("IRONLOG_ACCESS_TOKEN"),
        }
    }

    /// REST client settings, when a backend is configured
    #[must_use]
    pub fn rest_config(&self) -> Option<RestBackendConfig> {
        Some(RestBackendConfig {
            base_url: self.url.clone()?,
            api_key: self.api_key.clone().unwrap_or_default(),
            access_token: self.access_token.clone(),
        })
    }
}

impl Debug for BackendConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Offline queue replay policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Delay before syncing after coming back online
    pub reconnect_delay: Duration,
    /// Delay before the startup sync
    pub startup_delay: Duration,
    /// First retry delay after a failed item
    pub backoff_base: Duration,
    /// Retry delay ceiling
    pub backoff_max: Duration,
    /// Failed attempts before an item is dead-lettered
    pub max_attempts: u32,
    /// Connectivity probe interval
    pub probe_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_millis(sync::RECONNECT_SYNC_DELAY_MS),
            startup_delay: Duration::from_millis(sync::STARTUP_SYNC_DELAY_MS),
            backoff_base: Duration::from_millis(sync::BACKOFF_BASE_MS),
            backoff_max: Duration::from_millis(sync::BACKOFF_MAX_MS),
            max_attempts: sync::MAX_ATTEMPTS,
            probe_interval: Duration::from_secs(sync::CONNECTIVITY_PROBE_SECS),
        }
    }
}

impl SyncConfig {
    fn from_env() -> Self {
        Self {
            reconnect_delay: Duration::from_millis(env_parse(
                "IRONLOG_SYNC_RECONNECT_DELAY_MS",
                sync::RECONNECT_SYNC_DELAY_MS,
            )),
            startup_delay: Duration::from_millis(env_parse(
                "IRONLOG_SYNC_STARTUP_DELAY_MS",
                sync::STARTUP_SYNC_DELAY_MS,
            )),
            backoff_base: Duration::from_millis(env_parse(
                "IRONLOG_SYNC_BACKOFF_BASE_MS",
                sync::BACKOFF_BASE_MS,
            )),
            backoff_max: Duration::from_millis(env_parse(
                "IRONLOG_SYNC_BACKOFF_MAX_MS",
                sync::BACKOFF_MAX_MS,
            )),
            max_attempts: env_parse("IRONLOG_SYNC_MAX_ATTEMPTS", sync::MAX_ATTEMPTS),
            probe_interval: Duration::from_secs(env_parse(
                "IRONLOG_CONNECTIVITY_PROBE_SECS",
                sync::CONNECTIVITY_PROBE_SECS,
            )),
        }
    }
}

/// Generative model settings
#[derive(Clone)]
pub struct GenerationConfig {
    /// API key (`IRONLOG_AI_API_KEY`); absent means fallbacks only
    pub api_key: Option<String>,
    /// Model name (`IRONLOG_AI_MODEL`)
    pub model: String,
    /// API base URL (`IRONLOG_AI_BASE_URL`)
    pub base_url: String,
    /// Accepted recipe calorie deviation (`IRONLOG_RECIPE_CALORIE_TOLERANCE`)
    pub calorie_tolerance: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let gemini = GeminiConfig::default();
        Self {
            api_key: None,
            model: gemini.model,
            base_url: gemini.base_url,
            calorie_tolerance: generation::RECIPE_CALORIE_TOLERANCE,
        }
    }
}

impl GenerationConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env_opt("IRONLOG_AI_API_KEY"),
            model: env_opt("IRONLOG_AI_MODEL").unwrap_or(defaults.model),
            base_url: env_opt("IRONLOG_AI_BASE_URL").unwrap_or(defaults.base_url),
            calorie_tolerance: env_parse(
                "IRONLOG_RECIPE_CALORIE_TOLERANCE",
                defaults.calorie_tolerance,
            ),
        }
    }

    /// Gemini client settings, when an API key is configured
    #[must_use]
    pub fn gemini_config(&self) -> Option<GeminiConfig> {
        Some(GeminiConfig {
            api_key: self.api_key.clone()?,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
        })
    }
}

impl Debug for GenerationConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("calorie_tolerance", &self.calorie_tolerance)
            .finish()
    }
}

/// Food database settings
#[derive(Debug, Clone)]
pub struct NutritionConfig {
    /// Open Food Facts host (`IRONLOG_FOOD_API_URL`)
    pub api_url: String,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            api_url: OpenFoodFactsConfig::default().base_url,
        }
    }
}

impl NutritionConfig {
    fn from_env() -> Self {
        Self {
            api_url: env_opt("IRONLOG_FOOD_API_URL").unwrap_or_else(|| Self::default().api_url),
        }
    }

    /// Client settings
    #[must_use]
    pub fn client_config(&self) -> OpenFoodFactsConfig {
        OpenFoodFactsConfig {
            base_url: self.api_url.clone(),
            ..OpenFoodFactsConfig::default()
        }
    }
}

/// Outgoing HTTP timeouts shared by every remote client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request timeout (`IRONLOG_HTTP_TIMEOUT_SECS`)
    pub timeout: Duration,
    /// Connect timeout (`IRONLOG_HTTP_CONNECT_TIMEOUT_SECS`)
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = HttpTimeouts::default();
        Self {
            timeout: defaults.request,
            connect_timeout: defaults.connect,
        }
    }
}

impl HttpConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: Duration::from_secs(env_parse(
                "IRONLOG_HTTP_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
            connect_timeout: Duration::from_secs(env_parse(
                "IRONLOG_HTTP_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
        }
    }

    /// Timeouts for the shared client
    #[must_use]
    pub const fn timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            request: self.timeout,
            connect: self.connect_timeout,
        }
    }
}

/// Active workout defaults
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutConfig {
    /// Rest when an exercise has none configured (`IRONLOG_DEFAULT_REST_SECS`)
    pub default_rest_secs: u32,
    /// Bar weight for the plate calculator (`IRONLOG_DEFAULT_BAR_WEIGHT`)
    pub default_bar_weight_kg: f64,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            default_rest_secs: workout::DEFAULT_REST_SECS,
            default_bar_weight_kg: workout::DEFAULT_BAR_WEIGHT_KG,
        }
    }
}

impl WorkoutConfig {
    fn from_env() -> Self {
        Self {
            default_rest_secs: env_parse("IRONLOG_DEFAULT_REST_SECS", workout::DEFAULT_REST_SECS),
            default_bar_weight_kg: env_parse(
                "IRONLOG_DEFAULT_BAR_WEIGHT",
                workout::DEFAULT_BAR_WEIGHT_KG,
            ),
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Local storage
    pub storage: StorageConfig,
    /// Remote backend
    pub backend: BackendConfig,
    /// Offline queue replay
    pub sync: SyncConfig,
    /// Generative model
    pub generation: GenerationConfig,
    /// Food database
    pub nutrition: NutritionConfig,
    /// Outgoing HTTP timeouts
    pub http: HttpConfig,
    /// Workout defaults
    pub workout: WorkoutConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error when values are individually valid but
    /// inconsistent (see [`AppConfig::validate`]).
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            storage: StorageConfig::from_env(),
            backend: BackendConfig::from_env(),
            sync: SyncConfig::from_env(),
            generation: GenerationConfig::from_env(),
            nutrition: NutritionConfig::from_env(),
            http: HttpConfig::from_env(),
            workout: WorkoutConfig::from_env(),
        };
        config.validate()?;
        info!("{}", config.summary());
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error describing the first violated constraint.
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |message: &str| Err(AppError::new(ErrorCode::ConfigInvalid, message));
        if self.sync.max_attempts == 0 {
            return invalid("IRONLOG_SYNC_MAX_ATTEMPTS must be at least 1");
        }
        if self.sync.backoff_base > self.sync.backoff_max {
            return invalid(
                "IRONLOG_SYNC_BACKOFF_BASE_MS must not exceed IRONLOG_SYNC_BACKOFF_MAX_MS",
            );
        }
        if self.sync.probe_interval.is_zero() {
            return invalid("IRONLOG_CONNECTIVITY_PROBE_SECS must be positive");
        }
        if self.http.timeout.is_zero() || self.http.connect_timeout.is_zero() {
            return invalid(
                "IRONLOG_HTTP_TIMEOUT_SECS and IRONLOG_HTTP_CONNECT_TIMEOUT_SECS must be positive",
            );
        }
        let tolerance = self.generation.calorie_tolerance;
        if !(tolerance.is_finite() && tolerance > 0.0 && tolerance < 1.0) {
            return invalid("IRONLOG_RECIPE_CALORIE_TOLERANCE must be between 0 and 1");
        }
        let bar = self.workout.default_bar_weight_kg;
        if !(bar.is_finite() && bar >= 0.0) {
            return invalid("IRONLOG_DEFAULT_BAR_WEIGHT must be a non-negative number");
        }
        if self.backend.url.is_some() && self.backend.api_key.is_none() {
            warn!("IRONLOG_BACKEND_URL is set without IRONLOG_BACKEND_KEY");
        }
        Ok(())
    }

    /// One-line summary without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "IronLog configuration: store={}, backend={}, generative model={}, food database={}, sync max attempts={}",
            self.storage.url,
            self.backend.url.as_deref().unwrap_or("local only"),
            if self.generation.api_key.is_some() {
                self.generation.model.as_str()
            } else {
                "fallback only"
            },
            self.nutrition.api_url,
            self.sync.max_attempts,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_url_parsing() {
        assert_eq!(StoreUrl::parse_url("sqlite::memory:"), StoreUrl::Memory);
        assert_eq!(StoreUrl::parse_url("memory"), StoreUrl::Memory);
        assert_eq!(
            StoreUrl::parse_url("sqlite:./data/local.db").to_connection_string(),
            "sqlite:./data/local.db"
        );
        assert_eq!(
            StoreUrl::parse_url("/tmp/ironlog.db"),
            StoreUrl::Sqlite {
                path: PathBuf::from("/tmp/ironlog.db")
            }
        );
    }

    #[test]
    fn test_backend_rest_config_requires_url() {
        assert!(BackendConfig::default().rest_config().is_none());
        let config = BackendConfig {
            url: Some("https://project.example.co".to_owned()),
            api_key: Some("anon".to_owned()),
            access_token: None,
        };
        let rest = config.rest_config().unwrap();
        assert_eq!(rest.api_key, "anon");
        assert!(!format!("{config:?}").contains("anon"));
    }

    #[test]
    fn test_validation_rejects_inverted_backoff() {
        let mut config = AppConfig {
            storage: StorageConfig {
                url: StoreUrl::Memory,
                query_cache_max_age: Duration::from_secs(storage::QUERY_CACHE_MAX_AGE_SECS),
            },
            backend: BackendConfig::default(),
            sync: SyncConfig::default(),
            generation: GenerationConfig::default(),
            nutrition: NutritionConfig::default(),
            http: HttpConfig::default(),
            workout: WorkoutConfig::default(),
        };
        assert!(config.validate().is_ok());

        config.sync.backoff_base = Duration::from_secs(3600);
        let error = config.validate().unwrap_err();
        assert_eq!(error.code, ErrorCode::ConfigInvalid);
    }
}
