// ABOUTME: Tests for environment configuration loading and cross-field validation
// ABOUTME: Each test owns the process environment through serial_test
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use ironlog::config::{AppConfig, StoreUrl, SyncConfig};
use ironlog::errors::ErrorCode;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const VARIABLES: &[&str] = &[
    "IRONLOG_STORE_URL",
    "IRONLOG_QUERY_CACHE_MAX_AGE_SECS",
    "IRONLOG_BACKEND_URL",
    "IRONLOG_BACKEND_KEY",
    "IRONLOG_ACCESS_TOKEN",
    "IRONLOG_SYNC_RECONNECT_DELAY_MS",
    "IRONLOG_SYNC_STARTUP_DELAY_MS",
    "IRONLOG_SYNC_BACKOFF_BASE_MS",
    "IRONLOG_SYNC_BACKOFF_MAX_MS",
    "IRONLOG_SYNC_MAX_ATTEMPTS",
    "IRONLOG_CONNECTIVITY_PROBE_SECS",
    "IRONLOG_AI_API_KEY",
    "IRONLOG_AI_MODEL",
    "IRONLOG_AI_BASE_URL",
    "IRONLOG_RECIPE_CALORIE_TOLERANCE",
    "IRONLOG_FOOD_API_URL",
    "IRONLOG_HTTP_TIMEOUT_SECS",
    "IRONLOG_HTTP_CONNECT_TIMEOUT_SECS",
    "IRONLOG_DEFAULT_REST_SECS",
    "IRONLOG_DEFAULT_BAR_WEIGHT",
];

fn clear_environment() {
    for key in VARIABLES {
        env::remove_var(key);
    }
    // keep the default location out of the developer's data directory
    env::set_var("IRONLOG_STORE_URL", "memory");
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_environment();
    let config = AppConfig::from_env().unwrap();

    assert_eq!(config.storage.url, StoreUrl::Memory);
    assert_eq!(config.storage.query_cache_max_age, Duration::from_secs(86_400));
    assert!(config.backend.rest_config().is_none());
    assert_eq!(config.sync, SyncConfig::default());
    assert_eq!(config.sync.max_attempts, 10);
    assert_eq!(config.sync.reconnect_delay, Duration::from_secs(1));
    assert!(config.generation.gemini_config().is_none());
    assert!((config.generation.calorie_tolerance - 0.25).abs() < f64::EPSILON);
    assert_eq!(config.workout.default_rest_secs, 60);
    assert!((config.workout.default_bar_weight_kg - 20.0).abs() < f64::EPSILON);
    assert_eq!(config.http.timeouts().request, Duration::from_secs(30));
    assert!(config.summary().contains("local only"));
    assert!(config.summary().contains("fallback only"));
}

#[test]
#[serial]
fn test_values_are_read_from_environment() {
    clear_environment();
    env::set_var("IRONLOG_STORE_URL", "sqlite:/tmp/ironlog-test/local.db");
    env::set_var("IRONLOG_BACKEND_URL", "https://project.example.co");
    env::set_var("IRONLOG_BACKEND_KEY", "anon-key");
    env::set_var("IRONLOG_SYNC_MAX_ATTEMPTS", "4");
    env::set_var("IRONLOG_SYNC_BACKOFF_BASE_MS", "500");
    env::set_var("IRONLOG_AI_API_KEY", "secret-model-key");
    env::set_var("IRONLOG_DEFAULT_BAR_WEIGHT", "15");

    let config = AppConfig::from_env().unwrap();
    clear_environment();

    assert_eq!(
        config.storage.url,
        StoreUrl::Sqlite {
            path: PathBuf::from("/tmp/ironlog-test/local.db")
        }
    );
    let rest = config.backend.rest_config().unwrap();
    assert_eq!(rest.base_url, "https://project.example.co");
    assert_eq!(rest.api_key, "anon-key");
    assert_eq!(config.sync.max_attempts, 4);
    assert_eq!(config.sync.backoff_base, Duration::from_millis(500));
    assert_eq!(config.generation.gemini_config().unwrap().api_key, "secret-model-key");
    assert!((config.workout.default_bar_weight_kg - 15.0).abs() < f64::EPSILON);

    let debug = format!("{config:?}");
    assert!(!debug.contains("anon-key"));
    assert!(!debug.contains("secret-model-key"));
}

#[test]
#[serial]
fn test_unparseable_value_uses_default() {
    clear_environment();
    env::set_var("IRONLOG_SYNC_MAX_ATTEMPTS", "plenty");
    env::set_var("IRONLOG_DEFAULT_REST_SECS", "-5");

    let config = AppConfig::from_env().unwrap();
    clear_environment();

    assert_eq!(config.sync.max_attempts, 10);
    assert_eq!(config.workout.default_rest_secs, 60);
}

#[test]
#[serial]
fn test_inconsistent_values_are_rejected() {
    let cases = [
        ("IRONLOG_SYNC_MAX_ATTEMPTS", "0"),
        ("IRONLOG_SYNC_BACKOFF_BASE_MS", "900000"),
        ("IRONLOG_CONNECTIVITY_PROBE_SECS", "0"),
        ("IRONLOG_RECIPE_CALORIE_TOLERANCE", "1.5"),
        ("IRONLOG_DEFAULT_BAR_WEIGHT", "-20"),
        ("IRONLOG_HTTP_TIMEOUT_SECS", "0"),
    ];
    for (key, value) in cases {
        clear_environment();
        env::set_var(key, value);
        let error = AppConfig::from_env().unwrap_err();
        assert_eq!(error.code, ErrorCode::ConfigInvalid, "{key}={value}");
    }
    clear_environment();
}

#[test]
fn test_store_url_forms() {
    assert_eq!(StoreUrl::parse_url("sqlite::memory:"), StoreUrl::Memory);
    assert!(StoreUrl::parse_url("memory").is_memory());
    assert_eq!(
        StoreUrl::parse_url("sqlite:///var/lib/ironlog.db").to_connection_string(),
        "sqlite:/var/lib/ironlog.db"
    );
    assert_eq!(
        StoreUrl::parse_url("./local.db"),
        StoreUrl::Sqlite {
            path: PathBuf::from("./local.db")
        }
    );
}
