// ABOUTME: Integration tests for local persistence: SQLite store, preferences and the query cache
// ABOUTME: Values survive reopening the database; stale cache snapshots are dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration as ChronoDuration;
use ironlog::config::StoreUrl;
use ironlog::models::{ExerciseId, PlannedExercise, Program, ProgramDay, ProgramWeek};
use ironlog::storage::{open_store, LocalStore, MemoryStore, Preferences, QueryCache, SqliteStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn sqlite_url(dir: &TempDir) -> StoreUrl {
    StoreUrl::Sqlite {
        path: dir.path().join("nested").join("local.db"),
    }
}

fn one_day_program() -> Program {
    Program {
        id: "program-1".to_owned(),
        name: "1-week strength program".to_owned(),
        goal: "strength".to_owned(),
        weeks: 1,
        days_per_week: 1,
        schedule: vec![ProgramWeek {
            week: 1,
            days: vec![ProgramDay {
                day: 1,
                name: "Day 1: full body".to_owned(),
                exercises: vec![PlannedExercise {
                    exercise_id: ExerciseId::new(),
                    name: "Back Squat".to_owned(),
                    sets: 5,
                    reps: 5,
                    weight: Some(100.0),
                    rest_secs: Some(180),
                }],
            }],
        }],
    }
}

#[tokio::test]
async fn test_sqlite_store_round_trip_and_overwrite() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&sqlite_url(&dir)).await.unwrap();

    assert_eq!(store.get("missing").await.unwrap(), None);
    store.set("queue", "[1]").await.unwrap();
    store.set("queue", "[1,2]").await.unwrap();
    assert_eq!(store.get("queue").await.unwrap().as_deref(), Some("[1,2]"));

    store.remove("queue").await.unwrap();
    store.remove("queue").await.unwrap();
    assert_eq!(store.get("queue").await.unwrap(), None);
}

#[tokio::test]
async fn test_sqlite_store_survives_reopen() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let url = sqlite_url(&dir);

    {
        let store = SqliteStore::open(&url).await.unwrap();
        store.set("ironlog_show_onboarding_tour", "false").await.unwrap();
        store.pool().close().await;
    }

    let reopened = open_store(&url).await.unwrap();
    assert_eq!(
        reopened
            .get("ironlog_show_onboarding_tour")
            .await
            .unwrap()
            .as_deref(),
        Some("false")
    );
}

#[tokio::test]
async fn test_memory_url_opens_memory_store() {
    let store = open_store(&StoreUrl::Memory).await.unwrap();
    store.set("k", "v").await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn test_onboarding_tour_defaults_to_shown() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let preferences = Preferences::new(Arc::clone(&store));

    assert!(preferences.show_onboarding_tour().await);
    preferences.set_show_onboarding_tour(false).await.unwrap();
    assert!(!preferences.show_onboarding_tour().await);
    assert!(!Preferences::new(store).show_onboarding_tour().await);
}

#[tokio::test]
async fn test_cached_programs_round_trip() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let preferences = Preferences::new(Arc::clone(&store));
    assert!(preferences.cached_programs().await.is_empty());

    let program = one_day_program();
    preferences.cache_programs(&[program.clone()]).await.unwrap();
    assert_eq!(preferences.cached_programs().await, vec![program]);
}

#[tokio::test]
async fn test_corrupt_cached_programs_read_as_empty() {
    common::init_test_logging();
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    store
        .set("ironlog_cached_programs", "{definitely not a list")
        .await
        .unwrap();
    assert!(Preferences::new(store).cached_programs().await.is_empty());
}

#[tokio::test]
async fn test_query_cache_restores_fresh_snapshot() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let saved_at = common::reference_time();

    let cache = QueryCache::new(Arc::clone(&store), Duration::from_secs(86_400));
    cache.put("exercises", json!([{ "name": "Back Squat" }])).await;
    cache.put("programs", json!([])).await;
    cache.persist(saved_at).await.unwrap();

    let restored = QueryCache::new(store, Duration::from_secs(86_400));
    let count = restored.restore(saved_at + ChronoDuration::hours(23)).await;

    assert_eq!(count, 2);
    assert_eq!(
        restored.get("exercises").await.unwrap()[0]["name"],
        "Back Squat"
    );
}

#[tokio::test]
async fn test_query_cache_drops_stale_snapshot() {
    common::init_test_logging();
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let saved_at = common::reference_time();

    let cache = QueryCache::new(Arc::clone(&store), Duration::from_secs(86_400));
    cache.put("exercises", json!([])).await;
    cache.persist(saved_at).await.unwrap();

    let restored = QueryCache::new(Arc::clone(&store), Duration::from_secs(86_400));
    assert_eq!(restored.restore(saved_at + ChronoDuration::hours(25)).await, 0);
    assert!(restored.is_empty().await);
    assert_eq!(store.get("ironlog_query_cache").await.unwrap(), None);
}

#[tokio::test]
async fn test_query_cache_clear_removes_snapshot() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let cache = QueryCache::new(Arc::clone(&store), Duration::from_secs(60));
    cache.put("workouts", json!({ "page": 1 })).await;
    cache.persist(common::reference_time()).await.unwrap();

    cache.clear().await.unwrap();

    assert_eq!(cache.len().await, 0);
    assert_eq!(store.get("ironlog_query_cache").await.unwrap(), None);
}
