// ABOUTME: Tests for automatic sync triggers driven by connectivity changes
// ABOUTME: Uses tokio's paused clock to check startup and reconnect delays
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use async_trait::async_trait;
use common::{offline_context, offline_context_with_store, sample_payload_value, FlakyBackend};
use ironlog::models::QueuedActionKind;
use ironlog::offline::{spawn_probe, ConnectivityMonitor, ConnectivityProbe};
use ironlog::storage::{LocalStore, MemoryStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_reconnect_syncs_after_delay() {
    let backend = FlakyBackend::new();
    let (context, _) = offline_context(backend.clone(), false).await;
    context
        .queue_action(QueuedActionKind::LogWorkout, sample_payload_value("Queued"))
        .await;
    let trigger = context.start();

    context.monitor().set_online(true);
    sleep(Duration::from_millis(500)).await;
    assert_eq!(backend.inner.row_count("workout_logs").await, 0);

    sleep(Duration::from_millis(600)).await;
    assert_eq!(backend.inner.row_count("workout_logs").await, 1);
    assert!(context.queue().is_empty().await);
    trigger.abort();
}

#[tokio::test(start_paused = true)]
async fn test_flapping_connection_does_not_sync() {
    let backend = FlakyBackend::new();
    let (context, _) = offline_context(backend.clone(), false).await;
    context
        .queue_action(QueuedActionKind::LogWorkout, sample_payload_value("Flap"))
        .await;
    let trigger = context.start();

    context.monitor().set_online(true);
    sleep(Duration::from_millis(300)).await;
    context.monitor().set_online(false);
    sleep(Duration::from_secs(2)).await;

    assert_eq!(backend.insert_calls(), 0);
    assert_eq!(context.status().await.pending, 1);
    trigger.abort();
}

#[tokio::test(start_paused = true)]
async fn test_startup_with_pending_actions_syncs_after_delay() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let backend = FlakyBackend::new();
    let (earlier, _) =
        offline_context_with_store(backend.clone(), Arc::clone(&store), false).await;
    earlier
        .queue_action(QueuedActionKind::LogWorkout, sample_payload_value("Yesterday"))
        .await;
    drop(earlier);

    let (context, _) = offline_context_with_store(backend.clone(), store, true).await;
    let trigger = context.start();

    sleep(Duration::from_millis(1_900)).await;
    assert_eq!(backend.inner.row_count("workout_logs").await, 0);
    sleep(Duration::from_millis(200)).await;
    assert_eq!(backend.inner.row_count("workout_logs").await, 1);
    trigger.abort();
}

#[tokio::test(start_paused = true)]
async fn test_backed_off_action_retries_after_reconnect() {
    let backend = FlakyBackend::new();
    let (context, _) = offline_context(backend.clone(), true).await;
    let trigger = context.start();

    backend.fail_inserts("workout_logs", 1);
    context
        .queue_action(QueuedActionKind::LogWorkout, sample_payload_value("Backed off"))
        .await;
    assert_eq!(backend.insert_calls(), 1);
    assert_eq!(context.status().await.pending, 1);

    context.monitor().set_online(false);
    sleep(Duration::from_millis(10)).await;
    context.monitor().set_online(true);
    sleep(Duration::from_secs(5)).await;

    assert_eq!(backend.insert_calls(), 2);
    assert_eq!(backend.inner.row_count("workout_logs").await, 1);
    assert!(context.queue().is_empty().await);
    trigger.abort();
}

#[tokio::test(start_paused = true)]
async fn test_backoff_retry_waits_while_offline() {
    let backend = FlakyBackend::new();
    let (context, _) = offline_context(backend.clone(), true).await;
    let trigger = context.start();

    backend.fail_inserts("workout_logs", 1);
    context
        .queue_action(QueuedActionKind::LogWorkout, sample_payload_value("Offline retry"))
        .await;
    context.monitor().set_online(false);
    sleep(Duration::from_secs(10)).await;

    assert_eq!(backend.insert_calls(), 1);
    assert_eq!(context.status().await.pending, 1);
    trigger.abort();
}

struct SwitchProbe(AtomicBool);

#[async_trait]
impl ConnectivityProbe for SwitchProbe {
    async fn check(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[tokio::test(start_paused = true)]
async fn test_probe_feeds_monitor() {
    let monitor = Arc::new(ConnectivityMonitor::new(true));
    let probe = Arc::new(SwitchProbe(AtomicBool::new(true)));
    let mut changes = monitor.subscribe();
    let handle = spawn_probe(
        Arc::clone(&monitor),
        Arc::clone(&probe) as Arc<dyn ConnectivityProbe>,
        Duration::from_secs(15),
    );

    probe.0.store(false, Ordering::SeqCst);
    sleep(Duration::from_secs(16)).await;
    assert!(!monitor.is_online());
    assert!(changes.has_changed().unwrap());
    assert!(!*changes.borrow_and_update());

    probe.0.store(true, Ordering::SeqCst);
    sleep(Duration::from_secs(15)).await;
    assert!(monitor.is_online());
    handle.abort();
}
