// ABOUTME: Offline queue maintenance commands
// ABOUTME: Status, manual sync passes and dead-letter management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use crate::helpers::display;
use anyhow::Result;
use ironlog::app::AppContext;
use ironlog::offline::SyncOutcome;

pub async fn status(context: &AppContext) {
    let status = context.offline.status().await;
    display::offline_status(&status);
}

pub async fn sync(context: &AppContext, force: bool) {
    let outcome = if force {
        context.offline.force_sync().await
    } else {
        context.offline.sync_now().await
    };
    match outcome {
        SyncOutcome::Idle => println!("Queue is empty, nothing to sync"),
        SyncOutcome::AlreadyRunning => println!("A sync pass is already running"),
        SyncOutcome::Completed(report) => display::sync_report(&report),
    }
}

pub async fn dead_letters(context: &AppContext) {
    let actions = context.offline.dead_letters().await;
    if actions.is_empty() {
        println!("No dead letters");
        return;
    }
    for action in &actions {
        display::queued_action(action);
    }
}

pub async fn retry(context: &AppContext, id: &str) -> Result<()> {
    let action = context.offline.retry_dead_letter(id).await?;
    println!("Requeued {}", action.id);
    Ok(())
}

pub async fn discard(context: &AppContext, id: &str) -> Result<()> {
    let action = context.offline.discard_dead_letter(id).await?;
    println!("Discarded {}", action.id);
    Ok(())
}
