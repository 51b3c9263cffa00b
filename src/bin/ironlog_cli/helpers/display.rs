// ABOUTME: Output formatting helpers for ironlog-cli
// ABOUTME: Plate breakdowns, queue status, sync reports and import summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use ironlog::backup::{ImportProgress, ImportReport};
use ironlog::intelligence::PlateBreakdown;
use ironlog::models::QueuedAction;
use ironlog::offline::{OfflineStatus, SyncReport};
use std::io::Write;

pub fn plates(target: f64, bar: f64, breakdown: &PlateBreakdown) {
    println!("Target: {target} kg on a {bar} kg bar");
    if breakdown.plates.is_empty() {
        println!("Bar only");
    } else {
        let per_side: Vec<String> = breakdown.plates.iter().map(|p| format!("{p}")).collect();
        println!("Per side: {}", per_side.join(" + "));
    }
    println!("Loaded: {} kg", breakdown.closest_valid_weight);
    if breakdown.remainder > 0.0 {
        println!("Cannot load: {} kg", breakdown.remainder);
    }
}

pub fn offline_status(status: &OfflineStatus) {
    println!("Online: {}", if status.is_online { "yes" } else { "no" });
    println!("Pending actions: {}", status.pending);
    println!("Dead letters: {}", status.dead_lettered);
    if status.is_syncing {
        println!("A sync pass is running");
    }
}

pub fn sync_report(report: &SyncReport) {
    println!("Sync pass finished");
    println!("{}", "=".repeat(40));
    println!("  attempted:     {}", report.attempted);
    println!("  succeeded:     {}", report.succeeded);
    println!("  failed:        {}", report.failed);
    println!("  deferred:      {}", report.deferred);
    println!("  dead-lettered: {}", report.dead_lettered);
    println!("  remaining:     {}", report.remaining);
}

pub fn queued_action(action: &QueuedAction) {
    println!(
        "{}  {}  queued {}  attempts {}",
        action.id,
        action.kind.as_str(),
        action.created_at.format("%Y-%m-%d %H:%M UTC"),
        action.attempts
    );
    if let Some(error) = &action.last_error {
        println!("    last error: {error}");
    }
}

pub fn import_progress(progress: ImportProgress) {
    print!("\rImporting {}/{}", progress.done, progress.total);
    // progress output is best effort
    let _ = std::io::stdout().flush();
}

pub fn import_report(report: &ImportReport) {
    println!();
    println!("Import complete");
    println!("{}", "=".repeat(40));
    println!("  inserted: {}", report.inserted);
    println!("  updated:  {}", report.updated);
    println!("  skipped:  {}", report.skipped);
    println!("  failed:   {}", report.failed);
    for failure in &report.failures {
        println!(
            "    {} {}: {}",
            failure.collection.table(),
            failure.id.as_deref().unwrap_or("(no id)"),
            failure.message
        );
    }
}
