// ABOUTME: Offline calculators: plate loading, one-rep max and training streaks
// ABOUTME: Pure computations that never touch storage or the network
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use crate::helpers::display;
use anyhow::{ensure, Context, Result};
use chrono::{NaiveDate, Utc};
use ironlog::constants::workout::MAX_LOAD_PER_SIDE_KG;
use ironlog::intelligence::{
    calculate_plates, current_streak, epley_one_rep_max, estimated_one_rep_max, longest_streak,
};
use std::path::Path;
use tracing::warn;

pub fn plates(target: f64, bar: f64) -> Result<()> {
    ensure!(
        bar.is_finite() && bar >= 0.0,
        "Bar weight must be a non-negative number of kg"
    );
    let max_target = bar + MAX_LOAD_PER_SIDE_KG * 2.0;
    ensure!(
        target.is_finite() && target <= max_target,
        "Target must be at most {max_target} kg with a {bar} kg bar"
    );
    let breakdown = calculate_plates(target, bar);
    display::plates(target, bar, &breakdown);
    Ok(())
}

pub fn one_rep_max(weight: f64, reps: u32) {
    println!(
        "Estimated 1RM: {} kg (Epley {:.1})",
        estimated_one_rep_max(weight, reps),
        epley_one_rep_max(weight, reps)
    );
}

pub async fn streak(path: &Path, today: Option<NaiveDate>) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let dates: Vec<NaiveDate> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match line.parse() {
            Ok(date) => Some(date),
            Err(e) => {
                warn!(line, error = %e, "Skipping unparsable date");
                None
            }
        })
        .collect();

    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    println!("Workout days: {}", dates.len());
    println!("Current streak: {} day(s)", current_streak(&dates, today));
    println!("Longest streak: {} day(s)", longest_streak(&dates));
    Ok(())
}
