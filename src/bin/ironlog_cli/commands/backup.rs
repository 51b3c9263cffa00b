// ABOUTME: Backup export and import commands
// ABOUTME: Import runs the wizard non-interactively with one conflict choice for every row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use crate::helpers::display;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use ironlog::app::AppContext;
use ironlog::backup::{ConflictChoice, WizardStep};
use std::path::Path;

pub async fn export(context: &AppContext, out: &Path) -> Result<()> {
    let json = context.exporter().export_json(Utc::now()).await?;
    tokio::fs::write(out, json)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Backup written to {}", out.display());
    Ok(())
}

pub async fn import(context: &AppContext, file: &Path, on_conflict: ConflictChoice) -> Result<()> {
    let json = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut wizard = context.import_wizard();
    if let WizardStep::Failed(message) = wizard.load(&json).await? {
        bail!("Backup rejected: {message}");
    }
    if let Some(plan) = wizard.plan() {
        println!(
            "{} row(s), {} conflict(s), resolving with {on_conflict:?}",
            plan.total_rows(),
            plan.conflicts.len()
        );
    }
    wizard.choose_all(on_conflict);

    match wizard.run(display::import_progress).await? {
        WizardStep::Completed(report) => {
            display::import_report(report);
            Ok(())
        }
        WizardStep::Failed(message) => bail!("Import interrupted: {message}"),
        _ => bail!("Import did not finish"),
    }
}
