// ABOUTME: IronLog CLI - plate math, strength stats, offline queue maintenance and backups
// ABOUTME: Thin clap front end over the ironlog library
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors
//!
//! Usage:
//! ```bash
//! # Plates per side for 143 kg on a 20 kg bar
//! ironlog-cli plates --target 143
//!
//! # Estimated one-rep max
//! ironlog-cli one-rm --weight 100 --reps 5
//!
//! # Offline queue status, sync and dead letters
//! ironlog-cli queue status
//! ironlog-cli queue sync --force
//! ironlog-cli queue dead-letters
//! ironlog-cli queue retry <action-id>
//!
//! # Backups
//! ironlog-cli export --out backup.json
//! ironlog-cli import --file backup.json --on-conflict keep-both
//!
//! # Training streak from a file of YYYY-MM-DD dates
//! ironlog-cli streak --dates workouts.txt
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ironlog::app::AppContext;
use ironlog::backup::ConflictChoice;
use ironlog::config::AppConfig;
use ironlog::logging::LoggingConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ironlog-cli",
    about = "IronLog workout tracker CLI",
    long_about = "Plate math and strength calculators, offline queue maintenance, and backup import/export."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Plates to load on each side of the bar
    Plates {
        /// Target total weight in kg
        #[arg(long)]
        target: f64,

        /// Bar weight in kg (defaults to IRONLOG_DEFAULT_BAR_WEIGHT or 20)
        #[arg(long)]
        bar: Option<f64>,
    },

    /// Epley one-rep max estimate
    OneRm {
        /// Weight lifted in kg
        #[arg(long)]
        weight: f64,

        /// Repetitions performed
        #[arg(long)]
        reps: u32,
    },

    /// Offline action queue
    Queue {
        #[command(subcommand)]
        action: QueueCommand,
    },

    /// Export every collection to a JSON backup
    Export {
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },

    /// Import a JSON backup
    Import {
        /// Backup file
        #[arg(long)]
        file: PathBuf,

        /// What to do with rows whose id already exists
        #[arg(long, value_enum, default_value_t = OnConflict::Skip)]
        on_conflict: OnConflict,
    },

    /// Current and longest training streak
    Streak {
        /// File with one YYYY-MM-DD date per line
        #[arg(long)]
        dates: PathBuf,

        /// Day to count from (defaults to today, UTC)
        #[arg(long)]
        today: Option<chrono::NaiveDate>,
    },
}

#[derive(Subcommand)]
enum QueueCommand {
    /// Pending and dead-lettered counts
    Status,

    /// Run a sync pass now
    Sync {
        /// Ignore retry backoff
        #[arg(long)]
        force: bool,
    },

    /// List actions that exhausted their retries
    DeadLetters,

    /// Move a dead letter back into the queue
    Retry {
        /// Action id
        id: String,
    },

    /// Drop a dead letter permanently
    Discard {
        /// Action id
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OnConflict {
    Skip,
    Overwrite,
    KeepBoth,
}

impl From<OnConflict> for ConflictChoice {
    fn from(value: OnConflict) -> Self {
        match value {
            OnConflict::Skip => Self::Skip,
            OnConflict::Overwrite => Self::Overwrite,
            OnConflict::KeepBoth => Self::KeepBoth,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    LoggingConfig::for_cli(cli.verbose).init()?;

    let config = AppConfig::from_env()?;

    match cli.command {
        Command::Plates { target, bar } => {
            commands::calc::plates(target, bar.unwrap_or(config.workout.default_bar_weight_kg))?;
        }
        Command::OneRm { weight, reps } => commands::calc::one_rep_max(weight, reps),
        Command::Streak { dates, today } => commands::calc::streak(&dates, today).await?,
        Command::Queue { action } => {
            let context = AppContext::bootstrap(config).await?;
            match action {
                QueueCommand::Status => commands::queue::status(&context).await,
                QueueCommand::Sync { force } => commands::queue::sync(&context, force).await,
                QueueCommand::DeadLetters => commands::queue::dead_letters(&context).await,
                QueueCommand::Retry { id } => commands::queue::retry(&context, &id).await?,
                QueueCommand::Discard { id } => commands::queue::discard(&context, &id).await?,
            }
        }
        Command::Export { out } => {
            let context = AppContext::bootstrap(config).await?;
            commands::backup::export(&context, &out).await?;
        }
        Command::Import { file, on_conflict } => {
            let context = AppContext::bootstrap(config).await?;
            commands::backup::import(&context, &file, on_conflict.into()).await?;
        }
    }

    Ok(())
}
