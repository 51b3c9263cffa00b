// ABOUTME: Main library entry point for the IronLog workout tracker core
// ABOUTME: Offline-first workout logging, active sessions, generated content, nutrition and backups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![deny(unsafe_code)]

//! # IronLog
//!
//! The offline-capable core of a workout tracker. The presentation layer
//! sits on top of this crate; everything it needs to work without a
//! connection lives here.
//!
//! ## Architecture
//!
//! - **offline**: persistent action queue, sync executor with backoff and
//!   dead letters, connectivity monitor
//! - **workout**: active session state machine, one-second timer driver,
//!   conversion into workout and performance records
//! - **services**: workout logging through the queue, generated content
//!   with local fallbacks, food lookup with a bundled dataset fallback
//! - **backup**: JSON export and the import wizard
//! - **storage**: local key-value persistence (SQLite or memory)
//! - **config** / **logging**: environment configuration and tracing setup
//!
//! Pure algorithms live in `ironlog-intelligence`, external clients in
//! `ironlog-providers`, and shared types in `ironlog-core`.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ironlog::app::AppContext;
//! use ironlog::config::AppConfig;
//! use ironlog::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let context = AppContext::bootstrap(AppConfig::from_env()?).await?;
//!     let status = context.offline.status().await;
//!     println!("{} action(s) waiting to sync", status.pending);
//!     Ok(())
//! }
//! ```

pub use ironlog_core::constants;
pub use ironlog_core::errors;
pub use ironlog_core::models;
pub use ironlog_intelligence as intelligence;
pub use ironlog_providers as providers;

/// Application context built from configuration
pub mod app;
/// Backup export and import
pub mod backup;
/// Environment configuration
pub mod config;
/// Tracing subscriber setup
pub mod logging;
/// Offline queue, sync and connectivity
pub mod offline;
/// Application services
pub mod services;
/// Local persisted state
pub mod storage;
/// Active workout sessions
pub mod workout;
