// ABOUTME: Core types and constants for the IronLog workout tracker
// ABOUTME: Foundation crate with error handling, constants, and domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![deny(unsafe_code)]

//! # IronLog Core
//!
//! Foundation crate providing shared types and constants for the IronLog
//! workout tracker. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ProviderError`
//! - **constants**: Application-wide constants organized by domain
//! - **models**: Exercises, workouts, performances, queued actions, nutrition and backups

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants and default values organized by domain
pub mod constants;

/// Core data models shared by every crate in the workspace
pub mod models;
