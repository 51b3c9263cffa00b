// ABOUTME: Configuration module for IronLog runtime settings
// ABOUTME: Everything is read from environment variables with typed defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Configuration module
//!
//! - **Environment**: typed sub-configurations for local storage, the remote
//!   backend, the sync policy, generation, nutrition lookup and workout defaults

/// Environment-driven configuration
pub mod environment;

pub use environment::{
    AppConfig, BackendConfig, GenerationConfig, HttpConfig, NutritionConfig, StorageConfig,
    StoreUrl, SyncConfig, WorkoutConfig,
};
