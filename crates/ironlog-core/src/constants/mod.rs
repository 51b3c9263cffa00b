// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants organized by domain for the IronLog tracker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Constants module
//!
//! Application constants grouped by domain rather than kept in a single large file.

/// Local storage keys and cache retention
pub mod storage;
/// Offline queue and sync scheduling defaults
pub mod sync;
/// Backend table names
pub mod tables;

/// Service names used in logs and error messages
pub mod service_names {
    /// Application name
    pub const IRONLOG: &str = "ironlog";
    /// Remote row store
    pub const BACKEND: &str = "backend";
    /// Generative model API
    pub const GENERATIVE_MODEL: &str = "generative-model";
    /// Public food composition database
    pub const FOOD_DATABASE: &str = "open-food-facts";
}

/// Active workout defaults
pub mod workout {
    /// Rest duration used when an exercise has none configured
    pub const DEFAULT_REST_SECS: u32 = 60;
    /// Reps pre-filled when neither the session nor history has a previous set
    pub const DEFAULT_SET_REPS: u32 = 10;
    /// Seconds added by a single "extend rest" action
    pub const REST_EXTENSION_SECS: u32 = 30;
    /// Standard olympic bar weight in kilograms
    pub const DEFAULT_BAR_WEIGHT_KG: f64 = 20.0;
    /// Plate denominations in kilograms, heaviest first
    pub const PLATE_DENOMINATIONS_KG: [f64; 7] = [25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25];
    /// Most weight the calculator will load on one side of the bar
    pub const MAX_LOAD_PER_SIDE_KG: f64 = 500.0;
}

/// Bounds applied to generated content before it is accepted
pub mod generation {
    /// Accepted deviation from the requested recipe calories (25%)
    pub const RECIPE_CALORIE_TOLERANCE: f64 = 0.25;
    /// Maximum sets per generated exercise
    pub const MAX_SETS: u32 = 10;
    /// Maximum reps per generated set
    pub const MAX_REPS: u32 = 50;
    /// Maximum generated rest between sets
    pub const MAX_REST_SECS: u32 = 600;
    /// Maximum generated program length
    pub const MAX_PROGRAM_WEEKS: u32 = 16;
    /// Maximum relative weight change per overload adjustment (10%)
    pub const MAX_WEIGHT_ADJUSTMENT_RATIO: f64 = 0.10;
    /// Maximum rep change per overload adjustment
    pub const MAX_REP_ADJUSTMENT: i32 = 3;
    /// Weight increment when every target rep was achieved
    pub const PROGRESSION_INCREMENT_KG: f64 = 2.5;
    /// Deload ratio after repeated missed targets
    pub const DELOAD_RATIO: f64 = 0.90;
    /// Consecutive missed sessions before a deload is suggested
    pub const DELOAD_AFTER_MISSES: usize = 2;
}

/// Backup file format
pub mod backup {
    /// Current backup schema version
    pub const BACKUP_VERSION: u32 = 1;
}
