// ABOUTME: Body measurement records tracked over time
// ABOUTME: Weight, body fat and circumference measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single body measurement entry; every metric is optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    /// Unique identifier
    pub id: String,
    /// When the measurement was taken
    pub measured_at: DateTime<Utc>,
    /// Body weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Body fat percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_pct: Option<f64>,
    /// Waist circumference in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist_cm: Option<f64>,
    /// Chest circumference in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest_cm: Option<f64>,
    /// Upper arm circumference in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arm_cm: Option<f64>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
