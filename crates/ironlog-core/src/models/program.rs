// ABOUTME: Multi-week training program models
// ABOUTME: Program made of weeks, each week made of training days with planned exercises
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::workout::PlannedExercise;
use serde::{Deserialize, Serialize};

/// One training day inside a program week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDay {
    /// Day index within the week, starting at 1
    pub day: u32,
    /// Session name (e.g. "Upper A")
    pub name: String,
    /// Exercises for the session
    pub exercises: Vec<PlannedExercise>,
}

/// One week of a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramWeek {
    /// Week index, starting at 1
    pub week: u32,
    /// Training days
    pub days: Vec<ProgramDay>,
}

/// A multi-week program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Unique identifier
    pub id: String,
    /// Program name
    pub name: String,
    /// Training goal (strength, hypertrophy...)
    pub goal: String,
    /// Length in weeks
    pub weeks: u32,
    /// Training days per week
    pub days_per_week: u32,
    /// Week-by-week schedule
    pub schedule: Vec<ProgramWeek>,
}
