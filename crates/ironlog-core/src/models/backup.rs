// ABOUTME: JSON backup file format shared by the exporter and the import wizard
// ABOUTME: One array of backend rows per collection, imported in dependency order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use crate::constants::{backup::BACKUP_VERSION, tables};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collections carried by a backup, listed in import order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupCollection {
    /// Exercise catalogue
    Exercises,
    /// Workout plans
    WorkoutPlans,
    /// Programs
    Programs,
    /// Recipes
    Recipes,
    /// Food log entries
    FoodLogs,
    /// Body measurements
    Measurements,
    /// Completed workout headers
    WorkoutLogs,
    /// Performance rows (reference workout logs, so imported last)
    Performances,
}

impl BackupCollection {
    /// All collections in import order
    pub const IMPORT_ORDER: [Self; 8] = [
        Self::Exercises,
        Self::WorkoutPlans,
        Self::Programs,
        Self::Recipes,
        Self::FoodLogs,
        Self::Measurements,
        Self::WorkoutLogs,
        Self::Performances,
    ];

    /// Backend table holding this collection
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Exercises => tables::EXERCISES,
            Self::WorkoutPlans => tables::WORKOUT_PLANS,
            Self::Programs => tables::PROGRAMS,
            Self::Recipes => tables::RECIPES,
            Self::FoodLogs => tables::FOOD_LOGS,
            Self::Measurements => tables::MEASUREMENTS,
            Self::WorkoutLogs => tables::WORKOUT_LOGS,
            Self::Performances => tables::EXERCISE_PERFORMANCES,
        }
    }
}

/// A full account backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupFile {
    /// Schema version
    pub version: u32,
    /// When the backup was produced
    pub exported_at: DateTime<Utc>,
    /// Exercise rows
    #[serde(default)]
    pub exercises: Vec<Value>,
    /// Workout plan rows
    #[serde(default)]
    pub workout_plans: Vec<Value>,
    /// Program rows
    #[serde(default)]
    pub programs: Vec<Value>,
    /// Recipe rows
    #[serde(default)]
    pub recipes: Vec<Value>,
    /// Food log rows
    #[serde(default)]
    pub food_logs: Vec<Value>,
    /// Measurement rows
    #[serde(default)]
    pub measurements: Vec<Value>,
    /// Completed workout header rows
    #[serde(default)]
    pub workout_logs: Vec<Value>,
    /// Performance rows
    #[serde(default)]
    pub performances: Vec<Value>,
}

impl BackupFile {
    /// An empty backup stamped with the current schema version
    #[must_use]
    pub fn empty(exported_at: DateTime<Utc>) -> Self {
        Self {
            version: BACKUP_VERSION,
            exported_at,
            exercises: Vec::new(),
            workout_plans: Vec::new(),
            programs: Vec::new(),
            recipes: Vec::new(),
            food_logs: Vec::new(),
            measurements: Vec::new(),
            workout_logs: Vec::new(),
            performances: Vec::new(),
        }
    }

    /// Rows of one collection
    #[must_use]
    pub fn rows(&self, collection: BackupCollection) -> &[Value] {
        match collection {
            BackupCollection::Exercises => &self.exercises,
            BackupCollection::WorkoutPlans => &self.workout_plans,
            BackupCollection::Programs => &self.programs,
            BackupCollection::Recipes => &self.recipes,
            BackupCollection::FoodLogs => &self.food_logs,
            BackupCollection::Measurements => &self.measurements,
            BackupCollection::WorkoutLogs => &self.workout_logs,
            BackupCollection::Performances => &self.performances,
        }
    }

    /// Mutable rows of one collection
    pub fn rows_mut(&mut self, collection: BackupCollection) -> &mut Vec<Value> {
        match collection {
            BackupCollection::Exercises => &mut self.exercises,
            BackupCollection::WorkoutPlans => &mut self.workout_plans,
            BackupCollection::Programs => &mut self.programs,
            BackupCollection::Recipes => &mut self.recipes,
            BackupCollection::FoodLogs => &mut self.food_logs,
            BackupCollection::Measurements => &mut self.measurements,
            BackupCollection::WorkoutLogs => &mut self.workout_logs,
            BackupCollection::Performances => &mut self.performances,
        }
    }

    /// Total number of rows across collections
    #[must_use]
    pub fn total_rows(&self) -> usize {
        BackupCollection::IMPORT_ORDER
            .iter()
            .map(|c| self.rows(*c).len())
            .sum()
    }
}
