// ABOUTME: Backup import: conflict analysis and sequential merge into the backend
// ABOUTME: Per-item Skip, Overwrite or KeepBoth choices with progress reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Importer
//!
//! Import runs in two steps. [`Importer::analyze`] parses the file and
//! finds rows whose id already exists remotely. [`Importer::execute`]
//! then writes rows one at a time in dependency order, applying the
//! chosen [`ConflictChoice`] to each conflicting row.
//!
//! `KeepBoth` inserts the incoming row under a fresh id. When that row is
//! an exercise or a workout log, later performance rows pointing at the
//! old id are rewritten to point at the new one.

use ironlog_core::constants::backup::BACKUP_VERSION;
use ironlog_core::errors::{AppError, AppResult, ErrorCode};
use ironlog_core::models::{BackupCollection, BackupFile};
use ironlog_providers::{row_id, RemoteBackend};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What to do with an incoming row whose id already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictChoice {
    /// Leave the existing row untouched
    #[default]
    Skip,
    /// Replace the existing row
    Overwrite,
    /// Insert the incoming row under a new id
    KeepBoth,
}

impl FromStr for ConflictChoice {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "skip" => Ok(Self::Skip),
            "overwrite" => Ok(Self::Overwrite),
            "keep-both" => Ok(Self::KeepBoth),
            other => Err(AppError::invalid_input(format!(
                "Unknown conflict choice '{other}' (expected skip, overwrite or keep-both)"
            ))),
        }
    }
}

/// Identifies one row of a backup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConflictKey {
    /// Collection holding the row
    pub collection: BackupCollection,
    /// Row id
    pub id: String,
}

impl fmt::Display for ConflictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection.table(), self.id)
    }
}

/// An incoming row that collides with an existing one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportConflict {
    /// Which row
    pub key: ConflictKey,
    /// Row from the backup
    pub incoming: Value,
    /// Row already stored
    pub existing: Value,
}

/// Parsed backup plus the conflicts found against the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    /// Parsed backup
    pub backup: BackupFile,
    /// Conflicting rows in import order
    pub conflicts: Vec<ImportConflict>,
}

impl ImportPlan {
    /// Rows to process
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.backup.total_rows()
    }

    /// Whether any row collides
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Conflict choices: a default plus per-row overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictChoices {
    default: ConflictChoice,
    overrides: HashMap<ConflictKey, ConflictChoice>,
}

impl ConflictChoices {
    /// Apply `choice` to every conflict without an override
    #[must_use]
    pub fn all(choice: ConflictChoice) -> Self {
        Self {
            default: choice,
            overrides: HashMap::new(),
        }
    }

    /// Set the choice for one row
    pub fn set(&mut self, key: ConflictKey, choice: ConflictChoice) {
        self.overrides.insert(key, choice);
    }

    /// Replace the default choice
    pub fn set_default(&mut self, choice: ConflictChoice) {
        self.default = choice;
    }

    /// Choice for a row
    #[must_use]
    pub fn choice_for(&self, key: &ConflictKey) -> ConflictChoice {
        self.overrides.get(key).copied().unwrap_or(self.default)
    }
}

/// Progress of a running import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportProgress {
    /// Rows processed so far
    pub done: usize,
    /// Rows in the backup
    pub total: usize,
}

/// A row that could not be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    /// Collection of the row
    pub collection: BackupCollection,
    /// Row id, when it had one
    pub id: Option<String>,
    /// Error message
    pub message: String,
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// New rows written
    pub inserted: usize,
    /// Existing rows overwritten
    pub updated: usize,
    /// Conflicting rows left alone
    pub skipped: usize,
    /// Rows that failed
    pub failed: usize,
    /// Details of the failed rows
    pub failures: Vec<ImportFailure>,
}

/// Old id to new id for rows re-inserted by `KeepBoth`
#[derive(Default)]
struct IdRemap {
    exercises: HashMap<String, String>,
    workout_logs: HashMap<String, String>,
}

impl IdRemap {
    fn record(&mut self, collection: BackupCollection, old: String, new: String) {
        match collection {
            BackupCollection::Exercises => {
                self.exercises.insert(old, new);
            }
            BackupCollection::WorkoutLogs => {
                self.workout_logs.insert(old, new);
            }
            _ => {}
        }
    }

    fn apply(&self, collection: BackupCollection, row: &mut Value) {
        if collection != BackupCollection::Performances {
            return;
        }
        let Some(fields) = row.as_object_mut() else {
            return;
        };
        for (field, map) in [
            ("exercise_id", &self.exercises),
            ("workout_id", &self.workout_logs),
        ] {
            let replacement = fields
                .get(field)
                .and_then(Value::as_str)
                .and_then(|old| map.get(old));
            if let Some(new) = replacement {
                fields.insert(field.to_owned(), Value::String(new.clone()));
            }
        }
    }
}

fn with_id(mut row: Value, id: &str) -> Value {
    if let Some(fields) = row.as_object_mut() {
        fields.insert("id".to_owned(), Value::String(id.to_owned()));
    }
    row
}

/// Merges a backup into the backend
#[derive(Clone)]
pub struct Importer {
    backend: Arc<dyn RemoteBackend>,
}

impl Importer {
    /// Importer writing to `backend`
    #[must_use]
    pub fn new(backend: Arc<dyn RemoteBackend>) -> Self {
        Self { backend }
    }

    /// Parse a backup and find rows that collide with existing ones
    ///
    /// # Errors
    ///
    /// Returns an invalid-format error for unparsable JSON or a newer
    /// backup version, and the backend error if existing rows cannot be read.
    pub async fn analyze(&self, json: &str) -> AppResult<ImportPlan> {
        let backup: BackupFile = serde_json::from_str(json).map_err(|e| {
            AppError::new(ErrorCode::InvalidFormat, format!("Not a backup file: {e}"))
        })?;
        if backup.version > BACKUP_VERSION {
            return Err(AppError::new(
                ErrorCode::InvalidFormat,
                format!(
                    "Backup version {} is newer than supported version {BACKUP_VERSION}",
                    backup.version
                ),
            ));
        }

        let mut conflicts = Vec::new();
        for collection in BackupCollection::IMPORT_ORDER {
            for row in backup.rows(collection) {
                let Some(id) = row_id(row) else {
                    continue;
                };
                let existing = self.backend.select_by_id(collection.table(), &id).await?;
                if let Some(existing) = existing {
                    conflicts.push(ImportConflict {
                        key: ConflictKey { collection, id },
                        incoming: row.clone(),
                        existing,
                    });
                }
            }
        }

        info!(
            rows = backup.total_rows(),
            conflicts = conflicts.len(),
            "Backup analyzed"
        );
        Ok(ImportPlan { backup, conflicts })
    }

    /// Write every row of the plan sequentially
    ///
    /// Individual row failures are recorded in the report and the import
    /// continues. It stops early only when the backend becomes unreachable.
    ///
    /// # Errors
    ///
    /// Returns the connectivity error that interrupted the import.
    pub async fn execute(
        &self,
        plan: &ImportPlan,
        choices: &ConflictChoices,
        mut progress: impl FnMut(ImportProgress),
    ) -> AppResult<ImportReport> {
        let conflicting: HashMap<&ConflictKey, &ImportConflict> =
            plan.conflicts.iter().map(|c| (&c.key, c)).collect();
        let total = plan.total_rows();
        let mut report = ImportReport::default();
        let mut remap = IdRemap::default();
        let mut done = 0;

        for collection in BackupCollection::IMPORT_ORDER {
            let table = collection.table();
            for row in plan.backup.rows(collection) {
                let mut row = row.clone();
                remap.apply(collection, &mut row);
                let id = row_id(&row);
                let choice = id
                    .as_ref()
                    .map(|id| ConflictKey {
                        collection,
                        id: id.clone(),
                    })
                    .filter(|key| conflicting.contains_key(key))
                    .map(|key| choices.choice_for(&key));

                let result = match (choice, id.as_deref()) {
                    (Some(ConflictChoice::Skip), _) => {
                        report.skipped += 1;
                        Ok(())
                    }
                    (Some(ConflictChoice::Overwrite), Some(id)) => self
                        .backend
                        .update_row(table, id, row)
                        .await
                        .map(|()| report.updated += 1),
                    (Some(ConflictChoice::KeepBoth), Some(old_id)) => {
                        let new_id = Uuid::new_v4().to_string();
                        let renamed = with_id(row, &new_id);
                        let inserted = self.backend.insert_rows(table, vec![renamed]).await;
                        if inserted.is_ok() {
                            debug!(table, old_id, new_id = %new_id, "Kept both rows");
                            remap.record(collection, old_id.to_owned(), new_id);
                            report.inserted += 1;
                        }
                        inserted.map(|_| ())
                    }
                    _ => self
                        .backend
                        .insert_rows(table, vec![row])
                        .await
                        .map(|_| report.inserted += 1),
                };

                if let Err(e) = result {
                    if e.should_fall_back() {
                        warn!(table, error = %e, "Backend unreachable, import interrupted");
                        return Err(e.into());
                    }
                    warn!(
                        table,
                        id = id.as_deref().unwrap_or_default(),
                        error = %e,
                        "Row import failed"
                    );
                    report.failed += 1;
                    report.failures.push(ImportFailure {
                        collection,
                        id,
                        message: e.to_string(),
                    });
                }

                done += 1;
                progress(ImportProgress { done, total });
            }
        }

        info!(
            inserted = report.inserted,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            "Backup imported"
        );
        Ok(report)
    }
}
