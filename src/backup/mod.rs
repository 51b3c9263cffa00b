// ABOUTME: Backup export and the import wizard with per-item conflict resolution
// ABOUTME: JSON backups cover every user collection and import in dependency order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

/// Backup export
pub mod exporter;
/// Conflict analysis and merge
pub mod importer;
/// Import wizard state machine
pub mod wizard;

pub use exporter::Exporter;
pub use importer::{
    ConflictChoice, ConflictChoices, ConflictKey, ImportConflict, ImportFailure, ImportPlan,
    ImportProgress, ImportReport, Importer,
};
pub use wizard::{ImportWizard, WizardStep};
