// ABOUTME: Integration tests for backup export, import analysis and the import wizard
// ABOUTME: Conflict choices, id remapping, per-row failures and connectivity interruptions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{init_test_logging, reference_time, FlakyBackend};
use ironlog::backup::{
    ConflictChoice, ConflictKey, Exporter, ImportProgress, ImportWizard, Importer, WizardStep,
};
use ironlog::errors::ErrorCode;
use ironlog::models::{BackupCollection, BackupFile};
use ironlog::providers::RemoteBackend;
use serde_json::json;
use std::sync::Arc;

fn backup_json(mut edit: impl FnMut(&mut BackupFile)) -> String {
    let mut backup = BackupFile::empty(reference_time());
    edit(&mut backup);
    serde_json::to_string(&backup).unwrap()
}

fn wizard(backend: &Arc<FlakyBackend>) -> ImportWizard {
    init_test_logging();
    ImportWizard::new(Importer::new(backend.clone()))
}

#[tokio::test]
async fn test_export_then_import_into_empty_backend() {
    let source = FlakyBackend::new();
    source
        .insert_rows("exercises", vec![json!({"id": "ex-1", "name": "Back Squat"})])
        .await
        .unwrap();
    source
        .insert_rows("workout_logs", vec![json!({"id": "w-1", "name": "Legs"})])
        .await
        .unwrap();
    let json = Exporter::new(source.clone())
        .export_json(reference_time())
        .await
        .unwrap();

    let target = FlakyBackend::new();
    let mut wizard = wizard(&target);
    assert_eq!(wizard.load(&json).await.unwrap(), &WizardStep::ResolveConflicts);
    assert!(!wizard.plan().unwrap().has_conflicts());

    let mut seen = Vec::new();
    let step = wizard.run(|p: ImportProgress| seen.push(p)).await.unwrap().clone();
    let WizardStep::Completed(report) = step else {
        panic!("import did not complete: {step:?}");
    };
    assert_eq!(report.inserted, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(seen.last(), Some(&ImportProgress { done: 2, total: 2 }));
    assert_eq!(target.inner.row_count("exercises").await, 1);
    assert_eq!(target.inner.row_count("workout_logs").await, 1);
}

#[tokio::test]
async fn test_unparsable_file_fails_and_can_be_retried() {
    let backend = FlakyBackend::new();
    let mut wizard = wizard(&backend);

    let step = wizard.load("{ not a backup").await.unwrap().clone();
    assert!(matches!(step, WizardStep::Failed(_)));
    assert!(wizard.retry());
    assert_eq!(wizard.step(), &WizardStep::SelectFile);
    assert!(!wizard.retry());
}

#[tokio::test]
async fn test_newer_backup_version_is_rejected() {
    let backend = FlakyBackend::new();
    let json = backup_json(|b| b.version = 99);
    let error = Importer::new(backend.clone()).analyze(&json).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidFormat);
}

#[tokio::test]
async fn test_skip_leaves_existing_rows_untouched() {
    let backend = FlakyBackend::new();
    backend
        .insert_rows("recipes", vec![json!({"id": "r-1", "title": "Mine"})])
        .await
        .unwrap();
    let json = backup_json(|b| {
        b.recipes = vec![
            json!({"id": "r-1", "title": "Theirs"}),
            json!({"id": "r-2", "title": "New"}),
        ];
    });

    let mut wizard = wizard(&backend);
    wizard.load(&json).await.unwrap();
    assert_eq!(wizard.plan().unwrap().conflicts.len(), 1);

    let step = wizard.run(|_| {}).await.unwrap().clone();
    let WizardStep::Completed(report) = step else {
        panic!("import did not complete");
    };
    assert_eq!(report.skipped, 1);
    assert_eq!(report.inserted, 1);
    let kept = backend.inner.select_by_id("recipes", "r-1").await.unwrap().unwrap();
    assert_eq!(kept["title"], json!("Mine"));
}

#[tokio::test]
async fn test_overwrite_replaces_existing_row() {
    let backend = FlakyBackend::new();
    backend
        .insert_rows("measurements", vec![json!({"id": "m-1", "weight_kg": 82.0})])
        .await
        .unwrap();
    let json = backup_json(|b| b.measurements = vec![json!({"id": "m-1", "weight_kg": 80.5})]);

    let mut wizard = wizard(&backend);
    wizard.load(&json).await.unwrap();
    wizard.choose_all(ConflictChoice::Overwrite);
    let step = wizard.run(|_| {}).await.unwrap().clone();
    assert!(matches!(step, WizardStep::Completed(ref r) if r.updated == 1));

    let row = backend.inner.select_by_id("measurements", "m-1").await.unwrap().unwrap();
    assert_eq!(row["weight_kg"], json!(80.5));
}

#[tokio::test]
async fn test_keep_both_remaps_dependent_rows() {
    let backend = FlakyBackend::new();
    backend
        .insert_rows("workout_logs", vec![json!({"id": "w-1", "name": "Existing"})])
        .await
        .unwrap();
    let json = backup_json(|b| {
        b.workout_logs = vec![json!({"id": "w-1", "name": "Imported"})];
        b.performances = vec![json!({"id": "p-1", "workout_id": "w-1", "exercise_name": "Row"})];
    });

    let mut wizard = wizard(&backend);
    wizard.load(&json).await.unwrap();
    wizard.choose(
        ConflictKey {
            collection: BackupCollection::WorkoutLogs,
            id: "w-1".to_owned(),
        },
        ConflictChoice::KeepBoth,
    );
    wizard.run(|_| {}).await.unwrap();

    let logs = backend.inner.rows("workout_logs").await;
    assert_eq!(logs.len(), 2);
    let imported = logs.iter().find(|r| r["name"] == json!("Imported")).unwrap();
    assert_ne!(imported["id"], json!("w-1"));

    let performance = &backend.inner.rows("exercise_performances").await[0];
    assert_eq!(performance["workout_id"], imported["id"]);
}

#[tokio::test]
async fn test_rejected_rows_are_reported_and_import_continues() {
    let backend = FlakyBackend::new();
    backend.reject_inserts("programs");
    let json = backup_json(|b| {
        b.programs = vec![json!({"id": "prog-1", "name": "5/3/1"})];
        b.recipes = vec![json!({"id": "r-1", "title": "Oats"})];
    });

    let mut wizard = wizard(&backend);
    wizard.load(&json).await.unwrap();
    let step = wizard.run(|_| {}).await.unwrap().clone();
    let WizardStep::Completed(report) = step else {
        panic!("import did not complete");
    };
    assert_eq!(report.failed, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.failures[0].collection, BackupCollection::Programs);
    assert_eq!(report.failures[0].id.as_deref(), Some("prog-1"));
}

#[tokio::test]
async fn test_lost_connection_interrupts_import() {
    let backend = FlakyBackend::new();
    let json = backup_json(|b| b.exercises = vec![json!({"id": "ex-1", "name": "Curl"})]);

    let mut wizard = wizard(&backend);
    wizard.load(&json).await.unwrap();
    backend.set_offline(true);

    let step = wizard.run(|_| {}).await.unwrap().clone();
    assert!(matches!(step, WizardStep::Failed(_)));
    assert!(wizard.retry());
    assert!(wizard.plan().is_none());
}

#[tokio::test]
async fn test_run_without_loaded_file_is_an_error() {
    let backend = FlakyBackend::new();
    let mut wizard = wizard(&backend);
    let error = wizard.run(|_| {}).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[test]
fn test_conflict_choice_parsing() {
    assert_eq!("skip".parse::<ConflictChoice>().unwrap(), ConflictChoice::Skip);
    assert_eq!("Keep_Both".parse::<ConflictChoice>().unwrap(), ConflictChoice::KeepBoth);
    assert!("merge".parse::<ConflictChoice>().is_err());
}
