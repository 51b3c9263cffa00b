// ABOUTME: Import wizard state machine driving file selection, conflict resolution and import
// ABOUTME: Failures land in a terminal Failed state that can be retried from the start
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::importer::{
    ConflictChoice, ConflictChoices, ConflictKey, ImportPlan, ImportProgress, ImportReport,
    Importer,
};
use ironlog_core::errors::{AppError, AppResult};
use tracing::warn;

/// Wizard screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    /// Waiting for a backup file
    SelectFile,
    /// Backup parsed; conflicts (if any) await choices
    ResolveConflicts,
    /// Import running
    Importing {
        /// Rows processed
        done: usize,
        /// Rows in the backup
        total: usize,
    },
    /// Import finished
    Completed(ImportReport),
    /// Import could not run or was interrupted
    Failed(String),
}

/// Drives one import from file to report
pub struct ImportWizard {
    importer: Importer,
    step: WizardStep,
    plan: Option<ImportPlan>,
    choices: ConflictChoices,
}

impl ImportWizard {
    /// Wizard at the file selection step
    #[must_use]
    pub fn new(importer: Importer) -> Self {
        Self {
            importer,
            step: WizardStep::SelectFile,
            plan: None,
            choices: ConflictChoices::default(),
        }
    }

    /// Current step
    #[must_use]
    pub const fn step(&self) -> &WizardStep {
        &self.step
    }

    /// Analyzed plan, once a file was loaded
    #[must_use]
    pub const fn plan(&self) -> Option<&ImportPlan> {
        self.plan.as_ref()
    }

    /// Parse and analyze a backup
    ///
    /// # Errors
    ///
    /// Returns an error when the wizard is not waiting for a file. Problems
    /// with the file itself move the wizard to [`WizardStep::Failed`].
    pub async fn load(&mut self, json: &str) -> AppResult<&WizardStep> {
        if self.step != WizardStep::SelectFile {
            return Err(AppError::invalid_input("Import wizard is not waiting for a file"));
        }
        match self.importer.analyze(json).await {
            Ok(plan) => {
                self.plan = Some(plan);
                self.step = WizardStep::ResolveConflicts;
            }
            Err(e) => {
                warn!(error = %e, "Backup could not be analyzed");
                self.step = WizardStep::Failed(e.message);
            }
        }
        Ok(&self.step)
    }

    /// Choose how one conflicting row is handled
    pub fn choose(&mut self, key: ConflictKey, choice: ConflictChoice) {
        self.choices.set(key, choice);
    }

    /// Choose how every conflict without an explicit choice is handled
    pub fn choose_all(&mut self, choice: ConflictChoice) {
        self.choices.set_default(choice);
    }

    /// Run the import, reporting progress after each row
    ///
    /// # Errors
    ///
    /// Returns an error when no analyzed backup is waiting for import.
    pub async fn run(
        &mut self,
        mut on_progress: impl FnMut(ImportProgress),
    ) -> AppResult<&WizardStep> {
        let Self {
            importer,
            step,
            plan,
            choices,
        } = &mut *self;
        let (WizardStep::ResolveConflicts, Some(plan)) = (&*step, plan.as_ref()) else {
            return Err(AppError::invalid_input("No backup is ready to import"));
        };

        *step = WizardStep::Importing {
            done: 0,
            total: plan.total_rows(),
        };
        let result = importer
            .execute(plan, choices, |progress| {
                *step = WizardStep::Importing {
                    done: progress.done,
                    total: progress.total,
                };
                on_progress(progress);
            })
            .await;

        *step = match result {
            Ok(report) => WizardStep::Completed(report),
            Err(e) => WizardStep::Failed(e.message),
        };
        Ok(&self.step)
    }

    /// Return to file selection after a failure; returns whether it did
    pub fn retry(&mut self) -> bool {
        if !matches!(self.step, WizardStep::Failed(_)) {
            return false;
        }
        self.reset();
        true
    }

    /// Start over
    pub fn reset(&mut self) {
        self.step = WizardStep::SelectFile;
        self.plan = None;
        self.choices = ConflictChoices::default();
    }
}
