// ABOUTME: Typed accessors for small persisted preferences
// ABOUTME: Onboarding tour flag and the locally cached program list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::LocalStore;
use ironlog_core::constants::storage;
use ironlog_core::errors::AppResult;
use ironlog_core::models::Program;
use std::sync::Arc;
use tracing::warn;

/// Preferences stored in the local key-value store
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn LocalStore>,
}

impl Preferences {
    /// Preferences backed by `store`
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Whether the onboarding tour should be shown (true until dismissed)
    pub async fn show_onboarding_tour(&self) -> bool {
        match self.store.get(storage::ONBOARDING_TOUR_KEY).await {
            Ok(Some(value)) => value.trim() != "false",
            Ok(None) => true,
            Err(e) => {
                warn!(error = %e, "Failed to read onboarding flag");
                true
            }
        }
    }

    /// Persist the onboarding tour flag
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub async fn set_show_onboarding_tour(&self, show: bool) -> AppResult<()> {
        self.store
            .set(storage::ONBOARDING_TOUR_KEY, if show { "true" } else { "false" })
            .await
    }

    /// Programs cached for offline viewing; unreadable data yields an empty list
    pub async fn cached_programs(&self) -> Vec<Program> {
        let raw = match self.store.get(storage::CACHED_PROGRAMS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cached programs");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unparsable cached programs");
            Vec::new()
        })
    }

    /// Replace the cached program list
    ///
    /// # Errors
    ///
    /// Returns a serialization or storage error.
    pub async fn cache_programs(&self, programs: &[Program]) -> AppResult<()> {
        let raw = serde_json::to_string(programs)?;
        self.store.set(storage::CACHED_PROGRAMS_KEY, &raw).await
    }
}
