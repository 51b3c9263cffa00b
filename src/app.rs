// ABOUTME: Application context wiring storage, backend, offline queue and services from config
// ABOUTME: One explicit state object handed to the CLI instead of module-level globals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use crate::backup::{Exporter, ImportWizard, Importer};
use crate::config::AppConfig;
use crate::offline::{
    spawn_probe, ConnectivityMonitor, ConnectivityProbe, HttpProbe, OfflineContext,
};
use crate::services::{GenerationService, NutritionService, WorkoutLogger, WorkoutRepository};
use crate::storage::{open_store, LocalStore, Preferences, QueryCache};
use ironlog_core::errors::AppResult;
use ironlog_providers::http_client::configure_timeouts;
use ironlog_providers::{
    FoodDatabase, GeminiClient, GenerativeModel, InMemoryBackend, OpenFoodFactsClient,
    RemoteBackend, RestBackend,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Everything the application needs, built once at startup
pub struct AppContext {
    /// Loaded configuration
    pub config: AppConfig,
    /// Local key-value store
    pub store: Arc<dyn LocalStore>,
    /// Remote row store (in-memory when no backend is configured)
    pub backend: Arc<dyn RemoteBackend>,
    /// Offline queue, sync executor and connectivity
    pub offline: Arc<OfflineContext>,
    /// Completed workout logging
    pub workout_logger: WorkoutLogger,
    /// Generated content
    pub generation: GenerationService,
    /// Food lookup
    pub nutrition: NutritionService,
    /// Small persisted preferences
    pub preferences: Preferences,
    /// Persisted backend read cache
    pub query_cache: Arc<QueryCache>,
    probe: Option<Arc<dyn ConnectivityProbe>>,
}

impl AppContext {
    /// Open local storage and build every service
    ///
    /// With a backend configured, connectivity starts from one probe;
    /// otherwise the in-memory backend is always reachable.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the local store cannot be opened.
    pub async fn bootstrap(config: AppConfig) -> AppResult<Self> {
        if !configure_timeouts(config.http.timeouts()) {
            debug!("HTTP timeouts already configured, keeping the first settings");
        }
        let store = open_store(&config.storage.url).await?;

        let (backend, probe): (Arc<dyn RemoteBackend>, Option<Arc<dyn ConnectivityProbe>>) =
            match config.backend.rest_config() {
                Some(rest) => {
                    let probe_url = format!("{}/rest/v1/", rest.base_url.trim_end_matches('/'));
                    (
                        Arc::new(RestBackend::new(rest)) as Arc<dyn RemoteBackend>,
                        Some(Arc::new(HttpProbe::new(probe_url)) as Arc<dyn ConnectivityProbe>),
                    )
                }
                None => (Arc::new(InMemoryBackend::new()) as Arc<dyn RemoteBackend>, None),
            };

        let online = match &probe {
            Some(probe) => probe.check().await,
            None => true,
        };
        let monitor = Arc::new(ConnectivityMonitor::new(online));

        let offline = Arc::new(
            OfflineContext::load(
                Arc::clone(&store),
                WorkoutRepository::new(Arc::clone(&backend)),
                monitor,
                config.sync.clone(),
            )
            .await,
        );

        let model = config
            .generation
            .gemini_config()
            .map(|gemini| Arc::new(GeminiClient::new(gemini)) as Arc<dyn GenerativeModel>);
        let generation = GenerationService::new(model)
            .with_calorie_tolerance(config.generation.calorie_tolerance);

        let food: Arc<dyn FoodDatabase> =
            Arc::new(OpenFoodFactsClient::new(config.nutrition.client_config()));
        let nutrition = NutritionService::new(Some(food));

        let query_cache = Arc::new(QueryCache::new(
            Arc::clone(&store),
            config.storage.query_cache_max_age,
        ));
        query_cache.restore(chrono::Utc::now()).await;

        info!(
            backend = backend.name(),
            online,
            generation_model = generation.has_model(),
            "Application context ready"
        );

        Ok(Self {
            workout_logger: WorkoutLogger::new(Arc::clone(&offline)),
            preferences: Preferences::new(Arc::clone(&store)),
            config,
            store,
            backend,
            offline,
            generation,
            nutrition,
            query_cache,
            probe,
        })
    }

    /// Start the sync trigger task and, with a remote backend, the connectivity probe
    pub fn start_background(&self) -> Vec<JoinHandle<()>> {
        let mut handles = vec![self.offline.start()];
        if let Some(probe) = &self.probe {
            handles.push(spawn_probe(
                Arc::clone(self.offline.monitor()),
                Arc::clone(probe),
                self.config.sync.probe_interval,
            ));
        }
        handles
    }

    /// Backup exporter
    #[must_use]
    pub fn exporter(&self) -> Exporter {
        Exporter::new(Arc::clone(&self.backend))
    }

    /// Fresh import wizard
    #[must_use]
    pub fn import_wizard(&self) -> ImportWizard {
        ImportWizard::new(Importer::new(Arc::clone(&self.backend)))
    }
}
