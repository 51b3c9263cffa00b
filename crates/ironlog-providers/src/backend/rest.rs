// ABOUTME: HTTP RemoteBackend speaking the PostgREST dialect of the managed backend
// ABOUTME: Filters use `?id=eq.<id>`, inserts ask for the stored representation back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::RemoteBackend;
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::http_client::shared_client;
use async_trait::async_trait;
use ironlog_core::constants::service_names;
use ironlog_core::errors::provider::{ProviderError, ProviderResult};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::fmt::{self, Debug, Formatter};
use tracing::{debug, instrument, warn};

/// Connection settings for the managed backend
#[derive(Clone, Default)]
pub struct RestBackendConfig {
    /// Project URL, without the `/rest/v1` suffix
    pub base_url: String,
    /// Public (anon) API key
    pub api_key: String,
    /// Signed-in user's access token; the API key is used when absent
    pub access_token: Option<String>,
}

impl Debug for RestBackendConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestBackendConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// PostgREST client
#[derive(Debug)]
pub struct RestBackend {
    config: RestBackendConfig,
    breaker: CircuitBreaker,
}

impl RestBackend {
    /// Client for the given project
    #[must_use]
    pub fn new(config: RestBackendConfig) -> Self {
        Self {
            config,
            breaker: CircuitBreaker::with_config(
                service_names::BACKEND,
                CircuitBreakerConfig::lenient(),
            ),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let token = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key);
        shared_client()
            .request(method, self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(token)
    }

    async fn send(builder: RequestBuilder) -> ProviderResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(service_names::BACKEND, &e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Backend request rejected");
        Err(ProviderError::from_status(
            service_names::BACKEND,
            status.as_u16(),
            &body,
        ))
    }

    async fn json_rows(response: Response) -> ProviderResult<Vec<Value>> {
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                provider: service_names::BACKEND.to_owned(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl RemoteBackend for RestBackend {
    fn name(&self) -> &'static str {
        "rest"
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn insert_rows(&self, table: &str, rows: Vec<Value>) -> ProviderResult<Vec<Value>> {
        let builder = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&rows);
        self.breaker
            .call(async {
                let response = Self::send(builder).await?;
                let stored = Self::json_rows(response).await?;
                debug!(stored = stored.len(), "Rows inserted");
                Ok(stored)
            })
            .await
    }

    #[instrument(skip(self, row))]
    async fn update_row(&self, table: &str, id: &str, row: Value) -> ProviderResult<()> {
        let builder = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .json(&row);
        self.breaker
            .call(async { Self::send(builder).await.map(drop) })
            .await
    }

    #[instrument(skip(self))]
    async fn select_by_id(&self, table: &str, id: &str) -> ProviderResult<Option<Value>> {
        let builder = self
            .request(Method::GET, table)
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_owned())]);
        self.breaker
            .call(async {
                let rows = Self::json_rows(Self::send(builder).await?).await?;
                Ok(rows.into_iter().next())
            })
            .await
    }

    #[instrument(skip(self))]
    async fn select_all(&self, table: &str) -> ProviderResult<Vec<Value>> {
        let builder = self
            .request(Method::GET, table)
            .query(&[("select", "*")]);
        self.breaker
            .call(async { Self::json_rows(Self::send(builder).await?).await })
            .await
    }

    #[instrument(skip(self))]
    async fn delete_row(&self, table: &str, id: &str) -> ProviderResult<()> {
        let builder = self
            .request(Method::DELETE, table)
            .query(&[("id", format!("eq.{id}"))]);
        self.breaker
            .call(async { Self::send(builder).await.map(drop) })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_tolerates_trailing_slash() {
        let backend = RestBackend::new(RestBackendConfig {
            base_url: "https://project.example.co/".to_owned(),
            api_key: "anon".to_owned(),
            access_token: None,
        });
        assert_eq!(
            backend.table_url("workout_logs"),
            "https://project.example.co/rest/v1/workout_logs"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = RestBackendConfig {
            base_url: "https://project.example.co".to_owned(),
            api_key: "super-secret".to_owned(),
            access_token: Some("token".to_owned()),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("\"token\""));
    }
}
