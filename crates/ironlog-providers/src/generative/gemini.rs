// ABOUTME: Google Gemini implementation of GenerativeModel using JSON response mode
// ABOUTME: Errors are classified so rate limits and outages trigger local fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::{GenerationPrompt, GenerativeModel};
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::http_client::shared_client;
use async_trait::async_trait;
use ironlog_core::constants::service_names;
use ironlog_core::errors::provider::{ProviderError, ProviderResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Formatter};
use tracing::{debug, instrument, warn};

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Generative Language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client settings
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// API base URL
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl Debug for GeminiConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiContent,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// Gemini client guarded by a strict circuit breaker
pub struct GeminiClient {
    config: GeminiConfig,
    breaker: CircuitBreaker,
}

impl GeminiClient {
    /// Client with the given settings
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            breaker: CircuitBreaker::with_config(
                service_names::GENERATIVE_MODEL,
                CircuitBreakerConfig::strict(),
            ),
        }
    }

    fn build_request(prompt: &GenerationPrompt) -> GeminiRequest {
        GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![TextPart {
                    text: prompt.instructions.clone(),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts: vec![TextPart {
                    text: prompt.input.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: prompt.temperature,
            },
        }
    }

    fn extract_text(response: GeminiResponse) -> ProviderResult<String> {
        if let Some(error) = response.error {
            return Err(invalid(error.message));
        }
        response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| invalid("no content in response".to_owned()))
    }

    async fn generate(&self, prompt: &GenerationPrompt) -> ProviderResult<String> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured {
                provider: service_names::GENERATIVE_MODEL.to_owned(),
                details: "API key is empty".to_owned(),
            });
        }
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let response = shared_client()
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&Self::build_request(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(service_names::GENERATIVE_MODEL, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(service_names::GENERATIVE_MODEL, &e))?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "Generative model request rejected");
            let message = serde_json::from_str::<GeminiResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map_or(body, |e| e.message);
            return Err(ProviderError::from_status(
                service_names::GENERATIVE_MODEL,
                status.as_u16(),
                &message,
            ));
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| invalid(e.to_string()))?;
        Self::extract_text(parsed)
    }
}

fn invalid(message: String) -> ProviderError {
    ProviderError::InvalidResponse {
        provider: service_names::GENERATIVE_MODEL.to_owned(),
        message,
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, prompt), fields(kind = %prompt.kind, model = %self.config.model))]
    async fn generate_json(&self, prompt: &GenerationPrompt) -> ProviderResult<String> {
        let text = self.breaker.call(self.generate(prompt)).await?;
        debug!(bytes = text.len(), "Generative model answered");
        Ok(text)
    }
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::generative::GenerationKind;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_json_response_mode() {
        let prompt = GenerationPrompt::new(
            GenerationKind::Recipe,
            "Answer with a recipe",
            json!({"target_calories": 600}),
        );
        let body = serde_json::to_value(GeminiClient::build_request(&prompt)).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Answer with a recipe");
    }

    #[test]
    fn test_text_parts_are_joined() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}]
        }))
        .unwrap();
        assert_eq!(GeminiClient::extract_text(response).unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let client = GeminiClient::new(GeminiConfig::default());
        let prompt = GenerationPrompt::new(GenerationKind::Workout, "", json!({}));
        assert!(matches!(
            client.generate_json(&prompt).await,
            Err(ProviderError::NotConfigured { .. })
        ));
    }
}
