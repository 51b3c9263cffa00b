// ABOUTME: External collaborators for IronLog: remote row store, generative model, food database
// ABOUTME: Shared HTTP client and circuit breaker keep every outbound call bounded and classified
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![deny(unsafe_code)]

//! External service clients and their abstractions.
//!
//! Every client returns [`ProviderError`](ironlog_core::errors::provider::ProviderError)
//! so callers can tell a transient outage (queue and retry, or fall back) from a
//! permanent rejection.

pub use ironlog_core::constants;
pub use ironlog_core::errors;
pub use ironlog_core::models;

/// Remote row store trait and implementations
pub mod backend;
/// Circuit breaker for outbound calls
pub mod circuit_breaker;
/// Food composition databases
pub mod food;
/// Generative model clients
pub mod generative;
/// Shared HTTP client
pub mod http_client;

pub use backend::{row_id, InMemoryBackend, RemoteBackend, RestBackend, RestBackendConfig};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use food::{FoodDatabase, MockFoodDatabase, OpenFoodFactsClient, OpenFoodFactsConfig};
pub use generative::{GeminiClient, GeminiConfig, GenerationKind, GenerationPrompt, GenerativeModel};
