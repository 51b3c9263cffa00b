// ABOUTME: Shared reqwest client used by every external collaborator
// ABOUTME: One connection pool with request and connect timeouts configured once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// User agent sent to public APIs (Open Food Facts asks clients to identify themselves)
pub const USER_AGENT: &str = concat!("ironlog/", env!("CARGO_PKG_VERSION"));

/// Timeouts applied to every outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Whole-request timeout
    pub request: Duration,
    /// TCP and TLS connect timeout
    pub connect: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
            connect: Duration::from_secs(10),
        }
    }
}

static TIMEOUTS: OnceLock<HttpTimeouts> = OnceLock::new();
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Set the timeouts used by [`shared_client`]
///
/// Returns `false` when timeouts were already set, in which case the call
/// has no effect. Clients built before this call keep the defaults.
pub fn configure_timeouts(timeouts: HttpTimeouts) -> bool {
    TIMEOUTS.set(timeouts).is_ok()
}

/// The process-wide HTTP client
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let timeouts = TIMEOUTS.get().copied().unwrap_or_default();
        ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}
