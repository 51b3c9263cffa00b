// ABOUTME: Connectivity monitor publishing online/offline transitions on a watch channel
// ABOUTME: Pluggable probes (HTTP HEAD against the backend) feed the monitor on an interval
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use async_trait::async_trait;
use ironlog_providers::http_client::shared_client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Current reachability of the backend
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    /// Monitor starting in the given state
    #[must_use]
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx }
    }

    /// Whether the backend is considered reachable
    #[must_use]
    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Update the state; returns true on a transition
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                return false;
            }
            *current = online;
            true
        });
        if changed {
            info!(online, "Connectivity changed");
        }
        changed
    }

    /// Receiver notified on every transition
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Reachability check
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Whether the remote side answered
    async fn check(&self) -> bool;
}

/// Probe that issues a HEAD request; any HTTP response counts as online
pub struct HttpProbe {
    url: String,
}

impl HttpProbe {
    /// Probe for `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn check(&self) -> bool {
        match shared_client()
            .head(&self.url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                debug!(url = %self.url, error = %e, "Connectivity probe failed");
                false
            }
        }
    }
}

/// Run `probe` every `interval` and feed the result into `monitor`
pub fn spawn_probe(
    monitor: Arc<ConnectivityMonitor>,
    probe: Arc<dyn ConnectivityProbe>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let online = probe.check().await;
            monitor.set_online(online);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_online_reports_transitions_only() {
        let monitor = ConnectivityMonitor::new(false);
        assert!(monitor.set_online(true));
        assert!(!monitor.set_online(true));
        assert!(monitor.is_online());
        assert!(monitor.set_online(false));
    }
}
