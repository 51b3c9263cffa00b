// ABOUTME: Circuit breaker guarding calls to the backend, generative model and food database
// ABOUTME: Fails fast while a service is down so callers switch to local fallbacks immediately
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use ironlog_core::errors::provider::ProviderError;
use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through and failures are counted
    Closed,
    /// Calls fail immediately
    Open,
    /// A single probe call is in flight
    HalfOpen,
}

impl CircuitState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Closed,
            1 => Self::Open,
            _ => Self::HalfOpen,
        }
    }

    const fn as_u8(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
            Self::HalfOpen => 2,
        }
    }
}

/// Thresholds for opening and closing the circuit
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive retryable failures before the circuit opens
    pub failure_threshold: u32,
    /// Time the circuit stays open before a probe call is allowed
    pub recovery_timeout: Duration,
    /// Successful probe calls needed to close the circuit again
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 1,
        }
    }
}

impl CircuitBreakerConfig {
    /// Custom thresholds
    #[must_use]
    pub const fn new(
        failure_threshold: u32,
        recovery_timeout: Duration,
        success_threshold: u32,
    ) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            success_threshold,
        }
    }

    /// Trips quickly; used for the generative model where a local fallback is always available
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            failure_threshold: 2,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 1,
        }
    }

    /// Tolerates bursts of errors; used for the remote backend
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            failure_threshold: 10,
            recovery_timeout: Duration::from_secs(15),
            success_threshold: 1,
        }
    }
}

/// Lock-free circuit breaker
///
/// Only retryable [`ProviderError`]s count as failures: a validation
/// rejection from a healthy service must not trip the circuit.
#[derive(Debug)]
pub struct CircuitBreaker {
    service: String,
    state: AtomicU8,
    failures: AtomicU32,
    probe_successes: AtomicU32,
    /// Milliseconds since `epoch` when the circuit last opened
    opened_at_ms: AtomicU64,
    config: CircuitBreakerConfig,
    epoch: Instant,
}

impl CircuitBreaker {
    /// Breaker with default thresholds
    #[must_use]
    pub fn new(service: &str) -> Self {
        Self::with_config(service, CircuitBreakerConfig::default())
    }

    /// Breaker with custom thresholds
    #[must_use]
    pub fn with_config(service: &str, config: CircuitBreakerConfig) -> Self {
        Self {
            service: service.to_owned(),
            state: AtomicU8::new(CircuitState::Closed.as_u8()),
            failures: AtomicU32::new(0),
            probe_successes: AtomicU32::new(0),
            opened_at_ms: AtomicU64::new(0),
            config,
            epoch: Instant::now(),
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Consecutive failures counted so far
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn recovery_ms(&self) -> u64 {
        u64::try_from(self.config.recovery_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn open(&self) {
        self.state.store(CircuitState::Open.as_u8(), Ordering::SeqCst);
        self.opened_at_ms.store(self.now_ms(), Ordering::SeqCst);
        self.probe_successes.store(0, Ordering::SeqCst);
    }

    /// Whether a call may go through right now
    ///
    /// An open circuit whose recovery timeout has elapsed moves to half-open
    /// and lets exactly one caller through.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        match self.state() {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => false,
            CircuitState::Open => {
                let since_open = self
                    .now_ms()
                    .saturating_sub(self.opened_at_ms.load(Ordering::SeqCst));
                if since_open < self.recovery_ms() {
                    return false;
                }
                let moved = self
                    .state
                    .compare_exchange(
                        CircuitState::Open.as_u8(),
                        CircuitState::HalfOpen.as_u8(),
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    )
                    .is_ok();
                if moved {
                    info!(service = %self.service, "Circuit breaker half-open, probing service");
                }
                moved
            }
        }
    }

    /// Record a successful call
    pub fn record_success(&self) {
        match self.state() {
            CircuitState::Closed => self.failures.store(0, Ordering::SeqCst),
            CircuitState::HalfOpen => {
                let successes = self.probe_successes.fetch_add(1, Ordering::SeqCst) + 1;
                if successes >= self.config.success_threshold {
                    self.state
                        .store(CircuitState::Closed.as_u8(), Ordering::SeqCst);
                    self.failures.store(0, Ordering::SeqCst);
                    self.probe_successes.store(0, Ordering::SeqCst);
                    info!(service = %self.service, "Circuit breaker closed, service recovered");
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a retryable failure
    pub fn record_failure(&self) {
        match self.state() {
            CircuitState::Closed => {
                let failures = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= self.config.failure_threshold {
                    self.open();
                    warn!(
                        service = %self.service,
                        failures,
                        recovery_timeout_secs = self.config.recovery_timeout.as_secs(),
                        "Circuit breaker opened"
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.open();
                warn!(service = %self.service, "Circuit breaker re-opened, probe failed");
            }
            CircuitState::Open => {
                self.opened_at_ms.store(self.now_ms(), Ordering::SeqCst);
            }
        }
    }

    /// Seconds until a probe call will be allowed, rounded up
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        let since_open = self
            .now_ms()
            .saturating_sub(self.opened_at_ms.load(Ordering::SeqCst));
        self.recovery_ms().saturating_sub(since_open).div_ceil(1000)
    }

    /// Run `operation` under the breaker
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::CircuitBreakerOpen`] without running the
    /// operation while the circuit is open, otherwise the operation's error.
    pub async fn call<F, T>(&self, operation: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        if !self.is_allowed() {
            return Err(ProviderError::CircuitBreakerOpen {
                provider: self.service.clone(),
                retry_after_secs: self.retry_after_secs(),
            });
        }

        match operation.await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(error) => {
                if error.is_retryable() {
                    self.record_failure();
                } else if self.state() == CircuitState::HalfOpen {
                    // the service answered, so it is reachable again
                    self.record_success();
                }
                Err(error)
            }
        }
    }

    /// Force the circuit closed
    pub fn reset(&self) {
        self.state
            .store(CircuitState::Closed.as_u8(), Ordering::SeqCst);
        self.failures.store(0, Ordering::SeqCst);
        self.probe_successes.store(0, Ordering::SeqCst);
        info!(service = %self.service, "Circuit breaker reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_error() -> ProviderError {
        ProviderError::Network {
            provider: "backend".to_owned(),
            message: "connection refused".to_owned(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_after_threshold_and_recovers() {
        let breaker = CircuitBreaker::with_config(
            "backend",
            CircuitBreakerConfig::new(2, Duration::from_secs(10), 1),
        );

        for _ in 0..2 {
            let result: Result<(), _> = breaker.call(async { Err(network_error()) }).await;
            assert!(result.is_err());
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        let blocked: Result<(), _> = breaker.call(async { Ok(()) }).await;
        assert!(matches!(
            blocked,
            Err(ProviderError::CircuitBreakerOpen { retry_after_secs: 10, .. })
        ));

        tokio::time::advance(Duration::from_secs(11)).await;
        let probe: Result<u8, _> = breaker.call(async { Ok(1) }).await;
        assert_eq!(probe.ok(), Some(1));
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_permanent_errors_do_not_trip() {
        let breaker = CircuitBreaker::with_config("backend", CircuitBreakerConfig::strict());
        for _ in 0..5 {
            let _: Result<(), _> = breaker
                .call(async { Err(ProviderError::from_status("backend", 400, "bad row")) })
                .await;
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.failure_count(), 0);
    }
}
