// ABOUTME: One-second driver for an active workout session
// ABOUTME: Ticks the session on a tokio interval and pulses haptics when rest ends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::session::{ActiveWorkoutSession, SessionEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Device vibration
pub trait Haptics: Send + Sync {
    /// Short pulse
    fn pulse(&self);
}

/// Haptics for devices without a vibration motor
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&self) {}
}

/// Background ticker; stops when the session finishes or the timer is dropped
pub struct SessionTimer {
    handle: JoinHandle<()>,
}

impl SessionTimer {
    /// Start ticking `session` once per second
    #[must_use]
    pub fn start(session: Arc<Mutex<ActiveWorkoutSession>>, haptics: Arc<dyn Haptics>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let event = {
                    let mut session = session.lock().await;
                    if session.is_finished() {
                        break;
                    }
                    session.tick()
                };
                if event == Some(SessionEvent::RestFinished) {
                    debug!("Rest finished");
                    haptics.pulse();
                }
            }
        });
        Self { handle }
    }

    /// Whether the ticker is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop ticking
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
