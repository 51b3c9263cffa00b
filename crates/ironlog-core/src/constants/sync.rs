// ABOUTME: Offline queue sync scheduling and retry policy defaults
// ABOUTME: Delays before sync passes, exponential backoff bounds, and poison-item threshold
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

/// Delay between an offline-to-online transition and the sync pass
pub const RECONNECT_SYNC_DELAY_MS: u64 = 1_000;

/// Delay between startup and the first sync pass when the queue is non-empty
pub const STARTUP_SYNC_DELAY_MS: u64 = 2_000;

/// First retry delay after a failed remote write
pub const BACKOFF_BASE_MS: u64 = 2_000;

/// Upper bound for the retry delay (10 minutes)
pub const BACKOFF_MAX_MS: u64 = 600_000;

/// Attempts before an action is moved to the dead-letter list
pub const MAX_ATTEMPTS: u32 = 10;

/// Interval between connectivity probes
pub const CONNECTIVITY_PROBE_SECS: u64 = 15;

/// Shortest wait before re-checking actions whose backoff has elapsed
pub const RETRY_WAKE_FLOOR_MS: u64 = 250;
