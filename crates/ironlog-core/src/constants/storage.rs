// ABOUTME: Local storage keys and retention windows for persisted client state
// ABOUTME: Queue, dead letters, onboarding flag, cached programs and query cache snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

/// Pending offline actions (JSON array of queued actions)
pub const OFFLINE_QUEUE_KEY: &str = "ironlog_offline_queue";

/// Actions that exhausted their retry budget
pub const DEAD_LETTER_KEY: &str = "ironlog_offline_dead_letters";

/// Whether the onboarding tour should still be shown
pub const ONBOARDING_TOUR_KEY: &str = "ironlog_show_onboarding_tour";

/// Locally cached programs
pub const CACHED_PROGRAMS_KEY: &str = "ironlog_cached_programs";

/// Persisted backend read cache
pub const QUERY_CACHE_KEY: &str = "ironlog_query_cache";

/// Query cache snapshot retention (24 hours)
pub const QUERY_CACHE_MAX_AGE_SECS: u64 = 86_400;

/// File name of the default on-disk store
pub const DEFAULT_STORE_FILE: &str = "local.db";
