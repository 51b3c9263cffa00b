// ABOUTME: Active workout tracking: session state machine, timer driver and completion records
// ABOUTME: A finished session becomes a CompletedSession handed to the workout logger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

/// Finished-session records
pub mod completion;
/// Session state machine
pub mod session;
/// Tokio-driven ticker
pub mod timer;

pub use completion::CompletedSession;
pub use session::{ActiveExercise, ActiveWorkoutSession, SessionError, SessionEvent, SessionState};
pub use timer::{Haptics, NoHaptics, SessionTimer};
