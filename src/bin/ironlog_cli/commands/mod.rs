// ABOUTME: Command implementations for ironlog-cli
// ABOUTME: Calculators, offline queue maintenance and backup import/export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

pub mod backup;
pub mod calc;
pub mod queue;
