// ABOUTME: Helper modules for ironlog-cli
// ABOUTME: Output formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

pub mod display;
