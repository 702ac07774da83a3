// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! flutter-triage-cli library
//!
//! This module exports the command line configuration and report driver of
//! the `flutter-triage` binary for use in integration tests.

pub mod config;
pub mod run;
