// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for flutter-triage
//!
//! Parsing itself never fails: malformed lines, unterminated blocks and
//! unattributed exceptions are all recovered locally. These errors cover the
//! edges around the parser (reading logs, serializing reports, bad options).

use thiserror::Error;

/// Errors that can occur around test log processing
#[derive(Debug, Error)]
pub enum TriageError {
    /// Error serializing a report to JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading a test log
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parser or report options are out of range
    #[error("Invalid options: {message}")]
    InvalidOptions {
        /// Description of the invalid option
        message: String,
    },
}
