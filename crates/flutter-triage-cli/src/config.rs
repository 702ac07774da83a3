// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command line configuration for flutter-triage
//!
//! This module maps the command line onto parser and report options and
//! validates input paths before any log is read.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use flutter_triage::options::{DEFAULT_MAX_FRAMES, DEFAULT_MIN_RULE_WIDTH, DEFAULT_RECENT_PASSED};
use flutter_triage::{ParserOptions, ReportOptions};

/// Path value that selects standard input
pub const STDIN_PATH: &str = "-";

/// Report output format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable markdown report
    #[default]
    Markdown,
    /// Pretty-printed JSON report
    Json,
}

/// Flutter Triage - structured diagnostics from `flutter test` output
#[derive(Parser, Debug, Clone)]
#[command(name = "flutter-triage")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Saved `flutter test` stdout log
    ///
    /// Reads standard input when omitted or `-`.
    #[arg(value_name = "LOG")]
    pub input: Option<PathBuf>,

    /// Saved stderr log, parsed after the stdout log
    #[arg(long, value_name = "FILE")]
    pub stderr: Option<PathBuf>,

    /// Report format
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = OutputFormat::Markdown,
        env = "FLUTTER_TRIAGE_FORMAT"
    )]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only accept result lines carrying PASS, FAIL or [E]
    ///
    /// Without this flag every test-start progress line counts as a passed
    /// result, so a test that later fails appears under both passed and
    /// failed tests. Counter totals are not affected.
    #[arg(long, default_value = "false")]
    pub require_status_marker: bool,

    /// Minimum number of rule characters in an exception delimiter
    #[arg(long, default_value_t = DEFAULT_MIN_RULE_WIDTH)]
    pub min_rule_width: usize,

    /// Stack frames shown per error in the markdown report
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    pub max_frames: usize,

    /// Passed tests listed at the end of the markdown report
    #[arg(long, default_value_t = DEFAULT_RECENT_PASSED)]
    pub recent_passed: usize,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so reports on stdout stay clean.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            stderr: None,
            format: OutputFormat::default(),
            output: None,
            require_status_marker: false,
            min_rule_width: DEFAULT_MIN_RULE_WIDTH,
            max_frames: DEFAULT_MAX_FRAMES,
            recent_passed: DEFAULT_RECENT_PASSED,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// The stdout log path, or `None` for standard input
    #[must_use]
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != STDIN_PATH)
    }

    /// Parser options selected on the command line
    #[must_use]
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions::default()
            .with_status_marker(self.require_status_marker)
            .with_min_rule_width(self.min_rule_width)
    }

    /// Report options selected on the command line
    #[must_use]
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            max_frames: self.max_frames,
            recent_passed: self.recent_passed,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input log path doesn't exist or isn't a file
    /// - The parser options are out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(input) = self.input_path() {
            check_file(input)?;
        }
        if let Some(ref stderr) = self.stderr {
            check_file(stderr)?;
        }

        self.parser_options()
            .validate()
            .map_err(|e| ConfigError::InvalidOption(e.to_string()))
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

fn check_file(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::InputNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ConfigError::InputNotFile(path.to_path_buf()));
    }
    Ok(())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input log not found
    #[error("Input log not found: {0}")]
    InputNotFound(PathBuf),

    /// Input log is not a regular file
    #[error("Input log is not a file: {0}")]
    InputNotFile(PathBuf),

    /// Option value out of range
    #[error("{0}")]
    InvalidOption(String),
}
