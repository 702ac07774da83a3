// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report generation for the `flutter-triage` binary
//!
//! Reads the captured logs, parses them, renders the selected report and
//! maps the outcome onto a process exit code.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use flutter_triage::{MarkdownReport, RunReport, TestRunResults, parse_streams};

use crate::config::{Config, OutputFormat};

/// Exit code when the run has no failures
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when the run reported test failures
pub const EXIT_TEST_FAILURES: i32 = 1;

/// Exit code when the logs could not be processed
pub const EXIT_ERROR: i32 = 2;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse the configured logs, write the report and return the exit code
///
/// # Errors
///
/// Returns an error if a log cannot be read or the report cannot be written.
pub fn run(config: &Config) -> Result<i32> {
    config.validate()?;

    let stdout = read_log(config.input_path())?;
    let stderr = match &config.stderr {
        Some(path) => read_file(path)?,
        None => String::new(),
    };
    debug!(
        stdout_bytes = stdout.len(),
        stderr_bytes = stderr.len(),
        "Read test logs"
    );

    let results = parse_streams(&stdout, &stderr, &config.parser_options());
    info!(
        passed = results.passed.len(),
        failed = results.failed.len(),
        errors = results.errors.len(),
        "Parsed flutter test output"
    );
    if results.passed.is_empty() && results.failed.is_empty() && results.summary.total() == 0 {
        warn!("No test results found in input");
    }

    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let report = render(&results, config, &timestamp)?;
    write_report(config.output.as_deref(), &report)?;

    Ok(exit_code(&results))
}

/// Render the report in the configured format
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(results: &TestRunResults, config: &Config, generated_at: &str) -> Result<String> {
    match config.format {
        OutputFormat::Markdown => Ok(MarkdownReport::new(results, config.report_options())
            .generated_at(generated_at)
            .to_string()),
        OutputFormat::Json => RunReport::from_results(results)
            .to_json()
            .context("Failed to serialize report"),
    }
}

/// Exit code for parsed results
#[must_use]
pub fn exit_code(results: &TestRunResults) -> i32 {
    if results.has_failures() {
        EXIT_TEST_FAILURES
    } else {
        EXIT_SUCCESS
    }
}

fn read_log(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => read_file(path),
        None => {
            let mut text = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut text)
                .context("Failed to read test log from stdin")?;
            Ok(text)
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    // Logs may contain stray invalid UTF-8 from native test output
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_report(path: Option<&Path>, report: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "Wrote report");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(report.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write report to stdout")?;
        }
    }
    Ok(())
}
