// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! flutter-triage: structured diagnostics from `flutter test` output
//!
//! Reads a saved test log (or stdin), writes a markdown or JSON report and
//! exits 0 when every test passed, 1 on test failures and 2 when the input
//! could not be processed.

use clap::Parser;
use tracing::error;

use flutter_triage_cli::config::Config;
use flutter_triage_cli::run::{EXIT_ERROR, run};

fn main() {
    let config = Config::parse();

    // Logs go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(config.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = match run(&config) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}
