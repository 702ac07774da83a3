// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for whole-log parsing
//!
//! This fuzzes `parse_log` and the report renderers over arbitrary text.

#![no_main]

use libfuzzer_sys::fuzz_target;

use flutter_triage::{MarkdownReport, ReportOptions, RunReport, parse_log};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let results = parse_log(input);
        let rate = results.success_rate();
        assert!((0.0..=1.0).contains(&rate));

        let _ = MarkdownReport::new(&results, ReportOptions::default()).to_string();
        let _ = RunReport::from_results(&results).to_json();
    }
});
