// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the incremental session parser
//!
//! Lines are fed one at a time with a fuzzed rule width and marker gate.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use flutter_triage::{ParserOptions, SessionParser};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    require_status_marker: bool,
    min_rule_width: u8,
    lines: Vec<&'a str>,
}

fuzz_target!(|input: Input<'_>| {
    let options = ParserOptions::default()
        .with_status_marker(input.require_status_marker)
        .with_min_rule_width(usize::from(input.min_rule_width).max(3));

    let mut parser = SessionParser::new(options);
    for line in &input.lines {
        parser.process_line(line);
        let _ = parser.current_test();
    }

    let results = parser.finish();
    for record in &results.errors {
        assert!(!record.raw_block.is_empty());
    }
});
