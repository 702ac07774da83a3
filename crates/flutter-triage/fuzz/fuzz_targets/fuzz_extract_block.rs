// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for exception block extraction and the advisor

#![no_main]

use libfuzzer_sys::fuzz_target;

use flutter_triage::{advisor, extract_block};

fuzz_target!(|lines: Vec<String>| {
    let record = extract_block(lines.as_slice(), None);
    // Extraction always yields a record and the advisor always has something to say
    assert!(!advisor::suggest(&record).is_empty());
});
