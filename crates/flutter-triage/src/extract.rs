// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Exception block extraction
//!
//! Turns the content lines of one closed `═══` block into an
//! [`ExceptionRecord`]. Every field rule looks at every line on its own; a
//! later match overwrites an earlier one, except for the line number where
//! the first match wins. Extraction never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::result::{TestOutcome, file_name_of};

/// Test name used when no result line preceded the block
pub const UNKNOWN_TEST: &str = "Unknown Test";

/// File used when no result line preceded the block
pub const UNKNOWN_FILE: &str = "Unknown File";

/// Category used when no `EXCEPTION CAUGHT BY` line is present
pub const UNKNOWN_CATEGORY: &str = "Unknown Error";

const CAUGHT_BY_MARKER: &str = "EXCEPTION CAUGHT BY";
const MESSAGE_PREFIX: &str = "The following";
const MESSAGE_STOP_PREFIX: &str = "The relevant";
const WIDGET_PHRASE: &str = "error-causing widget was:";
const RELEVANT_WIDGET_PHRASE: &str = "The relevant error-causing widget was:";
const OVERFLOW_PHRASE: &str = "overflowed by";
const EXCEPTION_TYPE_PREFIXES: [&str; 3] = ["Exception:", "AssertionError:", "RenderFlex"];
const BOX_DRAWING_CHARS: [char; 3] = ['═', '╡', '╞'];

/// Lines after the `The following` line folded into `full_message`
const FULL_MESSAGE_WINDOW: usize = 4;

/// Matches a Dart source location: `widget_test.dart:42`
static DART_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.dart:(\d+)").expect("Invalid DART_LINE_REGEX"));

/// Structured information extracted from one exception block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRecord {
    /// Test the block is attributed to
    pub test: String,
    /// File of the attributed test
    pub file: String,
    /// Library that caught the exception, e.g. `WIDGETS LIBRARY`
    pub exception_category: String,
    /// The `The following ...` line
    pub message: String,
    /// `message` plus the lines following it
    pub full_message: String,
    /// Widget named on the `error-causing widget was:` line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
    /// Line following `The relevant error-causing widget was:`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevant_widget: Option<String>,
    /// Line reporting a layout overflow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_info: Option<String>,
    /// Line starting with `Exception:`, `AssertionError:` or `RenderFlex`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<String>,
    /// First `.dart:<line>` location in the block
    ///
    /// Unset when that first location does not fit in a `u64`; later
    /// locations are not consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u64>,
    /// Stack frame lines, in order
    pub stack_frames: Vec<String>,
    /// All block lines joined with newlines
    pub raw_block: String,
}

impl ExceptionRecord {
    /// Create a record with no extracted fields
    #[must_use]
    pub fn minimal(attribution: Option<&TestOutcome>) -> Self {
        let (test, file) = match attribution {
            Some(outcome) => (outcome.name.clone(), outcome.file.clone()),
            None => (UNKNOWN_TEST.to_string(), UNKNOWN_FILE.to_string()),
        };

        Self {
            test,
            file,
            exception_category: UNKNOWN_CATEGORY.to_string(),
            message: String::new(),
            full_message: String::new(),
            widget: None,
            relevant_widget: None,
            overflow_info: None,
            exception_type: None,
            line_number: None,
            stack_frames: Vec::new(),
            raw_block: String::new(),
        }
    }

    /// Check if the record was attributed to a known test
    #[must_use]
    pub fn is_attributed(&self) -> bool {
        self.test != UNKNOWN_TEST || self.file != UNKNOWN_FILE
    }

    /// Check if a stack frame points into test code
    ///
    /// A frame qualifies when it carries a `.dart:` location and mentions
    /// `test` or the attributed test file's name.
    #[must_use]
    pub fn is_test_frame(&self, frame: &str) -> bool {
        frame.contains(".dart:")
            && (frame.contains("test")
                || (self.is_attributed() && frame.contains(file_name_of(&self.file))))
    }

    /// `full_message` when present, otherwise `message`
    #[must_use]
    pub fn best_message(&self) -> &str {
        if self.full_message.is_empty() {
            &self.message
        } else {
            &self.full_message
        }
    }
}

/// Extract an [`ExceptionRecord`] from the content lines of one block
#[must_use]
pub fn extract_block<S: AsRef<str>>(
    lines: &[S],
    attribution: Option<&TestOutcome>,
) -> ExceptionRecord {
    let mut record = ExceptionRecord::minimal(attribution);
    let mut in_stack_trace = false;

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();

        if line.contains(CAUGHT_BY_MARKER) {
            let category = strip_box_drawing(&line.replace(CAUGHT_BY_MARKER, ""));
            if !category.is_empty() {
                record.exception_category = category;
            }
        }

        if line.starts_with(MESSAGE_PREFIX) {
            record.message = line.to_string();
            record.full_message = full_message(lines, i);
        }

        if let Some(idx) = line.find(WIDGET_PHRASE) {
            let widget = line[idx + WIDGET_PHRASE.len()..].trim();
            if !widget.is_empty() {
                record.widget = Some(widget.to_string());
            }
        }

        if line.contains(RELEVANT_WIDGET_PHRASE) {
            if let Some(next) = lines.get(i + 1) {
                let next = next.as_ref().trim();
                if !next.is_empty() {
                    record.relevant_widget = Some(next.to_string());
                }
            }
        }

        if line.contains(OVERFLOW_PHRASE) {
            record.overflow_info = Some(line.to_string());
        }

        if EXCEPTION_TYPE_PREFIXES.iter().any(|p| line.starts_with(p)) {
            record.exception_type = Some(line.to_string());
        }

        if is_frame_start(line) {
            in_stack_trace = true;
            record.stack_frames.push(line.to_string());
        } else if in_stack_trace {
            if line.starts_with('#') || line.starts_with("...") {
                record.stack_frames.push(line.to_string());
            } else {
                in_stack_trace = false;
            }
        }
    }

    record.line_number = lines
        .iter()
        .find_map(|line| DART_LINE_REGEX.captures(line.as_ref()))
        .and_then(|caps| caps[1].parse().ok());

    record.raw_block = lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<&str>>()
        .join("\n");

    record
}

fn is_frame_start(line: &str) -> bool {
    line.starts_with('#') && line.contains('(') && line.contains(')')
}

/// The `The following` line plus up to [`FULL_MESSAGE_WINDOW`] lines after
/// it, stopping before a `The relevant` line
fn full_message<S: AsRef<str>>(lines: &[S], start: usize) -> String {
    let mut collected = vec![lines[start].as_ref().trim()];
    for line in lines.iter().skip(start + 1).take(FULL_MESSAGE_WINDOW) {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with(MESSAGE_STOP_PREFIX) {
            break;
        }
        collected.push(line);
    }
    collected.join("\n")
}

fn strip_box_drawing(text: &str) -> String {
    text.chars()
        .filter(|c| !BOX_DRAWING_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
