// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Session state machine over a `flutter test` log
//!
//! The parser walks the log once, line by line. It tracks the current test
//! (the last result line seen) and whether an exception block is open, and
//! routes each line to the aggregator or the block buffer.
//!
//! # Example
//!
//! ```
//! use flutter_triage::session::{SessionParser, parse_log};
//!
//! // Parse a complete log
//! let results = parse_log("00:02 +1 -0: foo_test.dart: renders correctly");
//! assert_eq!(results.passed.len(), 1);
//!
//! // Or feed lines incrementally
//! let mut parser = SessionParser::default();
//! parser.process_line("00:10 +50 -3:");
//! let results = parser.finish();
//! assert_eq!(results.summary.failed, 3);
//! ```

use std::path::Path;

use tracing::{debug, trace, warn};

use crate::advisor;
use crate::aggregate::{OutcomeRef, TestRunResults};
use crate::classify::{LineKind, classify};
use crate::error::TriageError;
use crate::extract::extract_block;
use crate::options::ParserOptions;
use crate::result::TestOutcome;

/// Block state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No exception block is open
    Idle,
    /// Accumulating exception block content
    InBlock,
}

/// A streaming parser for `flutter test` console output
#[derive(Debug)]
pub struct SessionParser {
    options: ParserOptions,
    state: SessionState,
    results: TestRunResults,
    /// Most recent result line
    current: Option<OutcomeRef>,
    /// Test that was current when the open block started
    block_owner: Option<TestOutcome>,
    /// Content of the open block, reused across blocks
    block: Vec<String>,
    lines_seen: usize,
}

impl SessionParser {
    /// Create a new parser
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            state: SessionState::Idle,
            results: TestRunResults::new(),
            current: None,
            block_owner: None,
            block: Vec::new(),
            lines_seen: 0,
        }
    }

    /// Current block state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Results accumulated so far
    #[must_use]
    pub fn results(&self) -> &TestRunResults {
        &self.results
    }

    /// The current test, if any result line has been seen
    #[must_use]
    pub fn current_test(&self) -> Option<&TestOutcome> {
        self.current.and_then(|position| self.results.outcome(position))
    }

    /// Process a single line of output
    pub fn process_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.lines_seen += 1;

        let kind = classify(line, &self.options);
        trace!(line = self.lines_seen, ?kind, "Classified line");

        if let LineKind::Delimiter { title } = kind {
            self.toggle_block(title);
            return;
        }

        if self.state == SessionState::InBlock {
            self.block.push(line.to_string());
        }

        match kind {
            LineKind::Progress { counter, outcome } => {
                if let Some(counter) = counter {
                    self.results.set_summary(counter);
                }
                if let Some(outcome) = outcome {
                    self.current = Some(self.results.record_outcome(outcome));
                }
            }
            LineKind::RerunHint(command) => self.set_rerun_command(command),
            LineKind::Delimiter { .. } | LineKind::Other => {}
        }
    }

    /// Finish the session and return the aggregated results
    ///
    /// A block still open at this point is dropped without a record.
    #[must_use]
    pub fn finish(self) -> TestRunResults {
        if self.state == SessionState::InBlock {
            warn!(
                buffered_lines = self.block.len(),
                "Log ended inside an exception block, dropping it"
            );
        }

        debug!(
            lines = self.lines_seen,
            passed = self.results.passed.len(),
            failed = self.results.failed.len(),
            errors = self.results.errors.len(),
            "Finished parsing test log"
        );
        self.results
    }

    fn toggle_block(&mut self, title: Option<&str>) {
        match self.state {
            SessionState::Idle => {
                self.block.clear();
                self.block_owner = self.current_test().cloned();
                if let Some(title) = title {
                    self.block.push(title.to_string());
                }
                self.state = SessionState::InBlock;
                debug!(line = self.lines_seen, "Exception block opened");
            }
            SessionState::InBlock => {
                if title.is_some() {
                    debug!(
                        line = self.lines_seen,
                        "Banner closes the open block, its title is not kept"
                    );
                }
                self.close_block();
                self.state = SessionState::Idle;
            }
        }
    }

    fn close_block(&mut self) {
        let owner = self.block_owner.take();
        if self.block.is_empty() {
            debug!(line = self.lines_seen, "Empty exception block, no record");
            return;
        }

        let record = extract_block(self.block.as_slice(), owner.as_ref());
        debug!(
            test = %record.test,
            attributed = record.is_attributed(),
            category = %record.exception_category,
            frames = record.stack_frames.len(),
            rules = ?advisor::matched_rules(&record),
            "Extracted exception record"
        );
        self.results.record_error(record);
        self.block.clear();
    }

    fn set_rerun_command(&mut self, command: &str) {
        let Some(position) = self.current else {
            debug!("Rerun hint without a current test, ignoring");
            return;
        };
        if let Some(outcome) = self.results.outcome_mut(position) {
            outcome.rerun_command = Some(command.to_string());
        }
    }
}

impl Default for SessionParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

/// Parse a complete log with default options
#[must_use]
pub fn parse_log(text: &str) -> TestRunResults {
    parse_log_with(text, &ParserOptions::default())
}

/// Parse a complete log
#[must_use]
pub fn parse_log_with(text: &str, options: &ParserOptions) -> TestRunResults {
    let mut parser = SessionParser::new(options.clone());
    for line in text.lines() {
        parser.process_line(line);
    }
    parser.finish()
}

/// Parse captured stdout and stderr
///
/// All stdout lines are processed before all stderr lines; the two streams
/// are not interleaved.
#[must_use]
pub fn parse_streams(stdout: &str, stderr: &str, options: &ParserOptions) -> TestRunResults {
    let mut parser = SessionParser::new(options.clone());
    for line in stdout.lines().chain(stderr.lines()) {
        parser.process_line(line);
    }
    parser.finish()
}

/// Read and parse a saved log file
///
/// # Errors
///
/// Returns `TriageError::Io` if the file cannot be read.
pub fn parse_file(
    path: impl AsRef<Path>,
    options: &ParserOptions,
) -> Result<TestRunResults, TriageError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    Ok(parse_log_with(&text, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{UNKNOWN_FILE, UNKNOWN_TEST};
    use crate::result::TestStatus;
    use similar_asserts::assert_eq;

    fn rule() -> String {
        "═".repeat(60)
    }

    #[test]
    fn test_scenario_passed_result() {
        let results = parse_log("00:02 +1 -0: foo_test.dart: renders correctly");
        assert_eq!(results.passed.len(), 1);
        assert!(results.failed.is_empty());
        assert_eq!(
            results.passed[0],
            TestOutcome::new("renders correctly", "foo_test.dart", TestStatus::Passed, "00:02")
        );
    }

    #[test]
    fn test_scenario_failed_with_exception() {
        let log = [
            "00:03 +0 -1: widget_test.dart: lays out header [E]".to_string(),
            rule(),
            "EXCEPTION CAUGHT BY widgets library".to_string(),
            "The following assertion was thrown during layout:".to_string(),
            "RenderFlex overflowed by 12 pixels".to_string(),
            rule(),
        ]
        .join("\n");

        let results = parse_log(&log);
        assert_eq!(results.failed.len(), 1);
        assert_eq!(results.errors.len(), 1);

        let record = &results.errors[0];
        assert_eq!(record.test, "lays out header");
        assert_eq!(record.file, "widget_test.dart");
        assert!(record.exception_category.ends_with("widgets library"));
        assert_eq!(
            record.overflow_info.as_deref(),
            Some("RenderFlex overflowed by 12 pixels")
        );

        let diagnostics = results.diagnostics();
        assert_eq!(
            diagnostics[0].suggestions[0],
            "Use Expanded or Flexible widgets to control flex children"
        );
    }

    #[test]
    fn test_scenario_counter_line() {
        let results = parse_log("00:10 +50 -3:");
        assert_eq!(results.summary.elapsed, "00:10");
        assert_eq!(results.summary.passed, 50);
        assert_eq!(results.summary.failed, 3);
        assert!((results.success_rate() - 50.0 / 53.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_counter_near_usize_max_does_not_panic() {
        let results = parse_log(&format!("00:10 +{} -1:", usize::MAX));
        assert_eq!(results.summary.passed, usize::MAX);
        assert_eq!(results.summary.total(), usize::MAX);
        assert!((0.0..=1.0).contains(&results.success_rate()));

        let markdown = crate::report::MarkdownReport::new(
            &results,
            crate::options::ReportOptions::default(),
        )
        .to_string();
        assert!(markdown.contains(&format!("| Total tests | {} |", usize::MAX)));
    }

    #[test]
    fn test_scenario_rerun_hint() {
        let log = "00:03 +0 -1: a_test.dart: breaks [E]\n\
                   To run this test again: flutter test path/to/test.dart";
        let results = parse_log(log);
        assert_eq!(
            results.failed[0].rerun_command.as_deref(),
            Some("flutter test path/to/test.dart")
        );
    }

    #[test]
    fn test_rerun_hint_without_current_test() {
        let results = parse_log("To run this test again: flutter test a_test.dart");
        assert!(results.passed.is_empty());
        assert!(results.failed.is_empty());
    }

    #[test]
    fn test_rerun_hint_targets_latest_test_only() {
        let log = "00:01 +1: a_test.dart: first\n\
                   00:02 +1 -1: a_test.dart: second [E]\n\
                   To run this test again: flutter test --plain-name second";
        let results = parse_log(log);
        assert!(results.passed[0].rerun_command.is_none());
        assert_eq!(
            results.failed[0].rerun_command.as_deref(),
            Some("flutter test --plain-name second")
        );
    }

    #[test]
    fn test_adjacent_delimiters_produce_no_record() {
        let log = format!("{}\n{}", rule(), rule());
        let results = parse_log(&log);
        assert!(results.errors.is_empty());
    }

    #[test]
    fn test_unterminated_block_is_dropped() {
        let log = format!("{}\nEXCEPTION CAUGHT BY WIDGETS LIBRARY\nThe following", rule());
        let mut parser = SessionParser::default();
        for line in log.lines() {
            parser.process_line(line);
        }
        assert_eq!(parser.state(), SessionState::InBlock);
        let results = parser.finish();
        assert!(results.errors.is_empty());
    }

    #[test]
    fn test_unattributed_block_uses_sentinels() {
        let log = format!("{}\nException: boom\n{}", rule(), rule());
        let results = parse_log(&log);
        assert_eq!(results.errors[0].test, UNKNOWN_TEST);
        assert_eq!(results.errors[0].file, UNKNOWN_FILE);
        assert_eq!(results.errors[0].exception_type.as_deref(), Some("Exception: boom"));
    }

    #[test]
    fn test_banner_title_seeds_block() {
        let log = format!(
            "00:01 +0: app_test.dart: loads\n\
             ══╡ EXCEPTION CAUGHT BY RENDERING LIBRARY ╞{}\n\
             The following assertion was thrown during layout:\n\
             {}",
            rule(),
            rule()
        );
        let results = parse_log(&log);
        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].exception_category, "RENDERING LIBRARY");
        assert_eq!(results.errors[0].test, "loads");
    }

    #[test]
    fn test_attribution_uses_test_current_at_open() {
        let log = format!(
            "00:01 +0: a_test.dart: first\n{}\n00:02 +1: a_test.dart: second\nException: x\n{}",
            rule(),
            rule()
        );
        let results = parse_log(&log);
        assert_eq!(results.errors[0].test, "first");
        assert_eq!(results.passed.len(), 2);
        assert!(results.errors[0].raw_block.contains("second"));
    }

    #[test]
    fn test_parse_streams_appends_stderr() {
        let stdout = format!("00:01 +0: a_test.dart: first\n{}", rule());
        let stderr = format!("Exception: late\n{}", rule());
        let results = parse_streams(&stdout, &stderr, &ParserOptions::default());
        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].test, "first");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let log = format!("\n   \n{}\n\n{}\n", rule(), rule());
        let results = parse_log(&log);
        assert!(results.errors.is_empty());
    }

    #[test]
    fn test_buffer_is_reset_between_blocks() {
        let log = format!(
            "{r}\nException: one\n{r}\n{r}\nException: two\n{r}",
            r = rule()
        );
        let results = parse_log(&log);
        assert_eq!(results.errors.len(), 2);
        assert_eq!(results.errors[1].raw_block, "Exception: two");
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("/nonexistent/flutter/test.log", &ParserOptions::default());
        assert!(matches!(result, Err(TriageError::Io(_))));
    }
}
