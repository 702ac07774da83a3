// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line classification for `flutter test` console output
//!
//! Every trimmed, non-empty line of a log maps to exactly one [`LineKind`].
//! A progress line can carry two independent signals at once: the run
//! counter (`00:04 +173 -30:`) and a test result (`<file>.dart: <name>`).
//!
//! # Example
//!
//! ```
//! use flutter_triage::classify::{LineKind, classify};
//! use flutter_triage::options::ParserOptions;
//!
//! let kind = classify("00:10 +50 -3:", &ParserOptions::default());
//! match kind {
//!     LineKind::Progress { counter: Some(summary), outcome: None } => {
//!         assert_eq!(summary.passed, 50);
//!         assert_eq!(summary.failed, 3);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::aggregate::RunSummary;
use crate::options::ParserOptions;
use crate::result::{TestOutcome, TestStatus};

/// Horizontal rule character used by Flutter's exception banners
pub const RULE_CHAR: char = '═';

/// Opening bracket of a banner title (`══╡ TITLE ╞══`)
const TITLE_OPEN: char = '╡';

/// Closing bracket of a banner title
const TITLE_CLOSE: char = '╞';

/// Prefix of the rerun hint printed after a failing test
pub const RERUN_PREFIX: &str = "To run this test again:";

/// Markers that make a line eligible as a result line when the status
/// marker gate is enabled
const STATUS_MARKERS: [&str; 3] = ["PASS", "FAIL", "[E]"];

/// Markers that make a result line a failure
const FAILURE_MARKERS: [&str; 2] = ["[E]", "FAIL"];

/// Matches the run counter: `00:04 +173 ~2 -30:`
/// Captures: 1=elapsed, 2=passed, 3=skipped, 4=failed
static COUNTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}:\d{2})\s+\+(\d+)(?:\s+~(\d+))?(?:\s+-(\d+))?:")
        .expect("Invalid COUNTER_REGEX")
});

/// Matches a test result: `00:04 +173 -30: /path/widget_test.dart: renders [E]`
/// Captures: 1=elapsed, 2=file, 3=name
static RESULT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}:\d{2})\s+[+~\-\d\s:]+([^:]+\.dart):\s*(.+?)(?:\s+\[E\])?$")
        .expect("Invalid RESULT_REGEX")
});

/// Classification of a single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A `═══` rule that opens or closes an exception block
    Delimiter {
        /// Banner title embedded in the rule, if any
        title: Option<&'a str>,
    },
    /// A progress line carrying a run counter, a test result, or both
    Progress {
        /// Run counter snapshot
        counter: Option<RunSummary>,
        /// Test result
        outcome: Option<TestOutcome>,
    },
    /// A "To run this test again:" hint, holding the command
    RerunHint(&'a str),
    /// Anything else (exception content when inside a block)
    Other,
}

/// Classify a trimmed, non-empty log line
#[must_use]
pub fn classify<'a>(line: &'a str, options: &ParserOptions) -> LineKind<'a> {
    if let Some(title) = parse_delimiter(line, options.min_rule_width) {
        return LineKind::Delimiter { title };
    }

    let counter = parse_counter(line);
    let outcome = parse_result(line, options);
    if counter.is_some() || outcome.is_some() {
        return LineKind::Progress { counter, outcome };
    }

    if let Some(command) = parse_rerun_hint(line) {
        return LineKind::RerunHint(command);
    }

    LineKind::Other
}

/// Parse an exception delimiter
///
/// Returns `None` if the line is not a delimiter, `Some(None)` for a bare
/// rule and `Some(Some(title))` for a banner such as
/// `══╡ EXCEPTION CAUGHT BY WIDGETS LIBRARY ╞════`.
#[must_use]
pub fn parse_delimiter(line: &str, min_width: usize) -> Option<Option<&str>> {
    let (head, tail, title) = match (line.find(TITLE_OPEN), line.rfind(TITLE_CLOSE)) {
        (Some(open), Some(close)) if open < close => (
            &line[..open],
            &line[close + TITLE_CLOSE.len_utf8()..],
            Some(line[open + TITLE_OPEN.len_utf8()..close].trim()),
        ),
        _ => (line, "", None),
    };

    let mut width = 0;
    for c in head.chars().chain(tail.chars()) {
        if c != RULE_CHAR {
            return None;
        }
        width += 1;
    }
    if width < min_width {
        return None;
    }

    Some(title.filter(|t| !t.is_empty()))
}

/// Parse the run counter at the start of a line
///
/// Missing skipped (`~N`) and failed (`-N`) counts default to zero.
#[must_use]
pub fn parse_counter(line: &str) -> Option<RunSummary> {
    let caps = COUNTER_REGEX.captures(line)?;
    let count = |idx: usize| -> Option<usize> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    Some(RunSummary {
        elapsed: caps[1].to_string(),
        passed: count(2)?,
        skipped: count(3)?,
        failed: count(4)?,
    })
}

/// Parse a test result line
#[must_use]
pub fn parse_result(line: &str, options: &ParserOptions) -> Option<TestOutcome> {
    if options.require_status_marker && !has_status_marker(line) {
        return None;
    }

    let caps = RESULT_REGEX.captures(line)?;
    let status = if FAILURE_MARKERS.iter().any(|m| line.contains(m)) {
        TestStatus::Failed
    } else {
        TestStatus::Passed
    };

    Some(TestOutcome::new(
        caps[3].trim(),
        caps[2].trim(),
        status,
        &caps[1],
    ))
}

/// Parse a rerun hint, returning the command after the prefix
#[must_use]
pub fn parse_rerun_hint(line: &str) -> Option<&str> {
    line.strip_prefix(RERUN_PREFIX).map(str::trim)
}

fn has_status_marker(line: &str) -> bool {
    line.contains(": ") && STATUS_MARKERS.iter().any(|m| line.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_MIN_RULE_WIDTH;
    use similar_asserts::assert_eq;

    fn rule(width: usize) -> String {
        RULE_CHAR.to_string().repeat(width)
    }

    #[test]
    fn test_counter_line() {
        let summary = parse_counter("00:10 +50 -3:").expect("Should parse counter");
        assert_eq!(summary.elapsed, "00:10");
        assert_eq!(summary.passed, 50);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn test_counter_with_skipped_and_without_failed() {
        let summary = parse_counter("01:02 +7 ~2: All tests passed!").expect("Should parse");
        assert_eq!(summary.passed, 7);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_counter_rejects_other_text() {
        assert!(parse_counter("Running tests").is_none());
        assert!(parse_counter("0:10 +50 -3:").is_none());
        assert!(parse_counter("00:10 +50 -3").is_none());
    }

    #[test]
    fn test_counter_overflowing_count_is_ignored() {
        let line = format!("00:10 +{} -3:", "9".repeat(40));
        assert!(parse_counter(&line).is_none());
    }

    #[test]
    fn test_result_line_passed() {
        let outcome = parse_result(
            "00:02 +1 -0: foo_test.dart: renders correctly",
            &ParserOptions::default(),
        )
        .expect("Should parse result");
        assert_eq!(outcome.name, "renders correctly");
        assert_eq!(outcome.file, "foo_test.dart");
        assert_eq!(outcome.elapsed, "00:02");
        assert_eq!(outcome.status, TestStatus::Passed);
        assert!(outcome.rerun_command.is_none());
    }

    #[test]
    fn test_result_line_failed_strips_marker() {
        let outcome = parse_result(
            "00:04 +173 -30: /app/test/ui_rendering_test.dart: shows banner [E]",
            &ParserOptions::default(),
        )
        .expect("Should parse result");
        assert_eq!(outcome.name, "shows banner");
        assert_eq!(outcome.file, "/app/test/ui_rendering_test.dart");
        assert_eq!(outcome.status, TestStatus::Failed);
    }

    #[test]
    fn test_result_line_fail_marker_in_name() {
        let outcome = parse_result(
            "00:04 +3 -1: a_test.dart: login FAIL path",
            &ParserOptions::default(),
        )
        .expect("Should parse result");
        assert_eq!(outcome.status, TestStatus::Failed);
        assert_eq!(outcome.name, "login FAIL path");
    }

    #[test]
    fn test_result_line_with_skipped_counter() {
        let outcome = parse_result(
            "00:04 +3 ~1 -1: a_test.dart: skips nothing",
            &ParserOptions::default(),
        )
        .expect("Should parse result");
        assert_eq!(outcome.file, "a_test.dart");
    }

    #[test]
    fn test_marker_gate() {
        let gated = ParserOptions::default().with_status_marker(true);
        assert!(parse_result("00:02 +1 -0: foo_test.dart: renders correctly", &gated).is_none());
        assert!(parse_result("00:02 +1 -1: foo_test.dart: renders [E]", &gated).is_some());
        assert!(parse_result("00:02 +1 -0: foo_test.dart: PASS renders", &gated).is_some());
    }

    #[test]
    fn test_marker_without_strict_pattern_is_ignored() {
        let gated = ParserOptions::default().with_status_marker(true);
        assert!(parse_result("Some test: FAIL without timestamp", &gated).is_none());
        assert!(parse_result("00:02 +1 -1: no dart file here [E]", &gated).is_none());
    }

    #[test]
    fn test_classify_progress_carries_both_signals() {
        let kind = classify(
            "00:02 +1 -0: foo_test.dart: renders correctly",
            &ParserOptions::default(),
        );
        match kind {
            LineKind::Progress {
                counter: Some(counter),
                outcome: Some(outcome),
            } => {
                assert_eq!(counter.passed, 1);
                assert_eq!(outcome.name, "renders correctly");
            }
            other => panic!("expected progress line, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_bare_rule() {
        let line = rule(80);
        assert_eq!(
            classify(&line, &ParserOptions::default()),
            LineKind::Delimiter { title: None }
        );
    }

    #[test]
    fn test_classify_banner_rule() {
        let line = format!(
            "══╡ EXCEPTION CAUGHT BY WIDGETS LIBRARY ╞{}",
            rule(40)
        );
        assert_eq!(
            classify(&line, &ParserOptions::default()),
            LineKind::Delimiter {
                title: Some("EXCEPTION CAUGHT BY WIDGETS LIBRARY")
            }
        );
    }

    #[test]
    fn test_short_rule_is_not_delimiter() {
        let line = rule(5);
        assert_eq!(classify(&line, &ParserOptions::default()), LineKind::Other);
    }

    #[test]
    fn test_rule_with_text_is_not_delimiter() {
        let line = format!("{} trailing", rule(40));
        assert!(parse_delimiter(&line, DEFAULT_MIN_RULE_WIDTH).is_none());
    }

    #[test]
    fn test_rerun_hint() {
        assert_eq!(
            classify(
                "To run this test again: flutter test path/to/test.dart",
                &ParserOptions::default()
            ),
            LineKind::RerunHint("flutter test path/to/test.dart")
        );
    }

    #[test]
    fn test_other_lines() {
        let options = ParserOptions::default();
        assert_eq!(classify("The following assertion was thrown", &options), LineKind::Other);
        assert_eq!(classify("#0 main (package:app/main.dart:1:1)", &options), LineKind::Other);
    }
}
