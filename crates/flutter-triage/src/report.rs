// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report rendering
//!
//! Two renderings of [`TestRunResults`]: a serializable [`RunReport`] for
//! machine consumers and a [`MarkdownReport`] for people.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::{Diagnosis, RunSummary, TestRunResults};
use crate::error::TriageError;
use crate::options::ReportOptions;
use crate::result::TestOutcome;

/// Serializable snapshot of a parsed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Counter line totals
    pub summary: RunSummary,
    /// Success rate from the counter line, in `[0, 1]`
    pub success_rate: f64,
    /// Success rate from the classified result lines, in `[0, 1]`
    pub classified_success_rate: f64,
    /// Passing tests
    pub passed: Vec<TestOutcome>,
    /// Failing tests
    pub failed: Vec<TestOutcome>,
    /// Exception records with suggestions
    pub errors: Vec<Diagnosis>,
}

impl RunReport {
    /// Build a report from parsed results
    #[must_use]
    pub fn from_results(results: &TestRunResults) -> Self {
        Self {
            summary: results.summary.clone(),
            success_rate: results.success_rate(),
            classified_success_rate: results.classified_success_rate(),
            passed: results.passed.clone(),
            failed: results.failed.clone(),
            errors: results.diagnostics(),
        }
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, TriageError> {
        serde_json::to_string_pretty(self).map_err(TriageError::from)
    }
}

/// Markdown rendering of a parsed run
///
/// # Example
///
/// ```
/// use flutter_triage::report::MarkdownReport;
/// use flutter_triage::options::ReportOptions;
/// use flutter_triage::session::parse_log;
///
/// let results = parse_log("00:10 +50 -3:");
/// let markdown = MarkdownReport::new(&results, ReportOptions::default()).to_string();
/// assert!(markdown.contains("| Failed | 3 |"));
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownReport<'a> {
    results: &'a TestRunResults,
    options: ReportOptions,
    generated_at: Option<String>,
}

impl<'a> MarkdownReport<'a> {
    /// Create a markdown report
    #[must_use]
    pub fn new(results: &'a TestRunResults, options: ReportOptions) -> Self {
        Self {
            results,
            options,
            generated_at: None,
        }
    }

    /// Stamp the report heading with a caller-supplied time
    #[must_use]
    pub fn generated_at(mut self, timestamp: impl Into<String>) -> Self {
        self.generated_at = Some(timestamp.into());
        self
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = &self.results.summary;
        writeln!(f, "## Summary")?;
        writeln!(f)?;
        writeln!(f, "| Metric | Value |")?;
        writeln!(f, "|---|---|")?;
        if !summary.elapsed.is_empty() {
            writeln!(f, "| Total time | {} |", summary.elapsed)?;
        }
        writeln!(f, "| Total tests | {} |", summary.total())?;
        writeln!(f, "| Passed | {} |", summary.passed)?;
        writeln!(f, "| Failed | {} |", summary.failed)?;
        if summary.skipped > 0 {
            writeln!(f, "| Skipped | {} |", summary.skipped)?;
        }
        writeln!(
            f,
            "| Success rate | {:.1}% |",
            self.results.success_rate() * 100.0
        )?;
        if !self.results.passed.is_empty() || !self.results.failed.is_empty() {
            writeln!(
                f,
                "| Result lines | {} passed, {} failed ({:.1}%) |",
                self.results.passed.len(),
                self.results.failed.len(),
                self.results.classified_success_rate() * 100.0
            )?;
        }
        writeln!(f)
    }

    fn write_failed_tests(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = &self.results.failed;
        if failed.is_empty() {
            return Ok(());
        }

        writeln!(f, "## Failed tests ({})", failed.len())?;
        writeln!(f)?;
        for (i, test) in failed.iter().enumerate() {
            writeln!(f, "{}. **{}**", i + 1, test.name)?;
            writeln!(f, "   - File: `{}`", test.file)?;
            if let Some(command) = &test.rerun_command {
                writeln!(f, "   - Rerun: `{command}`")?;
            }
        }
        writeln!(f)
    }

    fn write_errors(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagnostics = self.results.diagnostics();
        if diagnostics.is_empty() {
            return Ok(());
        }

        writeln!(f, "## Errors ({})", diagnostics.len())?;
        for (i, diagnosis) in diagnostics.iter().enumerate() {
            writeln!(f)?;
            self.write_error(f, i + 1, diagnosis)?;
        }
        writeln!(f)
    }

    fn write_error(
        &self,
        f: &mut fmt::Formatter<'_>,
        number: usize,
        diagnosis: &Diagnosis,
    ) -> fmt::Result {
        let record = &diagnosis.record;
        writeln!(f, "### Error {number}: {}", record.test)?;
        writeln!(f)?;
        writeln!(f, "- File: `{}`", record.file)?;
        writeln!(f, "- Type: {}", record.exception_category)?;
        if let Some(line) = record.line_number {
            writeln!(f, "- Line: {line}")?;
        }
        if let Some(exception) = &record.exception_type {
            writeln!(f, "- Exception: {exception}")?;
        }
        if let Some(overflow) = &record.overflow_info {
            writeln!(f, "- Overflow: {overflow}")?;
        }
        if let Some(widget) = &record.relevant_widget {
            writeln!(f, "- Error-causing widget: `{widget}`")?;
        }
        if let Some(widget) = &record.widget {
            if record.relevant_widget.as_ref() != Some(widget) {
                writeln!(f, "- Related widget: `{widget}`")?;
            }
        }

        let message = record.best_message();
        if !message.is_empty() {
            writeln!(f)?;
            writeln!(f, "```text")?;
            writeln!(f, "{message}")?;
            writeln!(f, "```")?;
        }

        if !record.stack_frames.is_empty() {
            let shown = record.stack_frames.len().min(self.options.max_frames);
            writeln!(f)?;
            writeln!(f, "Stack trace (first {shown} frames, `>` marks test code):")?;
            writeln!(f)?;
            writeln!(f, "```text")?;
            for frame in &record.stack_frames[..shown] {
                let marker = if record.is_test_frame(frame) { '>' } else { ' ' };
                writeln!(f, "{marker} {frame}")?;
            }
            if record.stack_frames.len() > shown {
                writeln!(
                    f,
                    "... and {} more frames",
                    record.stack_frames.len() - shown
                )?;
            }
            writeln!(f, "```")?;
        }

        writeln!(f)?;
        writeln!(f, "Suggestions:")?;
        writeln!(f)?;
        for suggestion in &diagnosis.suggestions {
            writeln!(f, "- {suggestion}")?;
        }
        Ok(())
    }

    fn write_recent_passed(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = &self.results.passed;
        if passed.is_empty() || self.options.recent_passed == 0 {
            return Ok(());
        }

        let start = passed.len().saturating_sub(self.options.recent_passed);
        let recent = &passed[start..];
        writeln!(
            f,
            "## Recent passed tests ({} of {})",
            recent.len(),
            passed.len()
        )?;
        writeln!(f)?;
        for test in recent {
            writeln!(f, "- {} (`{}`)", test.name, test.file_name())?;
        }
        writeln!(f)
    }
}

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.generated_at {
            Some(timestamp) => writeln!(f, "# Flutter Test Report ({timestamp})")?,
            None => writeln!(f, "# Flutter Test Report")?,
        }
        writeln!(f)?;

        self.write_summary(f)?;
        self.write_failed_tests(f)?;
        self.write_errors(f)?;
        self.write_recent_passed(f)?;

        if self.results.has_failures() {
            let failed = self.results.summary.failed.max(self.results.failed.len());
            writeln!(f, "**Tests failed: {failed} test(s) need attention**")
        } else {
            writeln!(f, "**All tests passed**")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::parse_log;
    use similar_asserts::assert_eq;

    fn failing_log() -> String {
        let rule = "═".repeat(60);
        let frames: Vec<String> = (0..12)
            .map(|i| format!("#{i}      frame{i} (package:app/src/f{i}.dart:{i}:1)"))
            .collect();
        format!(
            "00:01 +1: test/a_test.dart: passes\n\
             00:02 +1 -1: test/a_test.dart: overflows [E]\n\
             {rule}\n\
             EXCEPTION CAUGHT BY RENDERING LIBRARY\n\
             The following assertion was thrown during layout:\n\
             A RenderFlex overflowed by 12 pixels on the right.\n\
             {frames}\n\
             {rule}\n\
             To run this test again: flutter test test/a_test.dart -p vm --plain-name 'overflows'\n\
             00:03 +1 -1: Some tests failed.",
            frames = frames.join("\n")
        )
    }

    #[test]
    fn test_markdown_sections() {
        let results = parse_log(&failing_log());
        let markdown = MarkdownReport::new(&results, ReportOptions::default())
            .generated_at("2026-01-17 02:33:06")
            .to_string();

        assert!(markdown.starts_with("# Flutter Test Report (2026-01-17 02:33:06)"));
        assert!(markdown.contains("| Total time | 00:03 |"));
        assert!(markdown.contains("| Success rate | 50.0% |"));
        assert!(markdown.contains("## Failed tests (1)"));
        assert!(markdown.contains("   - Rerun: `flutter test test/a_test.dart -p vm --plain-name 'overflows'`"));
        assert!(markdown.contains("### Error 1: overflows"));
        assert!(markdown.contains("- Type: RENDERING LIBRARY"));
        assert!(markdown.contains("Stack trace (first 10 frames, `>` marks test code):"));
        assert!(markdown.contains("\n  #0      frame0 (package:app/src/f0.dart:0:1)\n"));
        assert!(markdown.contains("... and 2 more frames"));
        assert!(markdown.contains("- Use Expanded or Flexible widgets to control flex children"));
        assert!(markdown.contains("## Recent passed tests (1 of 1)"));
        assert!(markdown.contains("- passes (`a_test.dart`)"));
        assert!(markdown.contains("| Result lines | 1 passed, 1 failed (50.0%) |"));
        assert!(markdown.ends_with("**Tests failed: 1 test(s) need attention**\n"));
    }

    #[test]
    fn test_markdown_all_passed() {
        let results = parse_log("00:01 +1: a_test.dart: passes\n00:01 +1: All tests passed!");
        let markdown = MarkdownReport::new(&results, ReportOptions::default()).to_string();
        assert!(!markdown.contains("## Failed tests"));
        assert!(!markdown.contains("## Errors"));
        assert!(markdown.ends_with("**All tests passed**\n"));
    }

    #[test]
    fn test_recent_passed_limit() {
        let log: Vec<String> = (0..8)
            .map(|i| format!("00:0{i} +{i}: a_test.dart: test {i}"))
            .collect();
        let results = parse_log(&log.join("\n"));
        let options = ReportOptions {
            recent_passed: 3,
            ..ReportOptions::default()
        };
        let markdown = MarkdownReport::new(&results, options).to_string();
        assert!(markdown.contains("## Recent passed tests (3 of 8)"));
        assert!(markdown.contains("- test 7 (`a_test.dart`)"));
        assert!(!markdown.contains("- test 4 "));
    }

    #[test]
    fn test_run_report_json() {
        let results = parse_log(&failing_log());
        let report = RunReport::from_results(&results);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].record.exception_category, "RENDERING LIBRARY");

        let json = report.to_json().expect("Should serialize");
        assert!(json.contains("\"success_rate\": 0.5"));
        assert!(json.contains("\"classified_success_rate\": 0.5"));
        assert!(json.contains("\"suggestions\""));
        assert!(json.contains("\"exception_category\": \"RENDERING LIBRARY\""));

        let back: RunReport = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(back, report);
    }
}
