// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Result aggregation
//!
//! The counter line (`00:10 +50 -3:`) and the individually classified result
//! lines are independent signals. They are stored side by side and never
//! reconciled against each other.

use serde::{Deserialize, Serialize};

use crate::advisor;
use crate::extract::ExceptionRecord;
use crate::result::{TestOutcome, TestStatus};

/// Totals from the last run counter line seen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Elapsed time stamp (`mm:ss`)
    pub elapsed: String,
    /// Tests passed
    pub passed: usize,
    /// Tests failed
    pub failed: usize,
    /// Tests skipped
    pub skipped: usize,
}

impl RunSummary {
    /// Passed plus failed, saturating at `usize::MAX`
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed.saturating_add(self.failed)
    }

    /// `passed / (passed + failed)`, 0.0 when no tests were counted
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        ratio(self.passed, self.total())
    }
}

/// An exception record paired with its debugging suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// The extracted exception
    #[serde(flatten)]
    pub record: ExceptionRecord,
    /// Suggestions in rule order
    pub suggestions: Vec<String>,
}

/// Aggregated results of one parse session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunResults {
    /// Last counter line seen
    pub summary: RunSummary,
    /// Passing result lines, in log order
    pub passed: Vec<TestOutcome>,
    /// Failing result lines, in log order
    pub failed: Vec<TestOutcome>,
    /// Exception records, in log order
    pub errors: Vec<ExceptionRecord>,
}

impl TestRunResults {
    /// Create empty results
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the run summary
    pub fn set_summary(&mut self, summary: RunSummary) {
        self.summary = summary;
    }

    /// Store an outcome in the passed or failed list
    ///
    /// Returns the position of the stored outcome.
    pub fn record_outcome(&mut self, outcome: TestOutcome) -> OutcomeRef {
        let status = outcome.status;
        let list = self.list_mut(status);
        list.push(outcome);
        OutcomeRef {
            status,
            index: list.len() - 1,
        }
    }

    /// Store an exception record
    pub fn record_error(&mut self, record: ExceptionRecord) {
        self.errors.push(record);
    }

    /// Look up a stored outcome
    #[must_use]
    pub fn outcome(&self, position: OutcomeRef) -> Option<&TestOutcome> {
        self.list(position.status).get(position.index)
    }

    /// Look up a stored outcome mutably
    pub fn outcome_mut(&mut self, position: OutcomeRef) -> Option<&mut TestOutcome> {
        self.list_mut(position.status).get_mut(position.index)
    }

    /// Success rate from the counter line (see [`RunSummary::success_rate`])
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        self.summary.success_rate()
    }

    /// Success rate computed from the classified result lines
    #[must_use]
    pub fn classified_success_rate(&self) -> f64 {
        ratio(
            self.passed.len(),
            self.passed.len().saturating_add(self.failed.len()),
        )
    }

    /// Check if either signal reports a failure
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0 || !self.failed.is_empty()
    }

    /// Pair every exception record with its suggestions
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnosis> {
        self.errors
            .iter()
            .map(|record| Diagnosis {
                record: record.clone(),
                suggestions: advisor::suggest(record),
            })
            .collect()
    }

    fn list(&self, status: TestStatus) -> &Vec<TestOutcome> {
        match status {
            TestStatus::Passed => &self.passed,
            TestStatus::Failed => &self.failed,
        }
    }

    fn list_mut(&mut self, status: TestStatus) -> &mut Vec<TestOutcome> {
        match status {
            TestStatus::Passed => &mut self.passed,
            TestStatus::Failed => &mut self.failed,
        }
    }
}

/// Position of an outcome inside [`TestRunResults`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeRef {
    status: TestStatus,
    index: usize,
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
