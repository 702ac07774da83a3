// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test outcome types

use serde::{Deserialize, Serialize};

/// Possible test statuses reported on a result line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed (`[E]` or `FAIL` marker)
    Failed,
}

/// A single test seen on a result line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test description as printed after the file path
    pub name: String,
    /// Test source file (ends in `.dart`)
    pub file: String,
    /// Outcome of the test
    pub status: TestStatus,
    /// Elapsed run time stamp (`mm:ss`) printed at the start of the line
    pub elapsed: String,
    /// Command printed after "To run this test again:"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerun_command: Option<String>,
}

impl TestOutcome {
    /// Create a new outcome without a rerun command
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        file: impl Into<String>,
        status: TestStatus,
        elapsed: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            status,
            elapsed: elapsed.into(),
            rerun_command: None,
        }
    }

    /// Check if the test passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    /// Check if the test failed
    #[must_use]
    pub fn failed(&self) -> bool {
        self.status == TestStatus::Failed
    }

    /// Final path component of the test file
    ///
    /// `/app/test/widget_test.dart` → `widget_test.dart`
    #[must_use]
    pub fn file_name(&self) -> &str {
        file_name_of(&self.file)
    }
}

/// Final path component of a `/`-separated path
pub(crate) fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
