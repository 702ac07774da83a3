// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Parser and report configuration

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// Default minimum number of `═` characters for an exception delimiter
pub const DEFAULT_MIN_RULE_WIDTH: usize = 20;

/// Default number of stack frames rendered per error
pub const DEFAULT_MAX_FRAMES: usize = 10;

/// Default number of recently passed tests rendered
pub const DEFAULT_RECENT_PASSED: usize = 5;

/// Options controlling how log lines are classified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Only treat a line as a test result if it contains `": "` and one of
    /// the `PASS`, `FAIL` or `[E]` markers
    ///
    /// When off, the progress line `flutter test` prints as each test starts
    /// is recorded as passed, so a test that later fails is listed in both
    /// `passed` and `failed`.
    pub require_status_marker: bool,
    /// Minimum number of `═` characters for a line to count as a delimiter
    pub min_rule_width: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            require_status_marker: false,
            min_rule_width: DEFAULT_MIN_RULE_WIDTH,
        }
    }
}

impl ParserOptions {
    /// Enable or disable the status marker gate for result lines
    #[must_use]
    pub fn with_status_marker(mut self, required: bool) -> Self {
        self.require_status_marker = required;
        self
    }

    /// Set the minimum delimiter width
    #[must_use]
    pub fn with_min_rule_width(mut self, width: usize) -> Self {
        self.min_rule_width = width;
        self
    }

    /// Validate the options
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidOptions` if `min_rule_width` is below 3,
    /// which would let ordinary text containing a couple of `═` toggle blocks.
    pub fn validate(&self) -> Result<(), TriageError> {
        if self.min_rule_width < 3 {
            return Err(TriageError::InvalidOptions {
                message: format!(
                    "min_rule_width must be at least 3, got {}",
                    self.min_rule_width
                ),
            });
        }
        Ok(())
    }
}

/// Options controlling how much detail reports include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Maximum stack frames shown per error
    pub max_frames: usize,
    /// Number of most recent passed tests listed
    pub recent_passed: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            recent_passed: DEFAULT_RECENT_PASSED,
        }
    }
}
