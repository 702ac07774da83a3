// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! flutter-triage: `flutter test` log parsing and failure diagnostics
//!
//! This library crate turns the console output of a Flutter test run into
//! structured pass/fail records, one record per caught exception block, and
//! rule-based debugging suggestions for each exception.
//!
//! # Example
//!
//! ```
//! use flutter_triage::{parse_log, advisor};
//!
//! let log = "00:02 +1 -0: foo_test.dart: renders correctly\n00:02 +1: All tests passed!";
//! let results = parse_log(log);
//! assert_eq!(results.passed.len(), 1);
//! assert_eq!(results.summary.passed, 1);
//!
//! for record in &results.errors {
//!     for suggestion in advisor::suggest(record) {
//!         println!("{suggestion}");
//!     }
//! }
//! ```

pub mod advisor;
pub mod aggregate;
pub mod classify;
pub mod error;
pub mod extract;
pub mod options;
pub mod report;
pub mod result;
pub mod session;

pub use aggregate::{Diagnosis, RunSummary, TestRunResults};
pub use error::TriageError;
pub use extract::{ExceptionRecord, extract_block};
pub use options::{ParserOptions, ReportOptions};
pub use report::{MarkdownReport, RunReport};
pub use result::{TestOutcome, TestStatus};
pub use session::{SessionParser, parse_file, parse_log, parse_log_with, parse_streams};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::aggregate::{RunSummary, TestRunResults};
    pub use crate::error::TriageError;
    pub use crate::extract::ExceptionRecord;
    pub use crate::options::ParserOptions;
    pub use crate::result::{TestOutcome, TestStatus};
    pub use crate::session::{SessionParser, parse_log};
}
