// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Diagnostic suggestions for extracted exceptions
//!
//! Suggestions come from an ordered table of independent rules. Every rule
//! whose predicate holds contributes its suggestions, in table order, so the
//! output for a given record is stable. New rules are added to [`RULES`].

use crate::extract::ExceptionRecord;

/// Where a rule's suggestions come from
#[derive(Debug, Clone, Copy)]
pub enum Suggestions {
    /// A fixed list of suggestions
    Fixed(&'static [&'static str]),
    /// A single suggestion built from the record
    Formatted(fn(&ExceptionRecord) -> Option<String>),
}

/// One advisor rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short rule identifier
    pub name: &'static str,
    /// Predicate over the record and its lower-cased text
    pub applies: fn(&ExceptionRecord, &str) -> bool,
    /// Suggestions contributed when the rule applies
    pub suggestions: Suggestions,
}

/// Advisor rules in output order
pub static RULES: &[Rule] = &[
    Rule {
        name: "overflow",
        applies: |_, text| text.contains("renderflex overflowed") || text.contains("overflow"),
        suggestions: Suggestions::Fixed(&[
            "Use Expanded or Flexible widgets to control flex children",
            "Consider using SingleChildScrollView for scrollable content",
            "Check if container sizes are too large for available space",
            "Add constraints to limit widget dimensions",
        ]),
    },
    Rule {
        name: "builder",
        applies: |record, _| {
            record
                .widget
                .as_deref()
                .is_some_and(|w| w.to_lowercase().contains("builder"))
        },
        suggestions: Suggestions::Fixed(&[
            "Check if the Builder's build function handles null cases",
            "Verify all required data is available when Builder executes",
            "Consider using FutureBuilder or StreamBuilder for async data",
        ]),
    },
    Rule {
        name: "intentional-test-exception",
        applies: |_, text| text.contains("exception") && text.contains("test error"),
        suggestions: Suggestions::Fixed(&[
            "This appears to be an intentional test exception",
            "Verify that error handling widgets are properly implemented",
            "Check if the test is expecting this exception to be caught",
        ]),
    },
    Rule {
        name: "line-number",
        applies: |record, _| record.line_number.is_some(),
        suggestions: Suggestions::Formatted(|record| {
            record
                .line_number
                .map(|line| format!("Check line {} in {}", line, record.file))
        }),
    },
    Rule {
        name: "widgets-library",
        applies: |record, _| category_contains(record, "widgets library"),
        suggestions: Suggestions::Fixed(&[
            "This is a widget construction error - check widget parameters",
            "Verify all required parameters are provided to widgets",
            "Check for null values being passed to widgets",
        ]),
    },
    Rule {
        name: "rendering-library",
        applies: |record, _| category_contains(record, "rendering library"),
        suggestions: Suggestions::Fixed(&[
            "This is a layout/rendering error",
            "Check widget sizing and constraints",
            "Verify parent-child widget relationships",
        ]),
    },
    Rule {
        name: "test-framework",
        applies: |record, _| category_contains(record, "flutter test framework"),
        suggestions: Suggestions::Fixed(&[
            "Multiple exceptions occurred during test execution",
            "Check test setup and teardown procedures",
            "Verify test environment is properly initialized",
        ]),
    },
];

/// Suggestions emitted when no rule applies
pub const FALLBACK_SUGGESTIONS: [&str; 4] = [
    "Review the full error message and stack trace above",
    "Check the widget tree structure around the error location",
    "Verify test data and mocks are properly set up",
    "Consider adding debug prints to trace execution flow",
];

/// Generate debugging suggestions for an exception record
#[must_use]
pub fn suggest(record: &ExceptionRecord) -> Vec<String> {
    let text = haystack(record);
    let mut suggestions = Vec::new();

    for rule in matching(record, &text) {
        match rule.suggestions {
            Suggestions::Fixed(items) => {
                suggestions.extend(items.iter().map(|s| (*s).to_string()));
            }
            Suggestions::Formatted(build) => suggestions.extend(build(record)),
        }
    }

    if suggestions.is_empty() {
        suggestions.extend(FALLBACK_SUGGESTIONS.iter().map(|s| (*s).to_string()));
    }
    suggestions
}

/// Names of the rules that apply to a record, in table order
#[must_use]
pub fn matched_rules(record: &ExceptionRecord) -> Vec<&'static str> {
    let text = haystack(record);
    matching(record, &text).map(|rule| rule.name).collect()
}

fn matching<'a>(record: &'a ExceptionRecord, text: &'a str) -> impl Iterator<Item = &'static Rule> + 'a {
    RULES.iter().filter(move |rule| (rule.applies)(record, text))
}

/// Lower-cased `full_message`, `message`, `exception_type` and category
fn haystack(record: &ExceptionRecord) -> String {
    [
        record.full_message.as_str(),
        record.message.as_str(),
        record.exception_type.as_deref().unwrap_or(""),
        record.exception_category.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

fn category_contains(record: &ExceptionRecord, needle: &str) -> bool {
    record.exception_category.to_lowercase().contains(needle)
}
