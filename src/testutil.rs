//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use crate::reporter::{FailedExpectation, RunSummary, TestResult, TestStatus};

/// Run-started payload announcing `total` tests
#[must_use]
pub const fn run_summary(total: usize) -> RunSummary {
    RunSummary {
        total_tests_defined: total,
    }
}

/// A result with the given status key and no expectations
#[must_use]
pub fn make_result(status: &str, full_name: &str) -> TestResult {
    TestResult {
        status: TestStatus::parse(status),
        full_name: full_name.to_string(),
        failed_expectations: vec![],
    }
}

/// A single expectation record
#[must_use]
pub fn expectation(passed: bool, message: &str, stack: &str) -> FailedExpectation {
    FailedExpectation {
        passed,
        message: Some(message.to_string()),
        stack: Some(stack.to_string()),
    }
}
