//! Lifecycle event records consumed from the test engine
//!
//! The engine reports a run as `run_started`, one `test_completed` per test
//! case, then `run_finished`. On the wire each event is a JSON object on its
//! own line, tagged by `type`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Status of a completed test case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestStatus {
    /// All expectations held
    Passed,
    /// At least one expectation failed
    Failed,
    /// Marked pending by the engine
    Pending,
    /// Excluded from the run
    Disabled,
    /// Any status key this crate does not know about
    Other(String),
}

impl TestStatus {
    /// Map a status key to its variant. Unknown keys are kept verbatim.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        match key {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "pending" => Self::Pending,
            "disabled" => Self::Disabled,
            other => Self::Other(other.to_string()),
        }
    }

    /// The status key as the engine spells it
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Disabled => "disabled",
            Self::Other(key) => key,
        }
    }
}

impl From<String> for TestStatus {
    fn from(key: String) -> Self {
        match Self::parse(&key) {
            Self::Other(_) => Self::Other(key),
            known => known,
        }
    }
}

impl From<TestStatus> for String {
    fn from(status: TestStatus) -> Self {
        status.key().to_string()
    }
}

/// Payload of the run-started notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of test cases the engine expects to report
    #[serde(alias = "totalTestsDefined", alias = "totalSpecsDefined")]
    pub total_tests_defined: usize,
}

/// One expectation reported with a failed test case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedExpectation {
    /// Engines report passing expectations here too; those are skipped
    #[serde(default)]
    pub passed: bool,
    /// Human readable failure message, `None` when the engine sent none
    #[serde(default)]
    pub message: Option<String>,
    /// Raw stack trace text, `None` when the engine sent none
    #[serde(default)]
    pub stack: Option<String>,
}

/// Result record for a single completed test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Outcome of the test case
    pub status: TestStatus,
    /// Fully qualified test name (suite names plus the case description)
    #[serde(alias = "fullName")]
    pub full_name: String,
    /// Expectations recorded for a failed case, in report order
    #[serde(default, alias = "failedExpectations")]
    pub failed_expectations: Vec<FailedExpectation>,
}

/// A lifecycle notification from the test engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// A run is about to report its tests
    RunStarted(RunSummary),
    /// A single test case finished
    TestCompleted(TestResult),
    /// The run is over
    RunFinished,
}

/// Parse one line of the event stream.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_event(line: &str) -> Result<Option<RunEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let event = serde_json::from_str(line).context("Failed to parse run event")?;
    Ok(Some(event))
}
