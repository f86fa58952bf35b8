//! Reporter interface
//!
//! The lifecycle callbacks a test engine drives, and the event records it
//! passes along.

pub mod events;

pub use events::{parse_event, FailedExpectation, RunEvent, RunSummary, TestResult, TestStatus};

use std::io::{self, BufRead};

use anyhow::{Context, Result};

/// Receives lifecycle notifications from a test engine.
///
/// Calls arrive strictly in order: `run_started`, any number of
/// `test_completed`, then `run_finished`. Errors are output failures only.
pub trait Reporter {
    /// A run is starting with `summary.total_tests_defined` test cases
    fn run_started(&mut self, summary: &RunSummary) -> io::Result<()>;

    /// A test case finished
    fn test_completed(&mut self, result: &TestResult) -> io::Result<()>;

    /// The run is over
    fn run_finished(&mut self) -> io::Result<()>;
}

/// Route a parsed event to the matching reporter callback
pub fn dispatch<R: Reporter + ?Sized>(reporter: &mut R, event: &RunEvent) -> io::Result<()> {
    match event {
        RunEvent::RunStarted(summary) => reporter.run_started(summary),
        RunEvent::TestCompleted(result) => reporter.test_completed(result),
        RunEvent::RunFinished => reporter.run_finished(),
    }
}

/// Feed a newline-delimited JSON event stream to `reporter`.
///
/// Blank lines are skipped. Returns the number of events dispatched.
pub fn replay<B: BufRead, R: Reporter + ?Sized>(input: B, reporter: &mut R) -> Result<usize> {
    let mut dispatched = 0;
    for (line_num, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read event line {}", line_num + 1))?;
        let Some(event) =
            parse_event(&line).with_context(|| format!("Invalid event on line {}", line_num + 1))?
        else {
            continue;
        };
        dispatch(reporter, &event).context("Failed to write report output")?;
        dispatched += 1;
    }
    Ok(dispatched)
}
