//! linereport - one line per test case
//!
//! A pluggable result formatter for test runners. It listens to the run
//! lifecycle (run started, test completed, run finished) and prints one
//! aligned line per test case, with failure detail indented beneath failed
//! tests.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod format;
pub mod reporter;
pub mod sink;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use format::{ConfigOverrides, FormatterConfig, LineFormatter, RunCounters, StackTraceFilter};
pub use reporter::{
    dispatch, parse_event, replay, FailedExpectation, Reporter, RunEvent, RunSummary, TestResult,
    TestStatus,
};
pub use sink::{LineSink, MemorySink, WriterSink};
