//! One line per test case
//!
//! Renders `<status> - <n>/<total> - <full name>` for every completed test,
//! with the failure detail of failed tests indented beneath it.

use std::collections::BTreeMap;
use std::io;

use colored::Colorize;
use tracing::{debug, trace, warn};

use super::config::FormatterConfig;
use super::layout::{indent_lines, max_label_width, message_indent, pad_labels, right_justify};
use super::stack::stack_trace_lines;
use crate::reporter::{Reporter, RunSummary, TestResult, TestStatus};
use crate::sink::LineSink;

/// Counters scoped to a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Index of the most recently completed test, 1-based
    pub current: usize,
    /// Total announced by the engine at run start
    pub total: usize,
    /// Disabled tests suppressed so far
    pub disabled_hidden: usize,
    /// Pending tests suppressed so far
    pub pending_hidden: usize,
}

/// Reporter that prints one line per test case to a [`LineSink`]
#[derive(Debug)]
pub struct LineFormatter<S> {
    engine: String,
    config: FormatterConfig,
    sink: S,
    padded_status: BTreeMap<String, String>,
    status_width: usize,
    message_indent: String,
    run: RunCounters,
}

impl<S: LineSink> LineFormatter<S> {
    /// Create a formatter writing to `sink`.
    ///
    /// `engine` names the test engine driving this reporter; it only shows
    /// up in diagnostics.
    pub fn new(engine: impl Into<String>, config: FormatterConfig, sink: S) -> Self {
        let padded_status = pad_labels(&config.status_display);
        let status_width = max_label_width(&config.status_display);
        let message_indent = message_indent(status_width, &config.separator, 0);

        Self {
            engine: engine.into(),
            config,
            sink,
            padded_status,
            status_width,
            message_indent,
            run: RunCounters::default(),
        }
    }

    /// Name of the engine this formatter reports for
    #[must_use]
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// The resolved configuration
    #[must_use]
    pub const fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Counters for the current run
    #[must_use]
    pub const fn counters(&self) -> RunCounters {
        self.run
    }

    /// Status label for `key`, padded to the widest configured label
    #[must_use]
    pub fn padded_label(&self, key: &str) -> Option<&str> {
        self.padded_status.get(key).map(String::as_str)
    }

    /// Prefix used for lines printed beneath a summary line
    #[must_use]
    pub fn message_indent(&self) -> &str {
        &self.message_indent
    }

    /// The output sink
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The output sink, mutably
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the formatter, returning its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn status_column(&self, key: &str) -> String {
        let padded = self.padded_status.get(key).map_or(key, String::as_str);
        if !self.config.color {
            return padded.to_string();
        }
        match key {
            "passed" => padded.green().to_string(),
            "failed" => padded.red().bold().to_string(),
            "pending" => padded.yellow().to_string(),
            "disabled" => padded.dimmed().to_string(),
            _ => padded.to_string(),
        }
    }

    fn report_failure(&mut self, result: &TestResult, body: &str) -> io::Result<()> {
        let line = format!("{}{body}", self.status_column("failed"));
        let config = &self.config;
        let mut detail = Detail {
            sink: &mut self.sink,
            indent: config.indent_expectation,
            indent_str: &self.message_indent,
        };

        detail.emit(config.failure_prefix_line.as_deref())?;
        detail.sink.emit(&line)?;

        if config.show_expectation {
            for expectation in result.failed_expectations.iter().filter(|e| !e.passed) {
                detail.emit(config.failure_expectation_message_prefix_line.as_deref())?;
                detail.emit(expectation.message.as_deref())?;
                if config.show_stack_trace {
                    let stack = expectation.stack.as_deref();
                    for stack_line in stack_trace_lines(stack, &config.stack_trace) {
                        detail.emit(Some(stack_line.as_str()))?;
                    }
                }
                detail.emit(config.failure_expectation_message_suffix_line.as_deref())?;
            }
        }

        detail.emit(config.failure_suffix_line.as_deref())
    }

    fn report_hidden(&mut self, noun: &str, count: usize) -> io::Result<()> {
        if count == 0 {
            return Ok(());
        }
        let summary = if count == 1 {
            format!("1 {noun} spec was hidden")
        } else {
            format!("{count} {noun} specs were hidden")
        };
        self.sink.emit("")?;
        self.sink.emit(&summary)
    }
}

impl<S: LineSink> Reporter for LineFormatter<S> {
    fn run_started(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.run = RunCounters {
            total: summary.total_tests_defined,
            ..RunCounters::default()
        };
        self.message_indent = message_indent(
            self.status_width,
            &self.config.separator,
            summary.total_tests_defined,
        );
        debug!(
            engine = %self.engine,
            total = summary.total_tests_defined,
            "Run started"
        );
        Ok(())
    }

    fn test_completed(&mut self, result: &TestResult) -> io::Result<()> {
        self.run.current += 1;
        if self.run.current > self.run.total {
            warn!(
                current = self.run.current,
                total = self.run.total,
                "More tests completed than the engine announced"
            );
        }
        trace!(status = result.status.key(), name = %result.full_name, "Test completed");

        let separator = &self.config.separator;
        let body = format!(
            "{separator}{}/{}{separator}{}",
            right_justify(self.run.current, self.config.max_digit_places),
            self.run.total,
            result.full_name
        );

        match &result.status {
            TestStatus::Failed => self.report_failure(result, &body),
            status if self.padded_status.contains_key(status.key()) => {
                match status {
                    TestStatus::Disabled if self.config.hide_disabled_specs => {
                        self.run.disabled_hidden += 1;
                        return Ok(());
                    }
                    TestStatus::Pending if self.config.hide_pending_specs => {
                        self.run.pending_hidden += 1;
                        return Ok(());
                    }
                    _ => {}
                }
                let line = format!("{}{body}", self.status_column(status.key()));
                self.sink.emit(&line)
            }
            status => self.sink.emit(&format!("{} {body}", status.key())),
        }
    }

    fn run_finished(&mut self) -> io::Result<()> {
        debug!(
            engine = %self.engine,
            completed = self.run.current,
            total = self.run.total,
            disabled_hidden = self.run.disabled_hidden,
            pending_hidden = self.run.pending_hidden,
            "Run finished"
        );
        if self.config.hide_disabled_specs {
            self.report_hidden("disabled", self.run.disabled_hidden)?;
        }
        if self.config.hide_pending_specs {
            self.report_hidden("pending", self.run.pending_hidden)?;
        }
        Ok(())
    }
}

/// Emits optional, possibly multi-line detail under a summary line
struct Detail<'a, S> {
    sink: &'a mut S,
    indent: bool,
    indent_str: &'a str,
}

impl<S: LineSink> Detail<'_, S> {
    fn emit(&mut self, message: Option<&str>) -> io::Result<()> {
        match message {
            Some(message) => self
                .sink
                .emit(&indent_lines(message, self.indent, self.indent_str)),
            None => Ok(()),
        }
    }
}
