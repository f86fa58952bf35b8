//! Line-per-test formatting
//!
//! Configuration, column layout and the [`LineFormatter`] reporter.

pub mod config;
pub mod layout;
pub mod line;
pub mod stack;

pub use config::{ConfigOverrides, FormatterConfig, StackTraceFilter, StackTraceOverrides};
pub use line::{LineFormatter, RunCounters};
