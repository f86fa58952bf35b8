//! Formatter configuration
//!
//! `FormatterConfig` is the fully resolved configuration a formatter owns.
//! `ConfigOverrides` is a partial configuration, usually read from a
//! `linereport.toml` file, merged over the defaults field by field.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use toml::{Table, Value};
use tracing::warn;

/// Stack trace line filtering
#[derive(Debug, Clone)]
pub struct StackTraceFilter {
    /// Only stack lines matching this pattern are shown. `None` prints the whole trace.
    pub pattern: Option<Regex>,
    /// Substitution applied to the first match in each matched line.
    ///
    /// `$1` and `${name}` expand capture groups. A group reference followed
    /// by letters, digits or `_` needs braces: `${1}line`, since `$1line`
    /// names a group called `1line` and expands to nothing.
    pub replacement: Option<String>,
    /// Maximum number of matched lines to show, 0 for unlimited
    pub show_max: usize,
}

impl Default for StackTraceFilter {
    fn default() -> Self {
        Self {
            pattern: None,
            replacement: None,
            show_max: 1,
        }
    }
}

/// Resolved formatter configuration
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Display label per status key
    pub status_display: BTreeMap<String, String>,
    /// Text placed between the status, the counter and the test name
    pub separator: String,
    /// Field width of the running test index
    pub max_digit_places: usize,
    /// Print the message of each failed expectation
    pub show_expectation: bool,
    /// Print stack traces beneath failed expectation messages
    pub show_stack_trace: bool,
    /// Indent failure detail to line up under the test name
    pub indent_expectation: bool,
    /// Line printed before each failed test
    pub failure_prefix_line: Option<String>,
    /// Line printed after each failed test
    pub failure_suffix_line: Option<String>,
    /// Line printed before each failed expectation
    pub failure_expectation_message_prefix_line: Option<String>,
    /// Line printed after each failed expectation
    pub failure_expectation_message_suffix_line: Option<String>,
    /// Suppress disabled tests and report how many were hidden at the end
    pub hide_disabled_specs: bool,
    /// Suppress pending tests and report how many were hidden at the end
    pub hide_pending_specs: bool,
    /// Colorize the status column
    pub color: bool,
    /// Stack trace filtering
    pub stack_trace: StackTraceFilter,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        let status_display = [
            ("disabled", "Disabled"),
            ("failed", "FAILED"),
            ("passed", "Passed"),
            ("pending", "Pending"),
        ]
        .into_iter()
        .map(|(key, label)| (key.to_string(), label.to_string()))
        .collect();

        Self {
            status_display,
            separator: " - ".to_string(),
            max_digit_places: 3,
            show_expectation: true,
            show_stack_trace: false,
            indent_expectation: true,
            failure_prefix_line: None,
            failure_suffix_line: Some(String::new()),
            failure_expectation_message_prefix_line: None,
            failure_expectation_message_suffix_line: None,
            hide_disabled_specs: false,
            hide_pending_specs: false,
            color: false,
            stack_trace: StackTraceFilter::default(),
        }
    }
}

impl FormatterConfig {
    /// Merge `overrides` over this configuration.
    ///
    /// Status labels merge key by key, so overriding one label keeps the others.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.status_display.extend(overrides.status_display);

        replace(&mut self.separator, overrides.separator);
        replace(&mut self.max_digit_places, overrides.max_digit_places);
        replace(&mut self.show_expectation, overrides.show_expectation);
        replace(&mut self.show_stack_trace, overrides.show_stack_trace);
        replace(&mut self.indent_expectation, overrides.indent_expectation);
        replace(&mut self.failure_prefix_line, overrides.failure_prefix_line);
        replace(&mut self.failure_suffix_line, overrides.failure_suffix_line);
        replace(
            &mut self.failure_expectation_message_prefix_line,
            overrides.failure_expectation_message_prefix_line,
        );
        replace(
            &mut self.failure_expectation_message_suffix_line,
            overrides.failure_expectation_message_suffix_line,
        );
        replace(&mut self.hide_disabled_specs, overrides.hide_disabled_specs);
        replace(&mut self.hide_pending_specs, overrides.hide_pending_specs);
        replace(&mut self.color, overrides.color);

        let stack = overrides.stack_trace;
        replace(&mut self.stack_trace.pattern, stack.pattern);
        replace(&mut self.stack_trace.replacement, stack.replacement);
        replace(&mut self.stack_trace.show_max, stack.show_max);

        self
    }
}

fn replace<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Stack trace settings of a partial configuration
#[derive(Debug, Clone, Default)]
pub struct StackTraceOverrides {
    /// `Some(None)` clears the pattern
    pub pattern: Option<Option<Regex>>,
    /// `Some(None)` clears the replacement
    pub replacement: Option<Option<String>>,
    /// New show-max value
    pub show_max: Option<usize>,
}

/// Partial configuration. `None` fields keep the value they are merged over.
///
/// Optional literal lines are tri-state: `None` keeps the default,
/// `Some(None)` turns the line off and `Some(Some(text))` sets it.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Labels to add or replace, keyed by status
    pub status_display: BTreeMap<String, String>,
    /// Field separator
    pub separator: Option<String>,
    /// Index field width
    pub max_digit_places: Option<usize>,
    /// Print failed expectation messages
    pub show_expectation: Option<bool>,
    /// Print stack traces
    pub show_stack_trace: Option<bool>,
    /// Indent failure detail
    pub indent_expectation: Option<bool>,
    /// Line before each failed test
    pub failure_prefix_line: Option<Option<String>>,
    /// Line after each failed test
    pub failure_suffix_line: Option<Option<String>>,
    /// Line before each failed expectation
    pub failure_expectation_message_prefix_line: Option<Option<String>>,
    /// Line after each failed expectation
    pub failure_expectation_message_suffix_line: Option<Option<String>>,
    /// Hide disabled tests
    pub hide_disabled_specs: Option<bool>,
    /// Hide pending tests
    pub hide_pending_specs: Option<bool>,
    /// Colorize the status column
    pub color: Option<bool>,
    /// Stack trace filtering
    pub stack_trace: StackTraceOverrides,
}

impl ConfigOverrides {
    /// Read overrides from a TOML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Parse overrides from TOML text.
    ///
    /// Only malformed TOML is an error. Values of the wrong type are treated
    /// the way a missing value would be: literal lines become absent, a bad
    /// pattern disables filtering, a bad show-max means unlimited, anything
    /// else keeps its default.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: Table = content.parse().context("Failed to parse TOML")?;
        Ok(Self::from_table(&table))
    }

    fn from_table(table: &Table) -> Self {
        let status_display = match table.get("status_display") {
            Some(Value::Table(labels)) => labels
                .iter()
                .filter_map(|(key, label)| match label.as_str() {
                    Some(label) => Some((key.clone(), label.to_string())),
                    None => {
                        warn!(status = %key, "Ignoring non-string status label");
                        None
                    }
                })
                .collect(),
            Some(_) => {
                warn!("Ignoring status_display: expected a table");
                BTreeMap::new()
            }
            None => BTreeMap::new(),
        };

        Self {
            status_display,
            separator: string(table, "separator"),
            max_digit_places: table
                .get("max_digit_places")
                .and_then(Value::as_integer)
                .and_then(|n| usize::try_from(n).ok()),
            show_expectation: boolean(table, "show_expectation"),
            show_stack_trace: boolean(table, "show_stack_trace"),
            indent_expectation: boolean(table, "indent_expectation"),
            failure_prefix_line: literal_line(table, "failure_prefix_line"),
            failure_suffix_line: literal_line(table, "failure_suffix_line"),
            failure_expectation_message_prefix_line: literal_line(
                table,
                "failure_expectation_message_prefix_line",
            ),
            failure_expectation_message_suffix_line: literal_line(
                table,
                "failure_expectation_message_suffix_line",
            ),
            hide_disabled_specs: boolean(table, "hide_disabled_specs"),
            hide_pending_specs: boolean(table, "hide_pending_specs"),
            color: boolean(table, "color"),
            stack_trace: StackTraceOverrides {
                pattern: table
                    .get("show_stack_trace_regex_match")
                    .map(compile_pattern),
                replacement: literal_line(table, "show_stack_trace_regex_replace"),
                show_max: table
                    .get("show_stack_trace_regex_show_max")
                    .map(|v| {
                        v.as_integer()
                            .and_then(|n| usize::try_from(n).ok())
                            .unwrap_or(0)
                    }),
            },
        }
    }
}

fn string(table: &Table, key: &str) -> Option<String> {
    table.get(key).and_then(Value::as_str).map(str::to_string)
}

fn boolean(table: &Table, key: &str) -> Option<bool> {
    table.get(key).and_then(Value::as_bool)
}

/// A present key always overrides; anything but a string means "no line".
fn literal_line(table: &Table, key: &str) -> Option<Option<String>> {
    table
        .get(key)
        .map(|value| value.as_str().map(str::to_string))
}

fn compile_pattern(value: &Value) -> Option<Regex> {
    let pattern = value.as_str()?;
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(%pattern, error = %err, "Ignoring invalid stack trace pattern");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as IoWrite;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = FormatterConfig::default();

        assert_eq!(config.status_display.len(), 4);
        assert_eq!(config.status_display["failed"], "FAILED");
        assert_eq!(config.separator, " - ");
        assert_eq!(config.max_digit_places, 3);
        assert!(config.show_expectation);
        assert!(!config.show_stack_trace);
        assert!(config.indent_expectation);
        assert_eq!(config.failure_prefix_line, None);
        assert_eq!(config.failure_suffix_line, Some(String::new()));
        assert!(!config.hide_disabled_specs);
        assert!(!config.hide_pending_specs);
        assert!(!config.color);
        assert!(config.stack_trace.pattern.is_none());
        assert_eq!(config.stack_trace.show_max, 1);
    }

    #[test]
    fn test_status_display_merges_key_by_key() {
        let overrides = ConfigOverrides::from_toml_str(
            r#"
[status_display]
passed = "OK"
excluded = "Excluded"
"#,
        )
        .unwrap();
        let config = FormatterConfig::default().with_overrides(overrides);

        assert_eq!(config.status_display.len(), 5);
        assert_eq!(config.status_display["passed"], "OK");
        assert_eq!(config.status_display["failed"], "FAILED");
        assert_eq!(config.status_display["excluded"], "Excluded");
    }

    #[test]
    fn test_scalar_overrides() {
        let overrides = ConfigOverrides::from_toml_str(
            r#"
separator = " | "
max_digit_places = 5
show_expectation = false
show_stack_trace = true
indent_expectation = false
hide_disabled_specs = true
hide_pending_specs = true
color = true
failure_prefix_line = "----"
"#,
        )
        .unwrap();
        let config = FormatterConfig::default().with_overrides(overrides);

        assert_eq!(config.separator, " | ");
        assert_eq!(config.max_digit_places, 5);
        assert!(!config.show_expectation);
        assert!(config.show_stack_trace);
        assert!(!config.indent_expectation);
        assert!(config.hide_disabled_specs);
        assert!(config.hide_pending_specs);
        assert!(config.color);
        assert_eq!(config.failure_prefix_line.as_deref(), Some("----"));
        // untouched
        assert_eq!(config.failure_suffix_line, Some(String::new()));
    }

    #[test]
    fn test_non_string_literal_line_clears_default() {
        let overrides = ConfigOverrides::from_toml_str("failure_suffix_line = false").unwrap();
        assert_eq!(overrides.failure_suffix_line, Some(None));

        let config = FormatterConfig::default().with_overrides(overrides);
        assert_eq!(config.failure_suffix_line, None);
    }

    #[test]
    fn test_wrong_typed_values_keep_defaults() {
        let overrides = ConfigOverrides::from_toml_str(
            r#"
separator = 7
max_digit_places = "wide"
show_expectation = "yes"
status_display = "nope"
"#,
        )
        .unwrap();
        let config = FormatterConfig::default().with_overrides(overrides);

        assert_eq!(config.separator, " - ");
        assert_eq!(config.max_digit_places, 3);
        assert!(config.show_expectation);
        assert_eq!(config.status_display.len(), 4);
    }

    #[test]
    fn test_non_string_status_label_ignored() {
        let overrides = ConfigOverrides::from_toml_str(
            r#"
[status_display]
passed = 1
pending = "Later"
"#,
        )
        .unwrap();
        let config = FormatterConfig::default().with_overrides(overrides);

        assert_eq!(config.status_display["passed"], "Passed");
        assert_eq!(config.status_display["pending"], "Later");
    }

    #[test]
    fn test_stack_trace_settings() {
        let overrides = ConfigOverrides::from_toml_str(
            r#"
show_stack_trace_regex_match = 'at .*/(src/[^:]+):(\d+)'
show_stack_trace_regex_replace = "$1 line $2"
show_stack_trace_regex_show_max = 3
"#,
        )
        .unwrap();
        let config = FormatterConfig::default().with_overrides(overrides);

        let pattern = config.stack_trace.pattern.unwrap();
        assert!(pattern.is_match("at /home/me/project/src/app.js:12"));
        assert_eq!(config.stack_trace.replacement.as_deref(), Some("$1 line $2"));
        assert_eq!(config.stack_trace.show_max, 3);
    }

    #[test]
    fn test_invalid_pattern_disables_filter() {
        let overrides =
            ConfigOverrides::from_toml_str(r#"show_stack_trace_regex_match = "(unclosed""#)
                .unwrap();
        assert!(matches!(overrides.stack_trace.pattern, Some(None)));

        let config = FormatterConfig::default().with_overrides(overrides);
        assert!(config.stack_trace.pattern.is_none());
    }

    #[test]
    fn test_non_numeric_show_max_means_unlimited() {
        let overrides =
            ConfigOverrides::from_toml_str(r#"show_stack_trace_regex_show_max = "all""#).unwrap();
        let config = FormatterConfig::default().with_overrides(overrides);
        assert_eq!(config.stack_trace.show_max, 0);

        let overrides =
            ConfigOverrides::from_toml_str("show_stack_trace_regex_show_max = -2").unwrap();
        let config = FormatterConfig::default().with_overrides(overrides);
        assert_eq!(config.stack_trace.show_max, 0);
    }

    #[test]
    fn test_empty_overrides_are_identity() {
        let overrides = ConfigOverrides::from_toml_str("").unwrap();
        let config = FormatterConfig::default().with_overrides(overrides);
        let defaults = FormatterConfig::default();

        assert_eq!(config.status_display, defaults.status_display);
        assert_eq!(config.separator, defaults.separator);
        assert_eq!(config.failure_suffix_line, defaults.failure_suffix_line);
        assert_eq!(config.stack_trace.show_max, defaults.stack_trace.show_max);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let err = ConfigOverrides::from_toml_str("separator = ").unwrap_err();
        assert!(
            err.to_string().contains("Failed to parse TOML"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "separator = \" :: \"").unwrap();

        let overrides = ConfigOverrides::from_path(file.path()).unwrap();
        assert_eq!(overrides.separator.as_deref(), Some(" :: "));
    }

    #[test]
    fn test_from_missing_path() {
        let err = ConfigOverrides::from_path("/nonexistent/linereport.toml").unwrap_err();
        assert!(
            err.to_string().contains("Failed to read config file"),
            "unexpected error: {err}"
        );
    }
}
