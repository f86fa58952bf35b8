//! Column layout helpers
//!
//! Padding and justification for the `<status> - <n>/<total> - <name>` line,
//! plus the indentation applied to continuation lines beneath it.

use std::collections::BTreeMap;

use unicode_width::UnicodeWidthStr;

/// Display width of a label in terminal columns
#[must_use]
pub fn label_width(label: &str) -> usize {
    UnicodeWidthStr::width(label)
}

/// Width of the widest label in the map, 0 when empty
#[must_use]
pub fn max_label_width(labels: &BTreeMap<String, String>) -> usize {
    labels.values().map(|l| label_width(l)).max().unwrap_or(0)
}

/// Pad `label` on the right with spaces up to `width` columns.
///
/// Labels already at or beyond `width` are returned unchanged.
#[must_use]
pub fn right_pad(label: &str, width: usize) -> String {
    let pad = width.saturating_sub(label_width(label));
    format!("{label}{}", " ".repeat(pad))
}

/// Pad every label to the width of the widest one
#[must_use]
pub fn pad_labels(labels: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let width = max_label_width(labels);
    labels
        .iter()
        .map(|(key, label)| (key.clone(), right_pad(label, width)))
        .collect()
}

/// Right-justify `num` in a field of `width` characters.
///
/// Numbers wider than the field keep their rightmost digits, e.g. `1234`
/// in a 3-wide field becomes `234`. A width of 0 prints the number in full.
#[must_use]
pub fn right_justify(num: usize, width: usize) -> String {
    let digits = num.to_string();
    if width == 0 {
        return digits;
    }
    if digits.len() >= width {
        return digits[digits.len() - width..].to_string();
    }
    format!("{digits:>width$}")
}

/// Indentation for lines printed beneath a summary line.
///
/// Covers the padded status, both separators, and `total/total` at the
/// digit count of `total`.
#[must_use]
pub fn message_indent(status_width: usize, separator: &str, total: usize) -> String {
    let counter_width = total.to_string().len() * 2 + 1;
    let separator_width = label_width(separator);
    " ".repeat(status_width + separator_width * 2 + counter_width)
}

/// Prepare a possibly multi-line message for output.
///
/// With `indent`, the message is prefixed with `indent_str` and every
/// embedded newline is followed by `indent_str` too. Without it the message
/// passes through untouched.
#[must_use]
pub fn indent_lines(message: &str, indent: bool, indent_str: &str) -> String {
    if !indent {
        return message.to_string();
    }
    let continued = message.replace('\n', &format!("\n{indent_str}"));
    format!("{indent_str}{continued}")
}
