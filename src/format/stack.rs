//! Stack trace selection

use super::config::StackTraceFilter;

const HEADER_FULL: &str = "Stack trace:";
const HEADER_MATCHED: &str = "Stack trace (matched lines):";
const HEADER_REPLACED: &str = "Stack trace (replaced lines):";

/// Lines to print for one stack trace, header included.
///
/// Without a pattern the whole trace follows a plain header as a single
/// entry. With a pattern only matching lines are kept, capped at
/// `show_max` (0 for no cap), and rewritten by the replacement when one is
/// set. A replaced line that ends up empty is dropped. No header is produced
/// when nothing matches. An absent trace prints only the plain header, or
/// nothing at all when filtering.
#[must_use]
pub fn stack_trace_lines(stack: Option<&str>, filter: &StackTraceFilter) -> Vec<String> {
    let Some(pattern) = &filter.pattern else {
        let mut out = vec![HEADER_FULL.to_string()];
        out.extend(stack.map(str::to_string));
        return out;
    };
    let Some(stack) = stack else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let matching = stack.split('\n').filter(|line| pattern.is_match(line));
    for (index, line) in matching.enumerate() {
        if filter.show_max != 0 && index >= filter.show_max {
            break;
        }
        if index == 0 {
            let header = if filter.replacement.is_some() {
                HEADER_REPLACED
            } else {
                HEADER_MATCHED
            };
            out.push(header.to_string());
        }
        match &filter.replacement {
            Some(replacement) => {
                let replaced = pattern.replace(line, replacement.as_str());
                if !replaced.is_empty() {
                    out.push(replaced.into_owned());
                }
            }
            None => out.push(line.to_string()),
        }
    }
    out
}
