//! Allow-list pattern matching
//!
//! Credentials and trusted images restrict their use with a single regular
//! expression. An absent or blank pattern allows everything; any other
//! pattern must match the whole subject. Patterns that fail to compile never
//! match.

use regex::Regex;

/// Returns true if `subject` is allowed by `pattern`
#[must_use]
pub fn is_allowed(pattern: Option<&str>, subject: &str) -> bool {
    let pattern = match pattern.map(str::trim) {
        None | Some("") => return true,
        Some(pattern) => pattern,
    };

    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => regex.is_match(subject),
        Err(e) => {
            tracing::warn!(pattern = %pattern, error = %e, "Invalid allow-list pattern, denying");
            false
        }
    }
}
