//! Free-text field checks.
//!
//! Names and review text end up in pipe-delimited, line-oriented logs with no
//! escaping, so the delimiter and line breaks are refused up front.

use crate::error::{DomainError, DomainResult};

const FORBIDDEN_TEXT_CHARS: &[char] = &['|', '\n', '\r'];

/// Reject values that would corrupt a log line.
pub fn ensure_log_safe(field: &str, value: &str) -> DomainResult<()> {
    match value.chars().find(|c| FORBIDDEN_TEXT_CHARS.contains(c)) {
        Some(c) => Err(DomainError::validation(format!(
            "{field} contains forbidden character {c:?}"
        ))),
        None => Ok(()),
    }
}

/// Reject blank values, then apply [`ensure_log_safe`].
pub fn ensure_present(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    ensure_log_safe(field, value)
}
