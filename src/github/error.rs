//! GitHub API error type.
//!
//! The gateway does not distinguish transient from permanent failures at the
//! error level: during creation, any failure not recognized by the toast
//! classifier (see `error_map`) is retried up to the attempt ceiling, and
//! `get`/`merge` propagate every failure unmodified. What the classifier and
//! the caller do need is the HTTP status and the message text, so this type
//! carries both along with the underlying octocrab error.

use std::fmt;
use thiserror::Error;

/// A GitHub API error.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    /// The HTTP status code, if available.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl GitHubApiError {
    /// Wraps an octocrab error, extracting the HTTP status where possible.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let message = err.to_string();
        Self {
            status_code: extract_status_code(&message),
            message,
            source: Some(err),
        }
    }

    /// Creates an error without an underlying octocrab source.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
            source: None,
        }
    }
}

/// Extracts an HTTP status code from an octocrab error message, if present.
///
/// octocrab's `Error` type doesn't expose a stable API for extracting HTTP
/// status codes across all error variants, so this parses the error text.
/// The fallback behavior (returning `None`) is safe: the toast classifier
/// then matches on the message text alone.
///
/// This is a pure function extracted for testability.
fn extract_status_code(err_str: &str) -> Option<u16> {
    // octocrab formats errors like "GitHub API error: ... status: 404"
    if let Some(idx) = err_str.find("status: ") {
        let rest = &err_str[idx + 8..];
        if let Some(end) = rest.find(|c: char| !c.is_ascii_digit()) {
            if let Ok(code) = rest[..end].parse() {
                return Some(code);
            }
        } else if let Ok(code) = rest.trim().parse() {
            return Some(code);
        }
    }

    // Common patterns where the status appears inline in the message
    let lower = err_str.to_lowercase();
    if err_str.contains("404") && lower.contains("not found") {
        return Some(404);
    }
    for code in [401u16, 403, 409, 422, 429, 500, 502, 503] {
        if err_str.contains(&code.to_string()) {
            return Some(code);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_includes_status_when_present() {
        let err = GitHubApiError {
            status_code: Some(422),
            message: "Validation Failed".to_string(),
            source: None,
        };
        assert_eq!(
            err.to_string(),
            "GitHub API error (HTTP 422): Validation Failed"
        );
    }

    #[test]
    fn display_without_status() {
        let err = GitHubApiError::from_message("connection reset");
        assert_eq!(err.to_string(), "GitHub API error: connection reset");
    }

    #[test]
    fn extracts_status_from_known_patterns() {
        assert_eq!(extract_status_code("thing Not Found: 404"), Some(404));
        assert_eq!(extract_status_code("got 422 Unprocessable Entity"), Some(422));
        assert_eq!(extract_status_code("plain failure text"), None);
    }

    proptest! {
        #[test]
        fn status_field_round_trips(code in 100u16..600) {
            let msg = format!("GitHub API error, status: {code}, backtrace elided");
            prop_assert_eq!(extract_status_code(&msg), Some(code));
        }

        #[test]
        fn status_at_end_of_message(code in 100u16..600) {
            let msg = format!("request failed with status: {code}");
            prop_assert_eq!(extract_status_code(&msg), Some(code));
        }
    }
}
