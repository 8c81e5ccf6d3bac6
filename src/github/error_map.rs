//! Classification of GitHub API errors into user-facing toasts.
//!
//! During PR creation the gateway asks this classifier about every failure.
//! A recognized condition maps to a toast: the user is informed, the error is
//! swallowed, and no retry happens. Anything unrecognized returns `None` and
//! falls through to the retry/propagate policy.
//!
//! The matched conditions are the ones GitHub reports for user-resolvable
//! situations; retrying them would never succeed.

use crate::notifications::Toast;

use super::error::GitHubApiError;

/// Maps a GitHub API error to a toast if it is a known suppressible
/// condition.
pub fn error_to_toast(err: &GitHubApiError) -> Option<Toast> {
    let message = err.message.to_lowercase();

    // HTTP 422: a PR for this head/base pair is already open.
    if message.contains("a pull request already exists") {
        return Some(Toast::warning(
            "Pull request already exists",
            "A pull request for this branch is already open on GitHub.",
        ));
    }

    // HTTP 422 on private repos of plans without draft PR support.
    if message.contains("draft pull requests are not supported") {
        return Some(Toast::warning(
            "Draft pull requests not supported",
            "This repository's plan does not support draft pull requests. \
             Try creating the pull request as non-draft.",
        ));
    }

    // HTTP 422: nothing to propose between base and head.
    if message.contains("no commits between") {
        return Some(Toast::warning(
            "No commits to merge",
            "There are no commits between the base branch and the pushed branch.",
        ));
    }

    if is_rate_limit_error(&message) {
        return Some(Toast::warning(
            "Rate limited",
            "GitHub is rate limiting this token. Wait a moment and try again.",
        ));
    }

    // GitHub answers 404 (not 403) when the token lacks write access.
    if err.status_code == Some(404) || message.contains("resource not accessible") {
        return Some(Toast::error(
            "Insufficient permission",
            "The configured token does not have permission to open pull requests \
             on this repository.",
        ));
    }

    None
}

/// Checks if an error message indicates a rate limit.
fn is_rate_limit_error(message: &str) -> bool {
    message.contains("rate limit")
        || message.contains("api rate")
        || message.contains("secondary rate")
        || message.contains("abuse detection")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::ToastStyle;

    fn err(status_code: Option<u16>, message: &str) -> GitHubApiError {
        GitHubApiError {
            status_code,
            message: message.to_string(),
            source: None,
        }
    }

    #[test]
    fn existing_pr_maps_to_warning_toast() {
        let toast = error_to_toast(&err(
            Some(422),
            "Validation Failed: A pull request already exists for octocat:feature.",
        ))
        .unwrap();
        assert_eq!(toast.style, ToastStyle::Warning);
        assert_eq!(toast.title.as_deref(), Some("Pull request already exists"));
    }

    #[test]
    fn unsupported_drafts_map_to_warning_toast() {
        let toast = error_to_toast(&err(
            Some(422),
            "Draft pull requests are not supported in this repository.",
        ))
        .unwrap();
        assert_eq!(toast.style, ToastStyle::Warning);
    }

    #[test]
    fn no_commits_maps_to_warning_toast() {
        let toast =
            error_to_toast(&err(Some(422), "No commits between main and feature")).unwrap();
        assert_eq!(toast.title.as_deref(), Some("No commits to merge"));
    }

    #[test]
    fn rate_limit_detection() {
        assert!(error_to_toast(&err(Some(403), "API rate limit exceeded")).is_some());
        assert!(error_to_toast(&err(Some(403), "secondary rate limit hit")).is_some());
        assert!(error_to_toast(&err(None, "abuse detection mechanism triggered")).is_some());
    }

    #[test]
    fn missing_write_access_maps_to_error_toast() {
        let toast = error_to_toast(&err(Some(404), "Not Found")).unwrap();
        assert_eq!(toast.style, ToastStyle::Error);

        let toast = error_to_toast(&err(
            Some(403),
            "Resource not accessible by integration",
        ))
        .unwrap();
        assert_eq!(toast.style, ToastStyle::Error);
    }

    #[test]
    fn unrecognized_errors_are_not_classified() {
        assert!(error_to_toast(&err(Some(500), "Internal Server Error")).is_none());
        assert!(error_to_toast(&err(None, "connection timed out")).is_none());
        assert!(error_to_toast(&err(Some(502), "Bad Gateway")).is_none());
    }
}
