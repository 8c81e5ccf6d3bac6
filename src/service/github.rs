//! GitHub-backed pull request service.
//!
//! [`GitHubPrService`] is the gateway: it issues the three remote operations
//! through a [`PrEffectInterpreter`], applies the bounded retry policy to
//! creation, classifies creation failures into toasts, and exposes the
//! in-flight `loading` flag as a watch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

use crate::effects::{PrEffect, PrEffectInterpreter, PrResponse};
use crate::github::{error_to_toast, GitHubApiError};
use crate::notifications::NotificationSink;
use crate::telemetry::{EventSink, EVENT_PR_CREATED};
use crate::types::{DetailedPullRequest, MergeMethod, PrNumber, PullRequest, RepoId};

use super::HostedGitPrService;

/// Retry policy for pull request creation.
///
/// Fixed delay, no backoff, no jitter. `max_attempts` counts total attempts,
/// not retries after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts.
    pub max_attempts: u32,

    /// Delay between consecutive attempts.
    pub delay: Duration,
}

impl RetryConfig {
    /// Default creation retry: 4 total attempts, 500 ms apart.
    pub const DEFAULT: Self = Self {
        max_attempts: 4,
        delay: Duration::from_millis(500),
    };
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Clears the loading flag when dropped.
///
/// One guard is scoped to each creation attempt so the flag is reset on every
/// exit path of the attempt (success, classified failure, retry), not only
/// once at the end of the whole sequence. Every reset bumps the watch
/// channel's version, so subscribers see a notification per attempt.
struct LoadingReset<'a>(&'a watch::Sender<bool>);

impl Drop for LoadingReset<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

/// Pull request gateway backed by the GitHub API.
///
/// The repository coordinates and the branch pair are fixed at construction.
/// Cloning the service is cheap; clones share the same `loading` channel.
///
/// Concurrent `create_pr` calls on the same service are not guarded against:
/// overlapping calls race on the `loading` flag (last writer wins).
#[derive(Clone)]
pub struct GitHubPrService<I> {
    interpreter: I,
    repo: RepoId,
    base_branch: String,
    upstream_name: String,
    notifications: Arc<dyn NotificationSink>,
    telemetry: Arc<dyn EventSink>,
    loading: watch::Sender<bool>,
    retry: RetryConfig,
}

impl<I> GitHubPrService<I>
where
    I: PrEffectInterpreter<Error = GitHubApiError> + Clone + Send + Sync,
{
    /// Creates a gateway for the given repository and branch pair.
    ///
    /// `upstream_name` is the pushed source branch used as the PR head;
    /// `base_branch` is the PR base.
    pub fn new(
        interpreter: I,
        repo: RepoId,
        base_branch: impl Into<String>,
        upstream_name: impl Into<String>,
        notifications: Arc<dyn NotificationSink>,
        telemetry: Arc<dyn EventSink>,
    ) -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            interpreter,
            repo,
            base_branch: base_branch.into(),
            upstream_name: upstream_name.into(),
            notifications,
            telemetry,
            loading,
            retry: RetryConfig::DEFAULT,
        }
    }

    /// Overrides the creation retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Returns a receiver for the `loading` flag.
    ///
    /// The flag is true exactly while a creation attempt sequence is in
    /// flight, and is reset after every individual attempt resolves.
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Creates a pull request merging the upstream branch into the base.
    ///
    /// Runs up to `RetryConfig::max_attempts` attempts with a fixed delay
    /// between them. A failure recognized by the toast classifier is surfaced
    /// to the user and swallowed (`Ok(None)`); when all attempts fail with
    /// unclassified errors, a generic failure notification is shown and the
    /// last error is returned.
    pub async fn create_pr(
        &self,
        title: &str,
        body: &str,
        draft: bool,
    ) -> Result<Option<PullRequest>, GitHubApiError> {
        self.loading.send_replace(true);

        let mut last_error: Option<GitHubApiError> = None;

        // Retried because creation can fail right after the source branch was
        // pushed (replication lag on the forge).
        for attempt in 1..=self.retry.max_attempts {
            // Dropped when the attempt resolves, clearing `loading` on every
            // exit path. Subscribers observe a reset per attempt, not one
            // reset at the end of the sequence.
            let _reset = LoadingReset(&self.loading);

            let effect = PrEffect::CreatePr {
                head: self.upstream_name.clone(),
                base: self.base_branch.clone(),
                title: title.to_string(),
                body: body.to_string(),
                draft,
            };

            match self.interpreter.interpret(effect).await {
                Ok(PrResponse::Created(pr)) => {
                    self.telemetry.capture(EVENT_PR_CREATED);
                    tracing::info!(repo = %self.repo, pr = %pr.number, "created pull request");
                    return Ok(Some(pr));
                }
                Ok(other) => {
                    return Err(GitHubApiError::from_message(format!(
                        "unexpected response to create effect: {other:?}"
                    )));
                }
                Err(err) => {
                    if let Some(toast) = error_to_toast(&err) {
                        tracing::info!(
                            repo = %self.repo,
                            error = %err,
                            "pull request creation failed with a known condition"
                        );
                        self.notifications.show_toast(toast);
                        return Ok(None);
                    }

                    tracing::warn!(
                        repo = %self.repo,
                        attempt,
                        error = %err,
                        "pull request creation attempt failed"
                    );
                    last_error = Some(err);
                    if attempt < self.retry.max_attempts {
                        sleep(self.retry.delay).await;
                    }
                }
            }
        }

        let err = match last_error {
            Some(err) => err,
            // Only reachable with a zero-attempt retry config.
            None => GitHubApiError::from_message("pull request creation was never attempted"),
        };
        tracing::error!(
            repo = %self.repo,
            attempts = self.retry.max_attempts,
            error = %err,
            "failed to create pull request"
        );
        self.notifications.show_error("Failed to create pull request", &err);
        Err(err)
    }

    /// Fetches the detailed state of a pull request.
    pub async fn get(&self, pr: PrNumber) -> Result<DetailedPullRequest, GitHubApiError> {
        match self.interpreter.interpret(PrEffect::GetPr { pr }).await? {
            PrResponse::Detailed(detail) => Ok(detail),
            other => Err(GitHubApiError::from_message(format!(
                "unexpected response to get effect: {other:?}"
            ))),
        }
    }

    /// Merges a pull request with the given strategy.
    pub async fn merge(&self, method: MergeMethod, pr: PrNumber) -> Result<(), GitHubApiError> {
        match self
            .interpreter
            .interpret(PrEffect::MergePr { pr, method })
            .await?
        {
            PrResponse::Merged => Ok(()),
            other => Err(GitHubApiError::from_message(format!(
                "unexpected response to merge effect: {other:?}"
            ))),
        }
    }
}

impl<I> HostedGitPrService for GitHubPrService<I>
where
    I: PrEffectInterpreter<Error = GitHubApiError> + Clone + Send + Sync,
{
    type Error = GitHubApiError;

    async fn create_pr(
        &self,
        title: &str,
        body: &str,
        draft: bool,
    ) -> Result<Option<PullRequest>, Self::Error> {
        GitHubPrService::create_pr(self, title, body, draft).await
    }

    async fn get(&self, pr: PrNumber) -> Result<DetailedPullRequest, Self::Error> {
        GitHubPrService::get(self, pr).await
    }

    async fn merge(&self, method: MergeMethod, pr: PrNumber) -> Result<(), Self::Error> {
        GitHubPrService::merge(self, method, pr).await
    }
}

impl<I> std::fmt::Debug for GitHubPrService<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubPrService")
            .field("repo", &self.repo)
            .field("base_branch", &self.base_branch)
            .field("upstream_name", &self.upstream_name)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
