//! Hosted-git pull request service.
//!
//! This module defines the forge-agnostic [`HostedGitPrService`] trait and
//! its GitHub implementation, [`GitHubPrService`]. The trait is the seam for
//! alternative hosted-git backends: anything that can create, fetch and merge
//! pull requests can stand behind it, and the polling monitor works against
//! any implementation.

use std::future::Future;

use crate::types::{DetailedPullRequest, MergeMethod, PrNumber, PullRequest};

mod github;
mod monitor;
#[cfg(test)]
mod tests;

pub use github::{GitHubPrService, RetryConfig};
pub use monitor::{MonitorConfig, PrMonitor};

/// A hosted-git pull request service.
///
/// The three remote operations plus the monitor factory. `create_pr` is the
/// only operation with local recovery logic; `get` and `merge` leave every
/// failure to the caller.
pub trait HostedGitPrService: Clone + Send + Sync {
    /// The error type returned by the remote operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates a pull request for the configured branch pair.
    ///
    /// Returns `Ok(Some(pr))` on success, `Ok(None)` when the failure was
    /// classified and surfaced to the user as a toast, and `Err` when all
    /// attempts were exhausted.
    fn create_pr(
        &self,
        title: &str,
        body: &str,
        draft: bool,
    ) -> impl Future<Output = Result<Option<PullRequest>, Self::Error>> + Send;

    /// Fetches the detailed state of a pull request. No retry; failures
    /// propagate unmodified.
    fn get(
        &self,
        pr: PrNumber,
    ) -> impl Future<Output = Result<DetailedPullRequest, Self::Error>> + Send;

    /// Merges a pull request with the given strategy. No retry; failures
    /// propagate unmodified.
    fn merge(
        &self,
        method: MergeMethod,
        pr: PrNumber,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns a polling status monitor bound to this service and the given
    /// PR. The monitor routes its fetches through [`HostedGitPrService::get`].
    fn pr_monitor(&self, pr: PrNumber) -> PrMonitor<Self>
    where
        Self: Sized,
    {
        PrMonitor::new(self.clone(), pr, MonitorConfig::from_env())
    }
}
