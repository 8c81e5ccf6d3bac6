//! Polling status monitor for a single pull request.
//!
//! The gateway hands out [`PrMonitor`] handles bound to a PR number. Every
//! fetch goes through [`HostedGitPrService::get`]; the latest observed state
//! is published on a watch channel for subscribers. Poll failures are logged
//! and the next tick tries again.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::types::{DetailedPullRequest, PrNumber};

use super::HostedGitPrService;

/// Default interval between status polls (30 seconds).
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Configuration for the status monitor's polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Interval between polls.
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorConfig {
    /// Creates a `MonitorConfig` with default values.
    pub fn new() -> Self {
        MonitorConfig {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    /// Creates a `MonitorConfig` from environment variables.
    ///
    /// Reads `PR_GATEWAY_POLL_INTERVAL_SECS` for the poll interval; other
    /// values use defaults.
    pub fn from_env() -> Self {
        let poll_secs = std::env::var("PR_GATEWAY_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        MonitorConfig {
            poll_interval: Duration::from_secs(poll_secs),
        }
    }
}

/// A polling status monitor for one pull request.
///
/// Obtained from [`HostedGitPrService::pr_monitor`]. Call [`PrMonitor::run`]
/// to drive the polling loop, or [`PrMonitor::refresh`] for a one-off fetch.
#[derive(Debug)]
pub struct PrMonitor<S> {
    service: S,
    pr: PrNumber,
    config: MonitorConfig,
    status: watch::Sender<Option<DetailedPullRequest>>,
}

impl<S: HostedGitPrService> PrMonitor<S> {
    /// Creates a monitor bound to the given service and PR.
    pub fn new(service: S, pr: PrNumber, config: MonitorConfig) -> Self {
        let (status, _) = watch::channel(None);
        PrMonitor {
            service,
            pr,
            config,
            status,
        }
    }

    /// The PR this monitor is bound to.
    pub fn pr_number(&self) -> PrNumber {
        self.pr
    }

    /// Returns a receiver for the latest observed PR state.
    ///
    /// Holds `None` until the first successful fetch.
    pub fn status(&self) -> watch::Receiver<Option<DetailedPullRequest>> {
        self.status.subscribe()
    }

    /// Fetches the PR state once and publishes it to subscribers.
    pub async fn refresh(&self) -> Result<DetailedPullRequest, S::Error> {
        let detail = self.service.get(self.pr).await?;
        self.status.send_replace(Some(detail.clone()));
        Ok(detail)
    }

    /// Runs the polling loop until the token is cancelled.
    ///
    /// The first fetch happens immediately; failures are logged and polling
    /// continues on the next tick.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {
                    if let Err(err) = self.refresh().await {
                        tracing::warn!(pr = %self.pr, error = %err, "pull request status poll failed");
                    }
                }
            }
        }
    }
}
