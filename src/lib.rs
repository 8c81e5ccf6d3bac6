//! Pull request gateway for hosted-git forges.
//!
//! This library wraps a hosted-git REST API (currently GitHub via octocrab)
//! behind the [`service::HostedGitPrService`] trait: create a pull request
//! with a bounded retry policy, fetch its detailed state, and merge it.
//! Remote failures during creation are classified into user-facing toasts
//! where a known condition is recognized; everything else is retried a fixed
//! number of times and then surfaced both as a notification and as an error.

pub mod effects;
pub mod github;
pub mod notifications;
pub mod service;
pub mod telemetry;
pub mod types;
