//! Pull request representations as surfaced by the gateway.
//!
//! These are the gateway's own projections of the forge's pull request
//! resources. The raw octocrab models are mapped into these shapes at the
//! interpreter boundary so the rest of the crate (and its consumers) never
//! touch forge-specific types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::PrNumber;

/// Strategy used to integrate a pull request's commits into its base branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMethod {
    /// A two-parent merge commit.
    MergeCommit,
    /// Squash all commits into a single commit on the base branch.
    Squash,
    /// Rebase the commits onto the base branch.
    Rebase,
}

impl MergeMethod {
    /// Returns the GitHub API `merge_method` string for this strategy.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            MergeMethod::MergeCommit => "merge",
            MergeMethod::Squash => "squash",
            MergeMethod::Rebase => "rebase",
        }
    }
}

/// The lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrState {
    /// The PR is open.
    Open,
    /// The PR was merged.
    Merged,
    /// The PR was closed without merging.
    Closed,
}

impl PrState {
    pub fn is_open(&self) -> bool {
        matches!(self, PrState::Open)
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, PrState::Merged)
    }
}

/// GitHub's computed mergeable state for a pull request.
///
/// Mirrors the REST API's `mergeable_state` field (only available with the
/// extended-field request headers, see `github::client`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeableState {
    /// All requirements satisfied.
    Clean,
    /// Non-required checks failing; merge is still possible.
    Unstable,
    /// Required checks not passing or approvals missing.
    Blocked,
    /// Head branch is behind the base branch.
    Behind,
    /// Merge conflicts exist.
    Dirty,
    /// State not yet computed by the forge.
    Unknown,
    /// PR is a draft.
    Draft,
    /// Repository has merge hooks enabled.
    HasHooks,
}

impl MergeableState {
    /// Returns true if the PR can be merged in this state (Clean or Unstable).
    pub fn is_mergeable(&self) -> bool {
        matches!(self, MergeableState::Clean | MergeableState::Unstable)
    }
}

/// Summary of a created pull request.
///
/// This is the shape returned by `create_pr`; it carries what the creation
/// response includes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// The PR number.
    pub number: PrNumber,

    /// The PR title.
    pub title: String,

    /// The PR description, if any.
    pub body: Option<String>,

    /// The web URL of the PR.
    pub html_url: Option<String>,

    /// Whether the PR was created as a draft.
    pub draft: bool,

    /// The head branch the PR proposes to merge (the upstream branch).
    pub source_branch: String,

    /// The base branch the PR targets.
    pub target_branch: String,

    /// The current head commit SHA.
    pub sha: String,

    /// Login of the PR author, if reported.
    pub author: Option<String>,

    /// When the PR was created.
    pub created_at: Option<DateTime<Utc>>,
}

/// Detailed pull request state, as returned by `get`.
///
/// Richer than [`PullRequest`]: includes mergeability, requested reviewers
/// and lifecycle timestamps. Fields GitHub computes lazily (`mergeable`,
/// `merge_commit_sha`) may be absent immediately after a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedPullRequest {
    /// The PR number.
    pub number: PrNumber,

    /// The PR title.
    pub title: String,

    /// The PR description, if any.
    pub body: Option<String>,

    /// The web URL of the PR.
    pub html_url: Option<String>,

    /// The head branch.
    pub source_branch: String,

    /// The base branch.
    pub target_branch: String,

    /// Whether the PR is a draft.
    pub draft: bool,

    /// The lifecycle state of the PR.
    pub state: PrState,

    /// Whether GitHub considers the PR mergeable (absent while computing).
    pub mergeable: Option<bool>,

    /// GitHub's computed mergeable state.
    pub mergeable_state: MergeableState,

    /// Whether the PR can be rebased onto its base.
    pub rebaseable: Option<bool>,

    /// SHA of the merge commit, once the PR is merged and the forge has
    /// propagated it.
    pub merge_commit_sha: Option<String>,

    /// Logins of users whose review has been requested.
    pub requested_reviewers: Vec<String>,

    /// When the PR was created.
    pub created_at: Option<DateTime<Utc>>,

    /// When the PR was last updated.
    pub updated_at: Option<DateTime<Utc>>,

    /// When the PR was merged, if it was.
    pub merged_at: Option<DateTime<Utc>>,

    /// When the PR was closed, if it was.
    pub closed_at: Option<DateTime<Utc>>,
}
