//! Pull request operations as data.
//!
//! This module describes the remote operations the gateway performs without
//! executing them. The interpreter (see `github::interpreter`) executes these
//! effects against the actual forge API. Keeping the operations as data
//! enables mock interpreters in tests: call counts, supplied parameters and
//! injected failures are all directly assertable.

use serde::{Deserialize, Serialize};

use crate::types::{DetailedPullRequest, MergeMethod, PrNumber, PullRequest};

pub mod interpreter;

pub use interpreter::PrEffectInterpreter;

/// A pull request API effect.
///
/// Effects are repo-scoped: the interpreter is constructed with a `RepoId`,
/// so effects don't include it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrEffect {
    /// Create a pull request merging `head` into `base`.
    CreatePr {
        /// The head (source) branch, i.e. the pushed upstream branch.
        head: String,
        /// The base (target) branch.
        base: String,
        /// The PR title.
        title: String,
        /// The PR description.
        body: String,
        /// Whether to open the PR as a draft.
        draft: bool,
    },

    /// Fetch the detailed state of a single PR.
    GetPr { pr: PrNumber },

    /// Merge a PR with the given strategy.
    MergePr { pr: PrNumber, method: MergeMethod },
}

/// The response to a successfully executed [`PrEffect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrResponse {
    /// A pull request was created.
    Created(PullRequest),

    /// Detailed PR state.
    Detailed(DetailedPullRequest),

    /// The PR was merged.
    Merged,
}
