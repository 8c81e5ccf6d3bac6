//! Core domain types for the pull request gateway.

pub mod ids;
pub mod pr;

// Re-export commonly used types at the module level
pub use ids::{PrNumber, RepoId};
pub use pr::{DetailedPullRequest, MergeMethod, MergeableState, PrState, PullRequest};
