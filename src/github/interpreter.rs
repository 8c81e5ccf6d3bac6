//! GitHub effect interpreter using octocrab.
//!
//! This module implements the `PrEffectInterpreter` trait, executing pull
//! request effects against the real GitHub API via octocrab.
//!
//! Key implementation details:
//! - `create` and `get` go through octocrab's pulls handler
//! - `merge` uses the REST endpoint directly so the merge method string is
//!   under our control
//! - Raw octocrab models are mapped into the crate's own types at this
//!   boundary

use serde::{Deserialize, Serialize};

use crate::effects::{PrEffect, PrEffectInterpreter, PrResponse};
use crate::types::{DetailedPullRequest, MergeMethod, MergeableState, PrNumber, PrState, PullRequest};

use super::client::OctocrabClient;
use super::error::GitHubApiError;

impl PrEffectInterpreter for OctocrabClient {
    type Error = GitHubApiError;

    async fn interpret(&self, effect: PrEffect) -> Result<PrResponse, Self::Error> {
        match effect {
            PrEffect::CreatePr {
                head,
                base,
                title,
                body,
                draft,
            } => create_pr(self, head, base, title, body, draft).await,
            PrEffect::GetPr { pr } => get_pr(self, pr).await,
            PrEffect::MergePr { pr, method } => merge_pr(self, pr, method).await,
        }
    }
}

// ─── PR Operations ────────────────────────────────────────────────────────────

async fn create_pr(
    client: &OctocrabClient,
    head: String,
    base: String,
    title: String,
    body: String,
    draft: bool,
) -> Result<PrResponse, GitHubApiError> {
    let result = client
        .inner()
        .pulls(client.owner(), client.repo_name())
        .create(title, head, base)
        .body(body)
        .draft(draft)
        .send()
        .await;

    match result {
        Ok(pull) => Ok(PrResponse::Created(summary_from_response(pull))),
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

async fn get_pr(client: &OctocrabClient, pr: PrNumber) -> Result<PrResponse, GitHubApiError> {
    let result = client
        .inner()
        .pulls(client.owner(), client.repo_name())
        .get(pr.0)
        .await;

    match result {
        Ok(pull) => Ok(PrResponse::Detailed(detailed_from_response(pull))),
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

// ─── Merge ────────────────────────────────────────────────────────────────────

async fn merge_pr(
    client: &OctocrabClient,
    pr: PrNumber,
    method: MergeMethod,
) -> Result<PrResponse, GitHubApiError> {
    // Use the REST API directly so the merge_method string is exactly what
    // the caller selected.
    let url = format!(
        "/repos/{}/{}/pulls/{}/merge",
        client.owner(),
        client.repo_name(),
        pr.0
    );

    #[derive(Serialize)]
    struct MergeRequest {
        merge_method: &'static str,
    }

    let request = MergeRequest {
        merge_method: method.as_api_str(),
    };

    let result: Result<MergeResponse, _> = client.inner().put(&url, Some(&request)).await;

    match result {
        Ok(response) => {
            if response.merged {
                tracing::debug!(pr = %pr, sha = %response.sha, "merged pull request");
                Ok(PrResponse::Merged)
            } else {
                Err(GitHubApiError::from_message(format!(
                    "Merge request returned merged=false: {}",
                    response.message.as_deref().unwrap_or("unknown reason")
                )))
            }
        }
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

#[derive(Debug, Deserialize)]
struct MergeResponse {
    sha: String,
    merged: bool,
    message: Option<String>,
}

// ─── Response Mapping ─────────────────────────────────────────────────────────

/// Maps a raw octocrab pull request into the creation summary shape.
fn summary_from_response(pull: octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: PrNumber(pull.number),
        title: pull.title.unwrap_or_default(),
        body: pull.body,
        html_url: pull.html_url.map(|u| u.to_string()),
        draft: pull.draft.unwrap_or(false),
        source_branch: pull.head.ref_field,
        target_branch: pull.base.ref_field,
        sha: pull.head.sha,
        author: pull.user.map(|u| u.login),
        created_at: pull.created_at,
    }
}

/// Maps a raw octocrab pull request into the detailed shape returned by `get`.
fn detailed_from_response(pull: octocrab::models::pulls::PullRequest) -> DetailedPullRequest {
    let state = match pull.merged_at {
        Some(_) => PrState::Merged,
        None => {
            if pull.state == Some(octocrab::models::IssueState::Closed) {
                PrState::Closed
            } else {
                PrState::Open
            }
        }
    };

    DetailedPullRequest {
        number: PrNumber(pull.number),
        title: pull.title.unwrap_or_default(),
        body: pull.body,
        html_url: pull.html_url.map(|u| u.to_string()),
        source_branch: pull.head.ref_field,
        target_branch: pull.base.ref_field,
        draft: pull.draft.unwrap_or(false),
        state,
        mergeable: pull.mergeable,
        mergeable_state: mergeable_state_from(pull.mergeable_state),
        rebaseable: pull.rebaseable,
        merge_commit_sha: pull.merge_commit_sha,
        requested_reviewers: pull
            .requested_reviewers
            .unwrap_or_default()
            .into_iter()
            .map(|u| u.login)
            .collect(),
        created_at: pull.created_at,
        updated_at: pull.updated_at,
        merged_at: pull.merged_at,
        closed_at: pull.closed_at,
    }
}

/// Maps octocrab's mergeable state into the crate's enum.
///
/// Absent or unrecognized states (the octocrab enum is non-exhaustive) map to
/// `Unknown`, which callers already treat as "not yet computed".
fn mergeable_state_from(
    state: Option<octocrab::models::pulls::MergeableState>,
) -> MergeableState {
    use octocrab::models::pulls::MergeableState as Raw;

    match state {
        Some(Raw::Clean) => MergeableState::Clean,
        Some(Raw::Unstable) => MergeableState::Unstable,
        Some(Raw::Blocked) => MergeableState::Blocked,
        Some(Raw::Behind) => MergeableState::Behind,
        Some(Raw::Dirty) => MergeableState::Dirty,
        Some(Raw::Draft) => MergeableState::Draft,
        Some(Raw::HasHooks) => MergeableState::HasHooks,
        _ => MergeableState::Unknown,
    }
}
