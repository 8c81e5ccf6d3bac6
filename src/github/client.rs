//! Octocrab client wrapper scoped to a specific repository.
//!
//! This module provides `OctocrabClient`, which wraps an `Octocrab` instance
//! and scopes all operations to a specific repository. This matches the design
//! where effects are repo-scoped (the `PrEffect` enum doesn't include repo
//! info).

use http::header::HeaderName;
use octocrab::Octocrab;

use crate::types::RepoId;

/// Header selecting the GitHub REST API version.
///
/// Pinning the version opts every request into the extended response fields
/// the gateway relies on (notably `mergeable_state` on the PR detail
/// endpoint). octocrab applies headers per client rather than per request,
/// so `from_token` installs this on the whole client.
pub const API_VERSION_HEADER: &str = "x-github-api-version";

/// The pinned GitHub REST API version.
pub const API_VERSION: &str = "2022-11-28";

/// A GitHub API client scoped to a specific repository.
#[derive(Clone)]
pub struct OctocrabClient {
    /// The underlying octocrab client.
    client: Octocrab,

    /// The repository this client is scoped to.
    repo: RepoId,
}

impl OctocrabClient {
    /// Creates a new client scoped to the given repository.
    pub fn new(client: Octocrab, repo: RepoId) -> Self {
        Self { client, repo }
    }

    /// Creates a client from a personal access token.
    ///
    /// The pinned API version header is installed on the client so every
    /// request receives the extended response fields.
    pub fn from_token(token: impl Into<String>, repo: RepoId) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder()
            .personal_token(token.into())
            .add_header(
                HeaderName::from_static(API_VERSION_HEADER),
                API_VERSION.to_string(),
            )
            .build()?;
        Ok(Self::new(client, repo))
    }

    /// Creates a client from a pre-configured Octocrab instance.
    ///
    /// Use this when you need custom authentication (e.g. GitHub App
    /// installation tokens). The caller is responsible for installing the
    /// API version header if extended fields are required.
    pub fn from_octocrab(client: Octocrab, repo: RepoId) -> Self {
        Self::new(client, repo)
    }

    /// Returns a reference to the underlying octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.client
    }

    /// Returns the repository this client is scoped to.
    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    /// Returns the repository owner.
    pub fn owner(&self) -> &str {
        &self.repo.owner
    }

    /// Returns the repository name.
    pub fn repo_name(&self) -> &str {
        &self.repo.repo
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient")
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}
