//! GitHub API client and effect interpreter.
//!
//! This module provides the implementation for executing pull request effects
//! via the octocrab library. It implements the `PrEffectInterpreter` trait
//! defined in the effects module.
//!
//! Key features:
//! - Repo-scoped octocrab client with the extended-field API headers installed
//! - Error type carrying the HTTP status extracted from octocrab's error text
//! - Classification of known failure conditions into user-facing toasts

mod client;
mod error;
mod error_map;
mod interpreter;

pub use client::{OctocrabClient, API_VERSION, API_VERSION_HEADER};
pub use error::GitHubApiError;
pub use error_map::error_to_toast;
