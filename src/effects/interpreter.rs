//! Effect interpreter trait.
//!
//! The trait-based design enables:
//! - Mock interpreters for testing the gateway's retry and classification
//!   policy without a network
//! - Alternative forge backends behind the same gateway
//!
//! # Example (mock for testing)
//!
//! ```ignore
//! struct MockInterpreter {
//!     responses: Mutex<VecDeque<Result<PrResponse, GitHubApiError>>>,
//! }
//!
//! impl PrEffectInterpreter for MockInterpreter {
//!     type Error = GitHubApiError;
//!
//!     async fn interpret(&self, effect: PrEffect) -> Result<PrResponse, Self::Error> {
//!         self.responses.lock().unwrap().pop_front()
//!             .unwrap_or_else(|| panic!("unexpected effect: {:?}", effect))
//!     }
//! }
//! ```

use std::future::Future;

use super::{PrEffect, PrResponse};

/// Interprets pull request effects against a forge API.
///
/// Implementations are constructed with a `RepoId`, so all effects executed
/// through a single interpreter instance are scoped to that repository.
pub trait PrEffectInterpreter {
    /// The error type returned by this interpreter.
    type Error;

    /// Execute a pull request effect and return its response.
    fn interpret(
        &self,
        effect: PrEffect,
    ) -> impl Future<Output = Result<PrResponse, Self::Error>> + Send;
}
