//! Player Resolution Service.
//!
//! Resolution is a pure lookup against an external player-identity provider:
//! given an external player id, return the account's display name. Nothing
//! is persisted. Keeping this decoupled from the Order Service means invalid
//! ids are rejected before an order is ever created, so no order can be tied
//! to an unresolvable account.
//!
//! Three implementations of [`PlayerResolver`]:
//! - [`HttpResolver`] - the real provider, over HTTP
//! - [`MockResolver`] - deterministic stand-in used when no provider URL is
//!   configured (and in tests)
//! - [`CachedResolver`] - moka TTL cache over any inner resolver

mod cache;
mod http;
mod mock;

pub use cache::CachedResolver;
pub use http::HttpResolver;
pub use mock::MockResolver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ucdrop_core::{PlayerId, PlayerIdError};

/// Errors that can occur during player resolution.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The identifier failed local validation.
    #[error("invalid player id: {0}")]
    InvalidId(#[from] PlayerIdError),

    /// The provider does not know this player.
    #[error("player not found")]
    NotFound,

    /// The provider could not be reached or answered with a server error.
    #[error("identity provider error: {0}")]
    Upstream(String),
}

/// A resolved player profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    /// The account's display name.
    pub player_name: String,
}

/// Lookup seam to the external player-identity provider.
#[async_trait]
pub trait PlayerResolver: Send + Sync {
    /// Resolve an external player id to its display name.
    async fn resolve(&self, id: &PlayerId) -> Result<PlayerProfile, ResolveError>;
}
