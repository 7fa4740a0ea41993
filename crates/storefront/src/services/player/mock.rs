//! Deterministic resolver used when no provider URL is configured.

use std::collections::HashMap;

use async_trait::async_trait;

use ucdrop_core::PlayerId;

use super::{PlayerProfile, PlayerResolver, ResolveError};

/// Resolver backed by a fixed roster plus a deterministic fallback.
///
/// Ids in the roster resolve to their configured names. Outside the roster,
/// all-digit ids resolve to a synthetic callsign derived from the id, so the
/// storefront is fully exercisable without a live provider. Anything else is
/// unknown.
#[derive(Debug, Clone, Default)]
pub struct MockResolver {
    roster: HashMap<String, String>,
}

impl MockResolver {
    /// Create a resolver with an empty roster (fallback only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver from explicit `(id, name)` pairs.
    pub fn with_roster<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            roster: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn callsign(id: &PlayerId) -> String {
        let digits = id.as_str();
        let tail = &digits[digits.len().saturating_sub(4)..];
        format!("Survivor-{tail}")
    }
}

#[async_trait]
impl PlayerResolver for MockResolver {
    async fn resolve(&self, id: &PlayerId) -> Result<PlayerProfile, ResolveError> {
        if let Some(name) = self.roster.get(id.as_str()) {
            return Ok(PlayerProfile {
                player_name: name.clone(),
            });
        }

        if id.as_str().bytes().all(|b| b.is_ascii_digit()) {
            return Ok(PlayerProfile {
                player_name: Self::callsign(id),
            });
        }

        Err(ResolveError::NotFound)
    }
}
