//! HTTP resolver against a real identity provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use ucdrop_core::PlayerId;

use super::{PlayerProfile, PlayerResolver, ResolveError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderPlayer {
    player_name: String,
}

/// Resolver that queries `GET {provider}/players/{id}` over HTTP.
///
/// A 404 from the provider means the player does not exist; any other
/// failure is reported as an upstream error so callers can distinguish
/// "unknown player" from "provider down".
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpResolver {
    /// Create a resolver against the given provider base URL.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Upstream` if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResolveError::Upstream(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn player_url(&self, id: &PlayerId) -> Result<Url, ResolveError> {
        self.base_url
            .join(&format!("players/{}", id.as_str()))
            .map_err(|e| ResolveError::Upstream(format!("bad provider url: {e}")))
    }
}

#[async_trait]
impl PlayerResolver for HttpResolver {
    async fn resolve(&self, id: &PlayerId) -> Result<PlayerProfile, ResolveError> {
        let url = self.player_url(id)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::Upstream(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ResolveError::NotFound),
            status if status.is_success() => {
                let player: ProviderPlayer = response
                    .json()
                    .await
                    .map_err(|e| ResolveError::Upstream(e.to_string()))?;
                Ok(PlayerProfile {
                    player_name: player.player_name,
                })
            }
            status => Err(ResolveError::Upstream(format!(
                "provider answered {status}"
            ))),
        }
    }
}
