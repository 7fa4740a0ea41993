//! Backend seam for the checkout flow.
//!
//! The orchestrator never talks to services directly; it goes through
//! [`CheckoutBackend`], which the HTTP implementation satisfies by calling
//! the storefront's own JSON API. Tests substitute a fake.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use ucdrop_core::OrderId;

use crate::models::api::{ApiEnvelope, CreateOrderData, CreateOrderRequest, ResolveData};
use crate::services::player::PlayerProfile;

/// Errors a checkout backend can report.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The identity provider does not know this player.
    #[error("player not found")]
    PlayerNotFound,

    /// The player id was refused before any lookup.
    #[error("invalid player id")]
    InvalidPlayerId,

    /// The order was refused.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or answered incoherently.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Where the buyer goes after a confirmed order.
#[derive(Debug, Clone)]
pub struct CheckoutRedirect {
    pub order_id: OrderId,
    pub payment_url: String,
}

/// The operations the checkout flow needs from the storefront.
#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    /// Resolve a raw player-id input to an account profile.
    async fn resolve_player(&self, id: &str) -> Result<PlayerProfile, BackendError>;

    /// Submit an order and obtain the payment redirect.
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<CheckoutRedirect, BackendError>;
}

/// Checkout backend speaking the storefront's JSON API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a backend against the given storefront base URL.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::Unavailable(format!("bad endpoint url: {e}")))
    }
}

fn map_failure(code: Option<&str>, error: Option<String>) -> BackendError {
    match code {
        Some("player_not_found") => BackendError::PlayerNotFound,
        Some("invalid_player_id") => BackendError::InvalidPlayerId,
        Some("upstream_error" | "internal_error") => {
            BackendError::Unavailable(error.unwrap_or_else(|| "backend error".to_string()))
        }
        _ => BackendError::Rejected(error.unwrap_or_else(|| "request refused".to_string())),
    }
}

fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, BackendError> {
    if envelope.success {
        envelope
            .data
            .ok_or_else(|| BackendError::Unavailable("success envelope without data".to_string()))
    } else {
        Err(map_failure(envelope.code.as_deref(), envelope.error))
    }
}

#[async_trait]
impl CheckoutBackend for HttpBackend {
    async fn resolve_player(&self, id: &str) -> Result<PlayerProfile, BackendError> {
        let mut url = self.endpoint("player/resolve")?;
        url.query_pairs_mut().append_pair("id", id);

        let envelope: ApiEnvelope<ResolveData> = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        let data = unwrap_envelope(envelope)?;
        Ok(PlayerProfile {
            player_name: data.player_name,
        })
    }

    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<CheckoutRedirect, BackendError> {
        let url = self.endpoint("orders")?;

        let envelope: ApiEnvelope<CreateOrderData> = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        let data = unwrap_envelope(envelope)?;
        Ok(CheckoutRedirect {
            order_id: data.order_id,
            payment_url: data.payment_url,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_map_failure_distinguishes_codes() {
        assert!(matches!(
            map_failure(Some("player_not_found"), None),
            BackendError::PlayerNotFound
        ));
        assert!(matches!(
            map_failure(Some("invalid_player_id"), None),
            BackendError::InvalidPlayerId
        ));
        assert!(matches!(
            map_failure(Some("upstream_error"), Some("down".to_string())),
            BackendError::Unavailable(_)
        ));
        assert!(matches!(
            map_failure(Some("product_not_found"), None),
            BackendError::Rejected(_)
        ));
    }

    #[test]
    fn test_unwrap_envelope_requires_data_on_success() {
        let envelope: ApiEnvelope<ResolveData> = ApiEnvelope {
            success: true,
            data: None,
            error: None,
            code: None,
        };
        assert!(matches!(
            unwrap_envelope(envelope),
            Err(BackendError::Unavailable(_))
        ));
    }
}
