//! Wire-format DTOs for the JSON API.
//!
//! Every JSON endpoint speaks the `{success, data}` /
//! `{success: false, error, code}` envelope with camelCase field names.
//! The checkout orchestrator's HTTP backend parses these same types, so the
//! server and its client can never drift apart.

use serde::{Deserialize, Serialize};

use ucdrop_core::{AdminRole, OrderId, PaymentOutcome, ProductId, TransactionId};

/// Response envelope for all JSON endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope wrapping `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }
}

/// `GET /player/resolve` response data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveData {
    pub player_name: String,
}

/// `POST /orders` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: ProductId,
    pub player_id: String,
    pub player_name: String,
}

/// `POST /orders` response data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderData {
    pub order_id: OrderId,
    pub payment_url: String,
}

/// `POST /payment/callback` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    pub order_id: OrderId,
    pub status: PaymentOutcome,
    pub transaction_id: TransactionId,
}

/// `POST /payment/callback` response data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackAck {
    pub order_id: OrderId,
    pub status: ucdrop_core::OrderStatus,
}

/// `POST /auth/login` request body.
///
/// The original client sent `username`; email-based tooling sends `email`.
/// Either identifies the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
}

impl LoginRequest {
    /// The account identifier, whichever field carried it.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.email.as_deref().or(self.username.as_deref())
    }
}

/// `POST /auth/login` response data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: AdminUserView,
}

/// Public view of an admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserView {
    pub email: String,
    pub role: AdminRole,
}
