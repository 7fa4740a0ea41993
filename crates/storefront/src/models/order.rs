//! Order model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ucdrop_core::{CurrencyCode, OrderId, OrderStatus, PlayerId, ProductId, TransactionId};

/// A top-up order.
///
/// Created in `Pending` status at checkout confirmation and mutated exactly
/// once by the payment callback (`pending -> success | failed`). Orders are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub product_id: ProductId,
    pub player_id: PlayerId,
    pub player_name: String,
    /// Amount charged, denominated in `currency`.
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub status: OrderStatus,
    /// Provider transaction id, set when a callback lands.
    pub transaction_id: Option<TransactionId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a fresh pending order.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        player_id: PlayerId,
        player_name: String,
        amount: Decimal,
        currency: CurrencyCode,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::generate(),
            product_id,
            player_id,
            player_name,
            amount,
            currency,
            status: OrderStatus::Pending,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
