//! Order Service.
//!
//! Owns order creation and payment callback application. Creation validates
//! the product against the catalog and the player fields locally, persists a
//! pending order, and hands back the gateway redirect URL. Callback
//! application delegates the monotonic status write to the store and turns
//! its disposition into either an acknowledgement or a conflict.

use std::sync::Arc;

use thiserror::Error;
use url::Url;

use ucdrop_core::{OrderId, PaymentOutcome, PlayerId, PlayerIdError, TransactionId};

use crate::catalog::Catalog;
use crate::models::Order;
use crate::models::api::{CallbackAck, CreateOrderRequest};
use crate::store::{CallbackDisposition, OrderStore, StoreError};

/// Errors that can occur in the order service.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The requested product is not in the catalog.
    #[error("product not found")]
    ProductNotFound,

    /// The player id failed validation.
    #[error(transparent)]
    InvalidPlayerId(#[from] PlayerIdError),

    /// The order request carried no resolved player name.
    #[error("player name is required")]
    MissingPlayerName,

    /// A callback tried to move a terminal order to a different status.
    #[error("order is already finalized with a different outcome")]
    AlreadyFinal,

    /// The store refused the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The gateway redirect URL could not be built from the base URL.
    #[error("failed to build payment url: {0}")]
    PaymentUrl(#[from] url::ParseError),
}

/// Order creation and payment settlement.
#[derive(Debug, Clone)]
pub struct OrderService {
    catalog: Arc<Catalog>,
    orders: OrderStore,
    base_url: Url,
}

impl OrderService {
    /// Create a service over the given catalog and store.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, orders: OrderStore, base_url: Url) -> Self {
        Self {
            catalog,
            orders,
            base_url,
        }
    }

    /// Validate a request, persist a pending order, and build its payment URL.
    ///
    /// The charge amount is always taken from the catalog, never from the
    /// client.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` if the product is unknown, the player id is
    /// invalid, or the player name is missing.
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<(Order, Url), OrderError> {
        let product = self
            .catalog
            .get(&request.product_id)
            .ok_or(OrderError::ProductNotFound)?;
        let player_id = PlayerId::parse(&request.player_id)?;
        let player_name = request.player_name.trim();
        if player_name.is_empty() {
            return Err(OrderError::MissingPlayerName);
        }

        let order = Order::new(
            product.id.clone(),
            player_id,
            player_name.to_string(),
            product.discount_price,
            product.currency,
        );
        let payment_url = self.payment_url(&order)?;
        self.orders.insert(order.clone()).await?;

        Ok((order, payment_url))
    }

    /// Apply a gateway callback to an order.
    ///
    /// Redelivery of the outcome already on record is acknowledged again;
    /// a conflicting outcome is rejected and the record left untouched.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Store` for unknown orders and
    /// `OrderError::AlreadyFinal` for conflicting redelivery.
    pub async fn apply_payment_callback(
        &self,
        order_id: OrderId,
        outcome: PaymentOutcome,
        transaction_id: TransactionId,
    ) -> Result<CallbackAck, OrderError> {
        let disposition = self
            .orders
            .apply_outcome(order_id, outcome, transaction_id)
            .await?;

        let order = match disposition {
            CallbackDisposition::Applied(order) => {
                tracing::info!(order_id = %order.id, status = ?order.status, "order finalized");
                order
            }
            CallbackDisposition::AlreadyFinal { order, matches: true } => {
                tracing::debug!(order_id = %order.id, "duplicate callback acknowledged");
                order
            }
            CallbackDisposition::AlreadyFinal { order, matches: false } => {
                tracing::warn!(order_id = %order.id, "conflicting callback rejected");
                return Err(OrderError::AlreadyFinal);
            }
        };

        Ok(CallbackAck {
            order_id: order.id,
            status: order.status,
        })
    }

    /// Fetch an order by id.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Store` if the id is unknown.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        Ok(self.orders.get(id).await?)
    }

    fn payment_url(&self, order: &Order) -> Result<Url, OrderError> {
        let mut url = self.base_url.join("payment/gateway")?;
        url.query_pairs_mut()
            .append_pair("orderId", &order.id.to_string())
            .append_pair("amount", &order.amount.to_string());
        Ok(url)
    }
}
