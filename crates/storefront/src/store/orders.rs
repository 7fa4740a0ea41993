//! Order store.
//!
//! All status writes go through [`OrderStore::apply_outcome`], which holds
//! the write lock for the whole check-then-set, so concurrent callback
//! delivery for the same order resolves first-write-wins: the first terminal
//! write sticks and every later one observes a terminal order.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use ucdrop_core::{OrderId, PaymentOutcome, TransactionId};

use super::StoreError;
use crate::models::Order;

/// What happened when a payment outcome was applied.
#[derive(Debug, Clone)]
pub enum CallbackDisposition {
    /// The order was pending; the outcome was applied.
    Applied(Order),
    /// The order was already terminal; nothing changed.
    AlreadyFinal {
        order: Order,
        /// Whether the redelivered outcome matches the recorded status.
        matches: bool,
    },
}

/// In-memory order store.
///
/// Cheaply cloneable; clones share the same order book.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl OrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the id already exists (vanishingly
    /// unlikely with random ids; kept as a guard against misuse).
    pub async fn insert(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::Conflict(format!(
                "order {} already exists",
                order.id
            )));
        }
        orders.insert(order.id, order);
        Ok(())
    }

    /// Fetch an order by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown.
    pub async fn get(&self, id: OrderId) -> Result<Order, StoreError> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))
    }

    /// Apply a payment outcome to an order.
    ///
    /// The check-then-set runs under one write lock, so only the first
    /// terminal write for a given order ever mutates it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown.
    pub async fn apply_outcome(
        &self,
        id: OrderId,
        outcome: PaymentOutcome,
        transaction_id: TransactionId,
    ) -> Result<CallbackDisposition, StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))?;

        let next = outcome.terminal_status();
        if order.status.is_terminal() {
            return Ok(CallbackDisposition::AlreadyFinal {
                matches: order.status == next,
                order: order.clone(),
            });
        }

        debug_assert!(order.status.can_become(next));
        order.status = next;
        order.transaction_id = Some(transaction_id);
        order.updated_at = Utc::now();
        Ok(CallbackDisposition::Applied(order.clone()))
    }

    /// The most recently created orders, newest first.
    pub async fn list_recent(&self, limit: usize) -> Vec<Order> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        all
    }

    /// Count of orders per lifecycle status `(pending, success, failed)`.
    pub async fn status_counts(&self) -> (usize, usize, usize) {
        use ucdrop_core::OrderStatus;

        let orders = self.orders.read().await;
        let mut counts = (0, 0, 0);
        for order in orders.values() {
            match order.status {
                OrderStatus::Pending => counts.0 += 1,
                OrderStatus::Success => counts.1 += 1,
                OrderStatus::Failed => counts.2 += 1,
            }
        }
        counts
    }
}
