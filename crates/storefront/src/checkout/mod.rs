//! Checkout Flow Orchestrator.
//!
//! Drives a buyer through the purchase flow: pick a bundle, type a player
//! id, see the resolved account name, confirm, get redirected to payment.
//! Player-id input is debounced so only the value the buyer settles on hits
//! the resolution backend, and every keystroke invalidates any lookup still
//! in flight (last value wins). Confirmation is guarded so a double-click
//! cannot submit the same purchase twice.
//!
//! The orchestrator is a state machine behind an async handle; clones share
//! the same flow.

pub mod backend;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use ucdrop_core::{PlayerId, ProductId};

pub use backend::{BackendError, CheckoutBackend, CheckoutRedirect, HttpBackend};

use crate::models::api::CreateOrderRequest;

/// Debounce window applied to player-id input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// Where the flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Nothing selected yet.
    Idle,
    /// A bundle is selected; waiting for a player id.
    ProductSelected,
    /// A lookup for the current input is pending or in flight.
    ResolvingPlayer,
    /// The current input resolved to an account.
    PlayerValid,
    /// The current input is invalid or unknown.
    PlayerInvalid,
    /// The order is being submitted.
    OrderSubmitting,
    /// The order was accepted; the buyer is being sent to payment.
    Redirected,
}

/// Errors surfaced to the flow's driver.
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    /// Player input or confirmation arrived before a bundle was picked.
    #[error("no product selected")]
    NoProductSelected,

    /// Confirmation arrived without a verified player.
    #[error("player is not verified")]
    PlayerNotVerified,

    /// A submission is already in flight.
    #[error("submission already in flight")]
    SubmissionInFlight,

    /// The backend refused or could not be reached.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

struct FlowInner {
    state: CheckoutState,
    product: Option<ProductId>,
    player_input: String,
    player_name: Option<String>,
    last_error: Option<String>,
    redirect: Option<CheckoutRedirect>,
    /// Bumped on every input; stale lookups compare against it and drop out.
    generation: u64,
    resolve_task: Option<JoinHandle<()>>,
}

impl FlowInner {
    fn new() -> Self {
        Self {
            state: CheckoutState::Idle,
            product: None,
            player_input: String::new(),
            player_name: None,
            last_error: None,
            redirect: None,
            generation: 0,
            resolve_task: None,
        }
    }

    fn abort_pending_lookup(&mut self) {
        self.generation += 1;
        if let Some(task) = self.resolve_task.take() {
            task.abort();
        }
    }
}

/// Handle to a checkout flow.
pub struct Checkout<B> {
    inner: Arc<Mutex<FlowInner>>,
    backend: Arc<B>,
    debounce: Duration,
}

impl<B> Clone for Checkout<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            backend: Arc::clone(&self.backend),
            debounce: self.debounce,
        }
    }
}

impl<B: CheckoutBackend + 'static> Checkout<B> {
    /// Start a new flow with the default debounce window.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_debounce(backend, DEFAULT_DEBOUNCE)
    }

    /// Start a new flow with an explicit debounce window.
    #[must_use]
    pub fn with_debounce(backend: B, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FlowInner::new())),
            backend: Arc::new(backend),
            debounce,
        }
    }

    /// Select a bundle. Resets any player state from a previous selection.
    pub async fn select_product(&self, product: ProductId) {
        let mut flow = self.inner.lock().await;
        flow.abort_pending_lookup();
        flow.product = Some(product);
        flow.player_input.clear();
        flow.player_name = None;
        flow.last_error = None;
        flow.redirect = None;
        flow.state = CheckoutState::ProductSelected;
    }

    /// Feed the current player-id input.
    ///
    /// Each call supersedes the previous one: any pending lookup is
    /// cancelled and the debounce window restarts. Input shorter than the
    /// minimum id length is rejected locally without touching the backend;
    /// empty input returns the flow to the selection state.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NoProductSelected` if no bundle is selected.
    pub async fn input_player_id(&self, input: &str) -> Result<(), CheckoutError> {
        let mut flow = self.inner.lock().await;
        if flow.product.is_none() {
            return Err(CheckoutError::NoProductSelected);
        }

        flow.abort_pending_lookup();
        flow.player_name = None;
        flow.last_error = None;

        let trimmed = input.trim();
        flow.player_input = trimmed.to_string();

        if trimmed.is_empty() {
            flow.state = CheckoutState::ProductSelected;
            return Ok(());
        }
        if trimmed.len() < PlayerId::MIN_LENGTH {
            flow.state = CheckoutState::PlayerInvalid;
            flow.last_error = Some(format!(
                "player id must be at least {} characters",
                PlayerId::MIN_LENGTH
            ));
            return Ok(());
        }

        flow.state = CheckoutState::ResolvingPlayer;

        let inner = Arc::clone(&self.inner);
        let backend = Arc::clone(&self.backend);
        let debounce = self.debounce;
        let generation = flow.generation;
        let id = trimmed.to_string();
        flow.resolve_task = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let result = backend.resolve_player(&id).await;

            let mut flow = inner.lock().await;
            if flow.generation != generation {
                // A newer input took over while we were looking this one up
                return;
            }
            match result {
                Ok(profile) => {
                    flow.state = CheckoutState::PlayerValid;
                    flow.player_name = Some(profile.player_name);
                }
                Err(err) => {
                    flow.state = CheckoutState::PlayerInvalid;
                    flow.last_error = Some(err.to_string());
                }
            }
        }));

        Ok(())
    }

    /// Confirm the purchase and submit the order.
    ///
    /// Only valid once the player is verified. While a submission is in
    /// flight any further confirmation is refused, so retry-clicking cannot
    /// create duplicate orders. On backend failure the flow returns to the
    /// verified state and can be confirmed again.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the flow is not confirmable or the
    /// backend rejects the order.
    pub async fn confirm(&self) -> Result<CheckoutRedirect, CheckoutError> {
        let request = {
            let mut flow = self.inner.lock().await;
            match flow.state {
                CheckoutState::OrderSubmitting => return Err(CheckoutError::SubmissionInFlight),
                CheckoutState::PlayerValid => {}
                _ if flow.product.is_none() => return Err(CheckoutError::NoProductSelected),
                _ => return Err(CheckoutError::PlayerNotVerified),
            }

            let product_id = flow.product.clone().ok_or(CheckoutError::NoProductSelected)?;
            let player_name = flow
                .player_name
                .clone()
                .ok_or(CheckoutError::PlayerNotVerified)?;
            flow.state = CheckoutState::OrderSubmitting;
            CreateOrderRequest {
                product_id,
                player_id: flow.player_input.clone(),
                player_name,
            }
        };

        // Lock released while the backend call runs
        let result = self.backend.create_order(request).await;

        let mut flow = self.inner.lock().await;
        match result {
            Ok(redirect) => {
                flow.state = CheckoutState::Redirected;
                flow.redirect = Some(redirect.clone());
                Ok(redirect)
            }
            Err(err) => {
                flow.state = CheckoutState::PlayerValid;
                flow.last_error = Some(err.to_string());
                Err(CheckoutError::Backend(err))
            }
        }
    }

    /// Wait for any pending player lookup to finish.
    ///
    /// Drivers call this before reading the flow state when they need the
    /// settled answer rather than a snapshot mid-debounce.
    pub async fn settled(&self) {
        loop {
            let task = { self.inner.lock().await.resolve_task.take() };
            match task {
                // Aborted lookups surface as join errors; that is fine
                Some(task) => {
                    let _ = task.await;
                }
                None => break,
            }
        }
    }

    /// Current flow state.
    pub async fn state(&self) -> CheckoutState {
        self.inner.lock().await.state
    }

    /// Resolved account name, if the current input is verified.
    pub async fn player_name(&self) -> Option<String> {
        self.inner.lock().await.player_name.clone()
    }

    /// Last error shown to the buyer, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.last_error.clone()
    }

    /// The redirect produced by a confirmed order, if any.
    pub async fn redirect(&self) -> Option<CheckoutRedirect> {
        self.inner.lock().await.redirect.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use ucdrop_core::OrderId;

    use super::*;
    use crate::services::player::PlayerProfile;

    #[derive(Default)]
    struct FakeBackend {
        resolve_calls: AtomicUsize,
        order_calls: AtomicUsize,
        fail_orders: AtomicBool,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl CheckoutBackend for FakeBackend {
        async fn resolve_player(&self, id: &str) -> Result<PlayerProfile, BackendError> {
            self.resolve_calls.fetch_add(1, Ordering::SeqCst);
            if id.bytes().all(|b| b.is_ascii_digit()) {
                Ok(PlayerProfile {
                    player_name: format!("Player-{id}"),
                })
            } else {
                Err(BackendError::PlayerNotFound)
            }
        }

        async fn create_order(
            &self,
            _request: CreateOrderRequest,
        ) -> Result<CheckoutRedirect, BackendError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.order_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_orders.load(Ordering::SeqCst) {
                return Err(BackendError::Unavailable("gateway down".to_string()));
            }
            Ok(CheckoutRedirect {
                order_id: OrderId::generate(),
                payment_url: "http://localhost/payment/gateway".to_string(),
            })
        }
    }

    fn flow() -> Checkout<FakeBackend> {
        Checkout::with_debounce(FakeBackend::default(), Duration::from_millis(600))
    }

    async fn verified_flow() -> Checkout<FakeBackend> {
        let checkout = flow();
        checkout.select_product(ProductId::new("uc-660")).await;
        checkout.input_player_id("123456789").await.unwrap();
        tokio::time::advance(Duration::from_millis(600)).await;
        checkout.settled().await;
        checkout
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_input_resolves_after_debounce() {
        let checkout = flow();
        checkout.select_product(ProductId::new("uc-660")).await;
        checkout.input_player_id("123456789").await.unwrap();

        assert_eq!(checkout.state().await, CheckoutState::ResolvingPlayer);

        tokio::time::advance(Duration::from_millis(600)).await;
        checkout.settled().await;

        assert_eq!(checkout.state().await, CheckoutState::PlayerValid);
        assert_eq!(
            checkout.player_name().await.as_deref(),
            Some("Player-123456789")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_value_wins() {
        let checkout = flow();
        checkout.select_product(ProductId::new("uc-660")).await;

        checkout.input_player_id("111111111").await.unwrap();
        tokio::time::advance(Duration::from_millis(300)).await;
        checkout.input_player_id("123456789").await.unwrap();

        tokio::time::advance(Duration::from_millis(600)).await;
        checkout.settled().await;

        assert_eq!(
            checkout.player_name().await.as_deref(),
            Some("Player-123456789")
        );
        // The superseded input never reached the backend
        assert_eq!(
            checkout.backend.resolve_calls.load(Ordering::SeqCst),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_rejected_without_backend_call() {
        let checkout = flow();
        checkout.select_product(ProductId::new("uc-660")).await;
        checkout.input_player_id("123").await.unwrap();

        assert_eq!(checkout.state().await, CheckoutState::PlayerInvalid);
        assert!(checkout.last_error().await.is_some());

        tokio::time::advance(Duration::from_millis(600)).await;
        checkout.settled().await;
        assert_eq!(checkout.backend.resolve_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_returns_to_selection() {
        let checkout = flow();
        checkout.select_product(ProductId::new("uc-660")).await;
        checkout.input_player_id("123456789").await.unwrap();
        checkout.input_player_id("   ").await.unwrap();

        assert_eq!(checkout.state().await, CheckoutState::ProductSelected);

        tokio::time::advance(Duration::from_millis(600)).await;
        checkout.settled().await;
        assert_eq!(checkout.backend.resolve_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_player_marks_invalid() {
        let checkout = flow();
        checkout.select_product(ProductId::new("uc-660")).await;
        checkout.input_player_id("abc123xyz").await.unwrap();

        tokio::time::advance(Duration::from_millis(600)).await;
        checkout.settled().await;

        assert_eq!(checkout.state().await, CheckoutState::PlayerInvalid);
        assert!(checkout.player_name().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_without_product_is_refused() {
        let checkout = flow();
        assert!(matches!(
            checkout.input_player_id("123456789").await,
            Err(CheckoutError::NoProductSelected)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_requires_verified_player() {
        let checkout = flow();
        assert!(matches!(
            checkout.confirm().await,
            Err(CheckoutError::NoProductSelected)
        ));

        checkout.select_product(ProductId::new("uc-660")).await;
        assert!(matches!(
            checkout.confirm().await,
            Err(CheckoutError::PlayerNotVerified)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_redirects() {
        let checkout = verified_flow().await;
        let redirect = checkout.confirm().await.unwrap();

        assert_eq!(checkout.state().await, CheckoutState::Redirected);
        assert_eq!(checkout.redirect().await.unwrap().order_id, redirect.order_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_confirm_is_refused_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let backend = FakeBackend {
            gate: Some(Arc::clone(&gate)),
            ..FakeBackend::default()
        };
        let checkout = Checkout::with_debounce(backend, Duration::from_millis(600));
        checkout.select_product(ProductId::new("uc-660")).await;
        checkout.input_player_id("123456789").await.unwrap();
        tokio::time::advance(Duration::from_millis(600)).await;
        checkout.settled().await;

        let first = {
            let checkout = checkout.clone();
            tokio::spawn(async move { checkout.confirm().await })
        };
        tokio::task::yield_now().await;

        assert!(matches!(
            checkout.confirm().await,
            Err(CheckoutError::SubmissionInFlight)
        ));

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(checkout.backend.order_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_submission_recovers_to_verified() {
        let checkout = verified_flow().await;
        checkout.backend.fail_orders.store(true, Ordering::SeqCst);

        assert!(matches!(
            checkout.confirm().await,
            Err(CheckoutError::Backend(_))
        ));
        assert_eq!(checkout.state().await, CheckoutState::PlayerValid);
        assert!(checkout.last_error().await.is_some());

        // Retry succeeds once the backend is healthy again
        checkout.backend.fail_orders.store(false, Ordering::SeqCst);
        checkout.confirm().await.unwrap();
        assert_eq!(checkout.state().await, CheckoutState::Redirected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselecting_product_resets_player_state() {
        let checkout = verified_flow().await;
        checkout.select_product(ProductId::new("uc-60")).await;

        assert_eq!(checkout.state().await, CheckoutState::ProductSelected);
        assert!(checkout.player_name().await.is_none());
    }
}
