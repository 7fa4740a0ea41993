//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Store page (bundle grid + checkout form)
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (catalog loaded)
//!
//! # JSON API
//! GET  /products                - Bundle listing
//! GET  /player/resolve?id=...   - Resolve a player id to an account name
//! POST /orders                  - Create a pending order
//! GET  /orders/{id}             - Fetch an order
//!
//! # Payment
//! POST /payment/callback        - Gateway webhook (terminal outcome)
//! GET  /payment/gateway         - Mock gateway page
//! POST /payment/gateway/pay     - Mock gateway: simulate an outcome
//! GET  /payment/success         - Terminal page after a successful payment
//! GET  /payment/failed          - Terminal page after a failed payment
//! GET  /order/fail              - Terminal page when order creation failed
//!
//! # Admin
//! POST /auth/login              - Admin login (JSON)
//! POST /auth/logout             - Admin logout
//! GET  /admin/login             - Login page
//! GET  /admin/dashboard         - Order dashboard (requires session)
//! ```

pub mod auth;
pub mod orders;
pub mod pages;
pub mod payment;
pub mod player;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/callback", post(payment::callback))
        .route("/gateway", get(payment::gateway_page))
        .route("/gateway/pay", post(payment::gateway_pay))
        .route("/success", get(pages::payment_success))
        .route("/failed", get(pages::payment_failed))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page))
        .route("/dashboard", get(auth::dashboard))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Store page
        .route("/", get(pages::home))
        // Health
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        // JSON API
        .route("/products", get(products::index))
        .route("/player/resolve", get(player::resolve))
        .route("/orders", post(orders::create))
        .route("/orders/{id}", get(orders::show))
        // Payment
        .nest("/payment", payment_routes())
        .route("/order/fail", get(pages::order_fail))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .nest("/admin", admin_routes())
}

/// Liveness check.
async fn health() -> &'static str {
    "ok"
}

/// Readiness check: the catalog must be loaded.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if state.catalog().is_empty() {
        (StatusCode::SERVICE_UNAVAILABLE, "catalog not loaded")
    } else {
        (StatusCode::OK, "ready")
    }
}
