//! UC Drop Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused (the integration-tests crate spawns
//! the full router in-process).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::Router;

use crate::state::AppState;

/// Build the full application router with the standard middleware stack.
///
/// Used by `main` and by the integration tests, so both always exercise the
/// same stack (sessions, tracing, request ids).
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    routes::routes()
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(state)
}
