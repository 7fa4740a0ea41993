//! Product listing API.

use axum::{Json, extract::State, response::IntoResponse};
use tracing::instrument;

use crate::models::{ApiEnvelope, Product};
use crate::state::AppState;

/// List the purchasable bundles.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let products: Vec<Product> = state.catalog().list().to_vec();
    Json(ApiEnvelope::ok(products))
}
