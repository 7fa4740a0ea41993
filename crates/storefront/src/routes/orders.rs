//! Order API.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use ucdrop_core::OrderId;

use crate::error::{AppError, Result};
use crate::models::{ApiEnvelope, Order};
use crate::models::api::{CreateOrderData, CreateOrderRequest};
use crate::state::AppState;

/// Create a pending order and return the payment redirect.
#[instrument(skip(state, request), fields(product_id = %request.product_id))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse> {
    let (order, payment_url) = state.order_service().create_order(request).await?;

    tracing::info!(order_id = %order.id, "order created");
    Ok(Json(ApiEnvelope::ok(CreateOrderData {
        order_id: order.id,
        payment_url: payment_url.to_string(),
    })))
}

/// Fetch an order by id.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = OrderId::parse(&id).map_err(|_| AppError::NotFound(format!("order {id}")))?;
    let order: Order = state.order_service().get_order(id).await?;
    Ok(Json(ApiEnvelope::ok(order)))
}
