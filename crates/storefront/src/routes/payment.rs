//! Payment gateway routes.
//!
//! The gateway here is a stand-in for a real provider: orders redirect to a
//! local page where the outcome is chosen by hand, and the page then feeds
//! the same webhook a real gateway would call. The webhook is the only path
//! that finalizes an order, so swapping in a real provider touches nothing
//! else.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Form, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use ucdrop_core::{OrderId, PaymentOutcome, TransactionId};

use crate::error::{AppError, Result};
use crate::models::ApiEnvelope;
use crate::models::api::CallbackRequest;
use crate::state::AppState;

/// Header a gateway uses to authenticate its callbacks.
pub const CALLBACK_TOKEN_HEADER: &str = "x-callback-token";

/// Gateway webhook: apply a terminal payment outcome to an order.
///
/// Redelivery of the recorded outcome is acknowledged again; a conflicting
/// outcome gets a 409 and changes nothing.
#[instrument(skip(state, headers, request), fields(order_id = %request.order_id))]
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CallbackRequest>,
) -> Result<impl IntoResponse> {
    verify_callback_token(&state, &headers)?;

    let ack = state
        .order_service()
        .apply_payment_callback(request.order_id, request.status, request.transaction_id)
        .await?;

    Ok(Json(ApiEnvelope::ok(ack)))
}

/// Check the shared callback token, when one is configured.
fn verify_callback_token(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let Some(expected) = &state.config().payment.callback_token else {
        return Ok(());
    };
    let presented = headers
        .get(CALLBACK_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidCallbackToken)?;
    if presented != expected.expose_secret() {
        return Err(AppError::InvalidCallbackToken);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct GatewayQuery {
    #[serde(rename = "orderId")]
    order_id: String,
}

/// Mock gateway page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment/gateway.html")]
pub struct GatewayTemplate {
    pub order_id: String,
    pub amount: String,
    pub player_name: String,
}

/// The mock gateway's payment page.
#[instrument(skip(state))]
pub async fn gateway_page(
    State(state): State<AppState>,
    Query(query): Query<GatewayQuery>,
) -> Result<GatewayTemplate> {
    let id = OrderId::parse(&query.order_id)
        .map_err(|_| AppError::NotFound(format!("order {}", query.order_id)))?;
    let order = state.order_service().get_order(id).await?;

    Ok(GatewayTemplate {
        order_id: order.id.to_string(),
        amount: format!("{} {}", order.amount.round_dp(2), order.currency.code()),
        player_name: order.player_name,
    })
}

#[derive(Debug, Deserialize)]
pub struct GatewayPayForm {
    #[serde(rename = "orderId")]
    order_id: String,
    outcome: PaymentOutcome,
}

/// Simulate the gateway settling a payment.
///
/// Waits out the configured processing delay, mints a mock transaction id,
/// feeds the outcome through the same webhook path a real gateway would
/// use, then sends the buyer to the matching terminal page.
#[instrument(skip(state))]
pub async fn gateway_pay(
    State(state): State<AppState>,
    Form(form): Form<GatewayPayForm>,
) -> Result<Redirect> {
    let id = OrderId::parse(&form.order_id)
        .map_err(|_| AppError::NotFound(format!("order {}", form.order_id)))?;

    tokio::time::sleep(state.config().payment.mock_delay).await;

    let transaction_id = TransactionId::new(format!("MOCK_TXN_{}", Utc::now().timestamp_millis()));
    let ack = state
        .order_service()
        .apply_payment_callback(id, form.outcome, transaction_id)
        .await?;

    let target = match form.outcome {
        PaymentOutcome::Success => format!("/payment/success?orderId={}", ack.order_id),
        PaymentOutcome::Failed => format!("/payment/failed?orderId={}", ack.order_id),
    };
    Ok(Redirect::to(&target))
}
