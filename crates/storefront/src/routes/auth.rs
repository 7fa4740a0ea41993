//! Admin authentication and dashboard routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, extract::State, response::IntoResponse};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::middleware::auth::{clear_current_admin, set_current_admin};
use crate::models::{ApiEnvelope, CurrentAdmin};
use crate::models::api::{LoginData, LoginRequest};
use crate::services::auth;
use crate::state::AppState;

/// Admin login.
///
/// Verifies credentials, establishes the session, and returns an opaque
/// token for client display. The session cookie is what authorizes later
/// requests.
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let identifier = request
        .identifier()
        .ok_or_else(|| AppError::BadRequest("email or username is required".to_string()))?;
    let password = SecretString::from(request.password.clone());

    let outcome = auth::login(state.directory(), identifier, &password)?;

    set_current_admin(
        &session,
        &CurrentAdmin {
            email: outcome.email.clone(),
            role: outcome.role,
        },
    )
    .await
    .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(email = %outcome.email, "admin logged in");
    Ok(Json(ApiEnvelope::ok(LoginData {
        token: outcome.token.expose_secret().to_string(),
        user: outcome.user,
    })))
}

/// Admin logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    Ok(Json(ApiEnvelope::ok(serde_json::json!({"loggedOut": true}))))
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {}

/// Display the admin login page.
#[instrument]
pub async fn login_page() -> LoginTemplate {
    LoginTemplate {}
}

/// A row in the dashboard's order table.
pub struct OrderRow {
    pub id: String,
    pub product_id: String,
    pub player: String,
    pub amount: String,
    pub status: String,
    pub created_at: String,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/dashboard.html")]
pub struct DashboardTemplate {
    pub admin_email: String,
    pub pending: usize,
    pub success: usize,
    pub failed: usize,
    pub orders: Vec<OrderRow>,
}

/// Number of orders shown on the dashboard.
const DASHBOARD_ORDER_LIMIT: usize = 50;

/// The admin order dashboard.
#[instrument(skip(state, admin))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> DashboardTemplate {
    let (pending, success, failed) = state.orders().status_counts().await;
    let orders = state
        .orders()
        .list_recent(DASHBOARD_ORDER_LIMIT)
        .await
        .into_iter()
        .map(|order| OrderRow {
            id: order.id.to_string(),
            product_id: order.product_id.to_string(),
            player: format!("{} ({})", order.player_name, order.player_id),
            amount: format!("{} {}", order.amount.round_dp(2), order.currency.code()),
            status: order.status.to_string(),
            created_at: order.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })
        .collect();

    DashboardTemplate {
        admin_email: admin.email.as_str().to_string(),
        pending,
        success,
        failed,
        orders,
    }
}
