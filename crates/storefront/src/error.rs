//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error response is the storefront's JSON envelope with `success:
//! false`, a human-readable `error`, and a stable machine `code`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::orders::OrderError;
use crate::services::player::ResolveError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Player resolution failed.
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Callback carried a wrong shared token.
    #[error("Invalid callback token")]
    InvalidCallbackToken,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Order(err) => match err {
                OrderError::ProductNotFound => StatusCode::NOT_FOUND,
                OrderError::InvalidPlayerId(_) | OrderError::MissingPlayerName => {
                    StatusCode::BAD_REQUEST
                }
                OrderError::AlreadyFinal => StatusCode::CONFLICT,
                OrderError::Store(store) => store_status(store),
                OrderError::PaymentUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Resolve(err) => match err {
                ResolveError::InvalidId(_) => StatusCode::BAD_REQUEST,
                ResolveError::NotFound => StatusCode::NOT_FOUND,
                ResolveError::Upstream(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::RoleNotPermitted(_) => StatusCode::FORBIDDEN,
                AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(store) => store_status(store),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) | Self::InvalidCallbackToken => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code, part of the API contract.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Order(err) => match err {
                OrderError::ProductNotFound => "product_not_found",
                OrderError::InvalidPlayerId(_) => "invalid_player_id",
                OrderError::MissingPlayerName => "missing_player_name",
                OrderError::AlreadyFinal => "order_already_final",
                OrderError::Store(store) => store_code(store),
                OrderError::PaymentUrl(_) => "internal_error",
            },
            Self::Resolve(err) => match err {
                ResolveError::InvalidId(_) => "invalid_player_id",
                ResolveError::NotFound => "player_not_found",
                ResolveError::Upstream(_) => "upstream_error",
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "invalid_credentials",
                AuthError::RoleNotPermitted(_) => "forbidden_role",
                AuthError::PasswordHash => "internal_error",
            },
            Self::Store(store) => store_code(store),
            Self::NotFound(_) => "order_not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidCallbackToken => "invalid_callback_token",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Never leak internals
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Store(store) | Self::Order(OrderError::Store(store)) => store_message(store),
            Self::Order(OrderError::PaymentUrl(_)) => "Internal server error".to_string(),
            Self::Resolve(ResolveError::Upstream(_)) => {
                "Player lookup is temporarily unavailable".to_string()
            }
            Self::Auth(AuthError::PasswordHash) => "Internal server error".to_string(),
            Self::Order(err) => err.to_string(),
            Self::Resolve(err) => err.to_string(),
            Self::Auth(err) => err.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::InvalidCallbackToken => "Invalid callback token".to_string(),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
    }
}

fn store_code(err: &StoreError) -> &'static str {
    match err {
        StoreError::NotFound(_) => "order_not_found",
        StoreError::Conflict(_) => "order_already_final",
    }
}

fn store_message(err: &StoreError) -> String {
    match err {
        StoreError::NotFound(what) => format!("Not found: {what}"),
        StoreError::Conflict(_) => "Order is already finalized".to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = json!({
            "success": false,
            "error": self.client_message(),
            "code": self.code(),
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
