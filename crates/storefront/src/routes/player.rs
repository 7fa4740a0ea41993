//! Player resolution API.

use axum::{Json, extract::Query, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use ucdrop_core::PlayerId;

use crate::error::Result;
use crate::models::ApiEnvelope;
use crate::models::api::ResolveData;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    id: String,
}

/// Resolve a player id to its account name.
#[instrument(skip(state))]
pub async fn resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<impl IntoResponse> {
    let id = PlayerId::parse(query.id.trim()).map_err(crate::services::player::ResolveError::from)?;
    let profile = state.resolver().resolve(&id).await?;

    Ok(Json(ApiEnvelope::ok(ResolveData {
        player_name: profile.player_name,
    })))
}
