//! Reward API endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::{respond, ApiResult};
use crate::models::Reward;
use crate::AppState;

/// GET /api/rewards - List the rewards catalog.
pub async fn list_rewards(State(state): State<AppState>) -> ApiResult<Vec<Reward>> {
    respond(state.portal.get_rewards().await)
}

/// PUT /api/rewards - Replace the rewards catalog.
pub async fn save_rewards(
    State(state): State<AppState>,
    body: Result<Json<Vec<Reward>>, JsonRejection>,
) -> ApiResult<Vec<Reward>> {
    let Json(rewards) = body?;
    respond(state.portal.save_rewards(rewards).await)
}
