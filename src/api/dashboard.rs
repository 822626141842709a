//! Dashboard API endpoint.

use axum::extract::State;

use super::{respond, ApiResult};
use crate::models::DashboardStats;
use crate::AppState;

/// GET /api/dashboard - Aggregate donation stats.
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    respond(state.portal.dashboard().await)
}
