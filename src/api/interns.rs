//! Intern API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::{respond, ApiResult};
use crate::errors::AppError;
use crate::models::{total_donations, DonationRequest, Intern};
use crate::AppState;

/// Roster listing with the donation total alongside.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternListResponse {
    pub success: bool,
    pub data: Vec<Intern>,
    pub total_donations: i64,
}

impl IntoResponse for InternListResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// GET /api/interns - List all interns.
pub async fn list_interns(
    State(state): State<AppState>,
) -> Result<InternListResponse, AppError> {
    let (interns, _) = state.portal.get_interns().await.into_result()?;

    Ok(InternListResponse {
        success: true,
        total_donations: total_donations(&interns),
        data: interns,
    })
}

/// GET /api/interns/:id - Get a single intern.
pub async fn get_intern(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Intern> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(AppError::NotFound("Intern not found".to_string()));
    };

    respond(state.portal.get_intern(id).await)
}

/// POST /api/interns - Create or replace an intern by id.
pub async fn save_intern(
    State(state): State<AppState>,
    body: Result<Json<Intern>, JsonRejection>,
) -> ApiResult<Intern> {
    let Json(intern) = body?;

    if intern.donations_raised < 0 {
        return Err(AppError::Validation(
            "Donations raised cannot be negative".to_string(),
        ));
    }

    respond(state.portal.save_intern(intern).await)
}

/// PUT /api/interns/:id/donations - Add to an intern's donations.
pub async fn update_donations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<DonationRequest>, JsonRejection>,
) -> ApiResult<Intern> {
    let Json(request) = body?;

    let Ok(id) = id.parse::<i64>() else {
        return Err(AppError::BadRequest("Invalid request".to_string()));
    };
    let Some(amount) = request.parse_amount() else {
        return Err(AppError::BadRequest("Invalid request".to_string()));
    };

    respond(state.portal.update_donations(id, amount).await)
}
