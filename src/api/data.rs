//! Data-management endpoints: export and import of the local store.

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::AppState;

/// Import acknowledgement.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
}

/// GET /api/export - Download a JSON snapshot of the local store.
pub async fn export_data(State(state): State<AppState>) -> Result<Response, AppError> {
    let (snapshot, _) = state.portal.export_data().await.into_result()?;

    let disposition = format!("attachment; filename=\"{}\"", snapshot.file_name());
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(snapshot)).into_response())
}

/// POST /api/import - Replace local collections from an exported snapshot.
pub async fn import_data(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportResponse>, AppError> {
    let (_, message) = state.portal.import_data(&body).await.into_result()?;

    Ok(Json(ImportResponse {
        success: true,
        message: message.unwrap_or_default(),
    }))
}
