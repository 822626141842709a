//! REST API module.
//!
//! Contains all API routes and handlers. Every handler goes through the
//! persistence facade held in [`crate::AppState`].

mod dashboard;
mod data;
mod interns;
mod rewards;

pub use dashboard::*;
pub use data::*;
pub use interns::*;
pub use rewards::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::service::PersistenceResult;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Convert a facade result into an API response.
pub fn respond<T: Serialize>(result: PersistenceResult<T>) -> ApiResult<T> {
    let (data, message) = result.into_result()?;

    Ok(ApiResponse {
        success: true,
        data,
        message,
    })
}
