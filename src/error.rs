use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::model::user::Role;

/// Error taxonomy shared by every handler. Each variant maps to one HTTP
/// status; the body is always `{"error": ...}` JSON.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("user already exists with a different role")]
    RoleConflict { existing_role: Role },
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::RoleConflict { .. } => StatusCode::CONFLICT,
            ApiError::Store(e) => {
                error!("store error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = match &self {
            // 409 carries the conflicting role so the client can correct input
            ApiError::RoleConflict { existing_role } => {
                json!({ "error": self.to_string(), "existingRole": existing_role })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
