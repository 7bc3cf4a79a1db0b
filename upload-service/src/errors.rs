use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::models::ErrorResponse;

/// Failures surfaced at the HTTP boundary.
///
/// Both collapse to a generic 500; the cause is logged where it happens and
/// never reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    CredentialGeneration,
    Enqueue,
}

impl ApiError {
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::CredentialGeneration => "Failed to generate SAS token",
            ApiError::Enqueue => "Failed to add message to queue",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message().to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
