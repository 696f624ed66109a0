use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::relay::payload::PayloadError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
}

impl From<PayloadError> for ApiError {
    fn from(e: PayloadError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(StatusResponse::error(&msg))).into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Response envelope shared by the relay endpoints:
/// `{"status": ..., "message": ...}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn new(status: &str) -> Self {
        StatusResponse {
            status: status.to_string(),
            message: None,
        }
    }

    pub fn with_message(status: &str, message: &str) -> Self {
        StatusResponse {
            status: status.to_string(),
            message: Some(message.to_string()),
        }
    }

    pub fn error(message: &str) -> Self {
        Self::with_message("error", message)
    }
}
