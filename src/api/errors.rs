//! HTTP error mapping
//!
//! Every failure surfaces as a `{ "message": string }` body with a
//! status drawn from the domain taxonomy. Insufficient funds maps to
//! 400 alongside invalid input; ownership failures are plain 404s so
//! foreign game ids leak nothing.

use crate::errors::WagerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Wire shape for all error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl From<WagerError> for ApiError {
    fn from(err: WagerError) -> Self {
        let status = match &err {
            WagerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            WagerError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            WagerError::NotFound(_) => StatusCode::NOT_FOUND,
            WagerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            WagerError::Storage(_)
            | WagerError::Corrupted(_)
            | WagerError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "internal error");
        }

        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}
