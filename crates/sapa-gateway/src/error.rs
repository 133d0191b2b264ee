// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sapa_core::SapaError;
use serde_json::json;
use tracing::error;

/// An error ready to leave the gateway as a JSON body plus status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }
}

impl From<SapaError> for ApiError {
    fn from(err: SapaError) -> Self {
        let status = match &err {
            SapaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SapaError::NotFound { .. } => StatusCode::NOT_FOUND,
            SapaError::Conflict(_) => StatusCode::CONFLICT,
            SapaError::Config(_)
            | SapaError::Classification(_)
            | SapaError::Retrain(_)
            | SapaError::Storage { .. }
            | SapaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
