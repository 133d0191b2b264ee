// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token gate and caller identity extraction.
//!
//! Authentication itself lives in front of this service: an external auth
//! layer terminates user credentials and injects the caller's id as an
//! `x-user-id` header. The gateway only verifies the shared bearer token
//! (when one is configured) and reads that header.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use sapa_core::types::{UserProfile, UserRole};
use sapa_storage::queries::school;

use crate::error::ApiError;
use crate::server::AppState;

/// Header carrying the caller's user id, set by the external auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Middleware rejecting requests without the configured bearer token.
/// A missing `gateway.bearer_token` config disables the check.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = &state.bearer_token {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(expected.as_str()) {
            return Err(ApiError::unauthorized("missing or invalid bearer token"));
        }
    }
    Ok(next.run(request).await)
}

/// The caller's user id from `x-user-id`.
pub fn caller_id(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing x-user-id header"))
}

/// Load the caller's profile and require the admin role.
pub async fn require_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<UserProfile, ApiError> {
    let user_id = caller_id(headers)?;
    let profile = school::get_user(state.engine.database(), &user_id)
        .await?
        .ok_or_else(|| ApiError::forbidden("unknown caller"))?;
    if profile.role != UserRole::Admin {
        return Err(ApiError::forbidden("administrator role required"));
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn caller_id_requires_a_non_empty_header() {
        let mut headers = HeaderMap::new();
        assert!(caller_id(&headers).is_err());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static(""));
        assert!(caller_id(&headers).is_err());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("stu1"));
        assert_eq!(caller_id(&headers).unwrap(), "stu1");
    }
}
