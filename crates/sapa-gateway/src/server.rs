// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the listening loop.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use sapa_config::GatewayConfig;
use sapa_core::SapaError;
use sapa_router::ConversationEngine;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::auth;
use crate::handlers;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConversationEngine>,
    pub bearer_token: Option<String>,
}

/// Build the full route tree. `/health` is open; everything under `/v1`
/// sits behind the bearer-token middleware.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/conversation/message", post(handlers::post_message))
        .route(
            "/conversation/history",
            get(handlers::get_history).delete(handlers::delete_history),
        )
        .route("/conversation/session", post(handlers::post_session))
        .route("/conversation/stats", get(handlers::get_stats))
        .route("/conversation/train", post(handlers::post_train))
        .route("/model", get(handlers::get_model))
        .route(
            "/intents",
            post(handlers::create_intent).get(handlers::list_intents),
        )
        .route("/intents/{id}", delete(handlers::delete_intent))
        .route(
            "/intents/{id}/responses",
            post(handlers::create_response).get(handlers::list_responses),
        )
        .route("/responses/{id}", delete(handlers::delete_response))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/v1", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the task is cancelled.
pub async fn serve(
    config: &GatewayConfig,
    engine: Arc<ConversationEngine>,
) -> Result<(), SapaError> {
    let state = AppState {
        engine,
        bearer_token: config.bearer_token.clone(),
    };
    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| SapaError::Internal(format!("failed to bind {addr}: {e}")))?;
    info!(%addr, auth = config.bearer_token.is_some(), "gateway listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| SapaError::Internal(format!("server error: {e}")))
}
