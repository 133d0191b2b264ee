// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the conversation API and the admin registry API.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use sapa_core::types::{
    CannedResponse, ConversationTurn, Intent, ModelInfo, TrainingExample, TurnStats,
};
use sapa_router::EngineReply;
use sapa_storage::queries::{intents, responses};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{caller_id, require_admin};
use crate::error::ApiError;
use crate::server::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    pub examples: Vec<TrainingExample>,
}

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateResponseRequest {
    pub text: String,
    #[serde(default)]
    pub priority: i64,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<MessageRequest>,
) -> Result<Json<EngineReply>, ApiError> {
    let user_id = caller_id(&headers)?;
    let reply = state.engine.handle_message(&user_id, &body.text).await?;
    Ok(Json(reply))
}

pub async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ConversationTurn>>, ApiError> {
    let user_id = caller_id(&headers)?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = state.engine.history(&user_id, limit).await?;
    Ok(Json(history))
}

pub async fn delete_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = caller_id(&headers)?;
    let deleted = state.engine.clear_history(&user_id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

/// Fresh-start hook the auth layer calls on login: the new session begins
/// with an empty history and a reset escalation window.
pub async fn post_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = caller_id(&headers)?;
    let cleared = state.engine.begin_session(&user_id).await?;
    Ok(Json(json!({ "cleared": cleared })))
}

pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StatsQuery>,
) -> Result<Json<TurnStats>, ApiError> {
    require_admin(&state, &headers).await?;
    let stats = state.engine.stats(query.from, query.to).await?;
    Ok(Json(stats))
}

pub async fn post_train(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<TrainRequest>,
) -> Result<Json<ModelInfo>, ApiError> {
    require_admin(&state, &headers).await?;
    if body.examples.is_empty() {
        return Err(ApiError::bad_request("examples must not be empty"));
    }
    state.engine.retrain(&body.examples).await?;
    Ok(Json(state.engine.model_info().await))
}

pub async fn get_model(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ModelInfo>, ApiError> {
    require_admin(&state, &headers).await?;
    Ok(Json(state.engine.model_info().await))
}

pub async fn create_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateIntentRequest>,
) -> Result<(StatusCode, Json<Intent>), ApiError> {
    require_admin(&state, &headers).await?;
    let intent =
        intents::create_intent(state.engine.database(), &body.name, &body.description).await?;
    Ok((StatusCode::CREATED, Json(intent)))
}

pub async fn list_intents(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Intent>>, ApiError> {
    require_admin(&state, &headers).await?;
    let all = intents::list_intents(state.engine.database()).await?;
    Ok(Json(all))
}

pub async fn delete_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    intents::delete_intent_cascade(state.engine.database(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_response(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(intent_id): Path<i64>,
    Json(body): Json<CreateResponseRequest>,
) -> Result<(StatusCode, Json<CannedResponse>), ApiError> {
    require_admin(&state, &headers).await?;
    let created = responses::create_response(
        state.engine.database(),
        intent_id,
        &body.text,
        body.priority,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_responses(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(intent_id): Path<i64>,
) -> Result<Json<Vec<CannedResponse>>, ApiError> {
    require_admin(&state, &headers).await?;
    let all = responses::list_for_intent(state.engine.database(), intent_id).await?;
    Ok(Json(all))
}

pub async fn delete_response(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    responses::delete_response(state.engine.database(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
