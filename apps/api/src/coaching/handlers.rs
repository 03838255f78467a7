//! Axum route handlers for coaching sessions and their strategies.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::coaching::repository::{
    find_session, insert_session, insert_strategy, list_session_strategies, list_user_sessions,
    list_user_strategies, set_session_status,
};
use crate::coaching::validation::{
    validate_new_session, validate_new_strategy, validate_status_update, NewSessionRequest,
    NewStrategyRequest, StatusUpdateRequest, UserIdQuery,
};
use crate::errors::AppError;
use crate::models::coaching::{CoachingSessionRow, StrategyRow};
use crate::state::AppState;

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Coaching session {id} not found"))
}

/// POST /api/coaching/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    payload: Result<Json<NewSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CoachingSessionRow>), AppError> {
    let Json(req) = payload?;
    let new = validate_new_session(req)?;
    let row = insert_session(&state.db, &new).await?;
    info!(
        "Created {} coaching session {} for user {}",
        row.communication_type, row.id, row.user_id
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/coaching/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CoachingSessionRow>, AppError> {
    let Path(id) = id?;
    let row = find_session(&state.db, id)
        .await?
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(row))
}

/// GET /api/coaching/sessions?user_id=
pub async fn handle_list_sessions(
    State(state): State<AppState>,
    params: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<Vec<CoachingSessionRow>>, AppError> {
    let Query(params) = params?;
    Ok(Json(list_user_sessions(&state.db, params.user_id).await?))
}

/// PATCH /api/coaching/sessions/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let status = validate_status_update(&req)?;

    if !set_session_status(&state.db, id, status).await? {
        return Err(session_not_found(id));
    }
    info!("Coaching session {id} is now {}", status.as_str());
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/coaching/sessions/:id/strategies
pub async fn handle_create_strategy(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<NewStrategyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StrategyRow>), AppError> {
    let Path(session_id) = id?;
    let Json(req) = payload?;
    let new = validate_new_strategy(req)?;

    let row = insert_strategy(&state.db, session_id, &new)
        .await?
        .ok_or_else(|| session_not_found(session_id))?;
    info!("Stored {} strategy {} for session {session_id}", row.strategy_type, row.id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/coaching/sessions/:id/strategies
pub async fn handle_list_session_strategies(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<StrategyRow>>, AppError> {
    let Path(session_id) = id?;
    Ok(Json(list_session_strategies(&state.db, session_id).await?))
}

/// GET /api/coaching/strategies?user_id=
pub async fn handle_list_user_strategies(
    State(state): State<AppState>,
    params: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<Vec<StrategyRow>>, AppError> {
    let Query(params) = params?;
    Ok(Json(list_user_strategies(&state.db, params.user_id).await?))
}
