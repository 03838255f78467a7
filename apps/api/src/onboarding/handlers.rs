//! Axum route handlers for onboarding. The user id is always the path segment.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::onboarding::{NegotiationGoalsRow, UserProfileRow};
use crate::onboarding::repository::{
    find_goals, find_profile, mark_onboarding_complete, onboarding_completed, upsert_goals,
    upsert_profile,
};
use crate::onboarding::validation::{
    validate_goals, validate_profile, GoalsRequest, OnboardingStatus, ProfileRequest,
};
use crate::state::AppState;

/// PUT /api/onboarding/:user_id/profile
pub async fn handle_save_profile(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<UserProfileRow>, AppError> {
    let Path(user_id) = user_id?;
    let Json(req) = payload?;
    let profile = validate_profile(req)?;
    let row = upsert_profile(&state.db, user_id, &profile).await?;
    info!("Saved profile for user {user_id}");
    Ok(Json(row))
}

/// GET /api/onboarding/:user_id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<UserProfileRow>, AppError> {
    let Path(user_id) = user_id?;
    let row = find_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;
    Ok(Json(row))
}

/// PUT /api/onboarding/:user_id/goals
pub async fn handle_save_goals(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<GoalsRequest>, JsonRejection>,
) -> Result<Json<NegotiationGoalsRow>, AppError> {
    let Path(user_id) = user_id?;
    let Json(req) = payload?;
    let goals = validate_goals(req)?;
    let row = upsert_goals(&state.db, user_id, &goals).await?;
    info!("Saved negotiation goals for user {user_id}");
    Ok(Json(row))
}

/// GET /api/onboarding/:user_id/goals
pub async fn handle_get_goals(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<NegotiationGoalsRow>, AppError> {
    let Path(user_id) = user_id?;
    let row = find_goals(&state.db, user_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Negotiation goals for user {user_id} not found"))
    })?;
    Ok(Json(row))
}

/// POST /api/onboarding/:user_id/complete
pub async fn handle_complete_onboarding(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(user_id) = user_id?;
    mark_onboarding_complete(&state.db, user_id).await?;
    info!("Onboarding completed for user {user_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/onboarding/:user_id/status
pub async fn handle_onboarding_status(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<OnboardingStatus>, AppError> {
    let Path(user_id) = user_id?;
    let onboarding_completed = onboarding_completed(&state.db, user_id).await?;
    Ok(Json(OnboardingStatus {
        onboarding_completed,
    }))
}
