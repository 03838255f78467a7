//! Axum route handlers for the Offer Analysis API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::analysis::models::{AnalysisResponse, AnalyzeOfferPayload};
use crate::analysis::pipeline::analyze_offer;
use crate::errors::AppError;
use crate::llm_client::CredentialTier;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOfferResponse {
    pub success: bool,
    pub analysis: AnalysisResponse,
    pub raw_response: String,
    pub debug_payload: Value,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/analyze-offer
///
/// Free assessment flow. Billed against the free-tier credential.
pub async fn handle_analyze_offer(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeOfferPayload>, JsonRejection>,
) -> Result<Json<AnalyzeOfferResponse>, AppError> {
    run_analysis(&state, CredentialTier::Free, payload).await
}

/// POST /api/paid/analyze-offer
///
/// Same contract as the free flow, billed against the paid-customer credential.
pub async fn handle_paid_analyze_offer(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeOfferPayload>, JsonRejection>,
) -> Result<Json<AnalyzeOfferResponse>, AppError> {
    run_analysis(&state, CredentialTier::Paid, payload).await
}

async fn run_analysis(
    state: &AppState,
    tier: CredentialTier,
    payload: Result<Json<AnalyzeOfferPayload>, JsonRejection>,
) -> Result<Json<AnalyzeOfferResponse>, AppError> {
    let Json(payload) = payload?;
    let llm = state.llm(tier);

    let analysis = analyze_offer(payload, &state.config.prompt_template_path, llm.as_ref())
        .await
        .inspect_err(|e| tracing::warn!(tier = tier.as_str(), "Offer analysis failed: {e}"))?;

    Ok(Json(AnalyzeOfferResponse {
        success: true,
        raw_response: analysis.raw_response.clone(),
        debug_payload: analysis.debug_payload.clone(),
        analysis,
        timestamp: Utc::now(),
    }))
}
