pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::analysis::handlers::{handle_analyze_offer, handle_paid_analyze_offer};
use crate::assessments::handlers::{
    handle_get_assessment, handle_store_file, handle_submit_assessment, handle_update_analysis,
};
use crate::coaching::handlers::{
    handle_create_session, handle_create_strategy, handle_get_session, handle_list_session_strategies,
    handle_list_sessions, handle_list_user_strategies, handle_update_status,
};
use crate::documents::handlers::handle_process_pdf;
use crate::documents::upload::MAX_UPLOAD_BYTES;
use crate::onboarding::handlers::{
    handle_complete_onboarding, handle_get_goals, handle_get_profile, handle_onboarding_status,
    handle_save_goals, handle_save_profile,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Offer analysis
        .route("/api/analyze-offer", post(handle_analyze_offer))
        .route("/api/paid/analyze-offer", post(handle_paid_analyze_offer))
        // Documents
        .route(
            "/api/process-pdf",
            post(handle_process_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Assessment records
        .route("/api/assessments", post(handle_submit_assessment))
        .route("/api/assessments/:id", get(handle_get_assessment))
        .route(
            "/api/assessments/:id/analysis",
            patch(handle_update_analysis),
        )
        .route(
            "/api/assessments/:id/files",
            post(handle_store_file).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Coaching
        .route(
            "/api/coaching/sessions",
            post(handle_create_session).get(handle_list_sessions),
        )
        .route("/api/coaching/sessions/:id", get(handle_get_session))
        .route(
            "/api/coaching/sessions/:id/status",
            patch(handle_update_status),
        )
        .route(
            "/api/coaching/sessions/:id/strategies",
            post(handle_create_strategy).get(handle_list_session_strategies),
        )
        .route("/api/coaching/strategies", get(handle_list_user_strategies))
        // Onboarding
        .route(
            "/api/onboarding/:user_id/profile",
            put(handle_save_profile).get(handle_get_profile),
        )
        .route(
            "/api/onboarding/:user_id/goals",
            put(handle_save_goals).get(handle_get_goals),
        )
        .route(
            "/api/onboarding/:user_id/complete",
            post(handle_complete_onboarding),
        )
        .route(
            "/api/onboarding/:user_id/status",
            get(handle_onboarding_status),
        )
        .with_state(state)
}
