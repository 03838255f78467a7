//! Axum route handlers for assessment records.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::assessments::repository::{append_file, find_assessment, insert_assessment, update_analysis};
use crate::assessments::storage::{discard_file, object_key, put_file};
use crate::assessments::validation::{
    validate_analysis_patch, validate_new_assessment, AnalysisPatch, ClientInfo,
    NewAssessmentRequest,
};
use crate::documents::upload::{check_content_length, decode_file_data, upload_payload};
use crate::errors::AppError;
use crate::models::assessment::AssessmentRow;
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadRequest {
    pub file_data: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoredFileResponse {
    pub path: String,
    pub size: usize,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Assessment {id} not found"))
}

/// POST /api/assessments
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewAssessmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AssessmentRow>), AppError> {
    let Json(req) = payload?;
    let new = validate_new_assessment(req)?;
    let client = ClientInfo::from_headers(&headers);

    let row = insert_assessment(&state.db, &new, &client).await?;
    let origin = row.client_info();
    info!(
        ip = origin.ip_address.as_deref().unwrap_or("-"),
        user_agent = origin.user_agent.as_deref().unwrap_or("-"),
        "Stored assessment {} for {} at {}",
        row.id,
        row.job_title,
        row.company
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AssessmentRow>, AppError> {
    let Path(id) = id?;
    let row = find_assessment(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(row))
}

/// PATCH /api/assessments/:id/analysis
pub async fn handle_update_analysis(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AnalysisPatch>, JsonRejection>,
) -> Result<Json<AssessmentRow>, AppError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    validate_analysis_patch(&patch)?;

    let row = update_analysis(&state.db, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!("Updated analysis for assessment {id}");
    Ok(Json(row))
}

/// POST /api/assessments/:id/files
pub async fn handle_store_file(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<FileUploadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StoredFileResponse>), AppError> {
    check_content_length(&headers)?;
    let Path(id) = id?;
    let req = upload_payload(payload)?;
    let bytes = decode_file_data(req.file_data.as_deref())?;

    if find_assessment(&state.db, id).await?.is_none() {
        return Err(not_found(id));
    }

    let file_name = req
        .file_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "document".to_string());
    let content_type = req
        .file_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    let size = bytes.len();

    let path = put_file(
        &state.s3,
        &state.config.s3_bucket,
        object_key(id, &file_name),
        &content_type,
        bytes,
    )
    .await?;

    let entry = json!({
        "name": file_name,
        "path": path,
        "type": content_type,
        "size": size,
    });
    let recorded = match append_file(&state.db, id, &entry).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(not_found(id)),
        Err(e) => Err(AppError::from(e)),
    };
    if let Err(e) = recorded {
        // The row no longer references the object, so remove it.
        discard_file(&state.s3, &state.config.s3_bucket, &path).await;
        return Err(e);
    }

    Ok((StatusCode::CREATED, Json(StoredFileResponse { path, size })))
}
