use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::prompt::TemplateError;
use crate::llm_client::LlmError;

/// Top-level message for every failure that happens after input validation
/// in the analysis pipeline.
const ANALYSIS_FAILED: &str = "Failed to analyze offer";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("No analysis content received from the model")]
    NoContent,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => AppError::NoContent,
            LlmError::Api { message, .. } => {
                AppError::ExternalService(format!("OpenAI API error: {message}"))
            }
            other => AppError::ExternalService(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge("Request body is too large".to_string());
        }
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Invalid query parameters: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone(), None),
            AppError::Template(e) => {
                tracing::error!("Prompt template error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ANALYSIS_FAILED.to_string(),
                    Some("Failed to load analysis prompt".to_string()),
                )
            }
            AppError::ExternalService(msg) => {
                tracing::error!("Model provider error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ANALYSIS_FAILED.to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::NoContent => {
                tracing::error!("Model provider returned no analysis text");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ANALYSIS_FAILED.to_string(),
                    Some("No analysis received from OpenAI".to_string()),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A storage error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({ "error": error });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_400_without_details() {
        let (status, body) = render(AppError::Validation("bad input".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad input");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_provider_error_keeps_message_in_details() {
        let err: AppError = LlmError::Api {
            status: 429,
            message: "rate limited".into(),
        }
        .into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], ANALYSIS_FAILED);
        assert!(body["details"].as_str().unwrap().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_empty_content_maps_to_no_content() {
        let err: AppError = LlmError::EmptyContent.into();
        assert!(matches!(err, AppError::NoContent));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], ANALYSIS_FAILED);
    }

    #[tokio::test]
    async fn test_template_error_hides_path() {
        let err = AppError::Template(TemplateError::Format("missing marker".into()));
        let (_, body) = render(err).await;
        assert_eq!(body["details"], "Failed to load analysis prompt");
    }

    #[tokio::test]
    async fn test_payload_too_large_is_413() {
        let (status, _) = render(AppError::PayloadTooLarge("too big".into())).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_missing_query_parameter_is_400() {
        use axum::{extract::Query, http::Uri};

        #[derive(Debug, serde::Deserialize)]
        struct Params {
            #[allow(dead_code)]
            user_id: uuid::Uuid,
        }

        let uri: Uri = "/api/coaching/sessions".parse().unwrap();
        let rejection = Query::<Params>::try_from_uri(&uri).unwrap_err();
        let (status, body) = render(rejection.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query parameters"));
    }
}
