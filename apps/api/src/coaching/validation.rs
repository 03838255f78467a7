use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::assessments::validation::{check_confidence_score, non_blank};
use crate::errors::AppError;

/// Channels a logged employer communication can arrive through.
pub const COMMUNICATION_TYPES: &[&str] = &["email", "phone", "meeting", "video", "text", "other"];

pub const INVALID_STATUS_MESSAGE: &str =
    "Invalid status. Must be one of: pending, analyzing, completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Analyzing,
    Completed,
}

impl SessionStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(SessionStatus::Pending),
            "analyzing" => Some(SessionStatus::Analyzing),
            "completed" => Some(SessionStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Analyzing => "analyzing",
            SessionStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSessionRequest {
    pub user_id: Option<Uuid>,
    pub communication_type: Option<String>,
    pub latest_communication: Option<String>,
    pub company_response: Option<String>,
    pub additional_context: Option<String>,
    pub files: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub user_id: Uuid,
    pub communication_type: String,
    pub latest_communication: String,
    pub company_response: Option<String>,
    pub additional_context: Option<String>,
    pub files: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStrategyRequest {
    pub user_id: Option<Uuid>,
    pub strategy_type: Option<String>,
    pub content: Option<String>,
    pub confidence_score: Option<f64>,
    pub expected_outcome: Option<Value>,
    pub tactics: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStrategy {
    pub user_id: Uuid,
    pub strategy_type: String,
    pub content: String,
    pub confidence_score: Option<f64>,
    pub expected_outcome: Option<Value>,
    pub tactics: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    non_blank(value).ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn required_user(user_id: Option<Uuid>) -> Result<Uuid, AppError> {
    user_id.ok_or_else(|| AppError::Validation("user_id is required".to_string()))
}

pub fn validate_new_session(req: NewSessionRequest) -> Result<NewSession, AppError> {
    let user_id = required_user(req.user_id)?;
    let communication_type = required(req.communication_type, "communication_type")?.to_lowercase();
    if !COMMUNICATION_TYPES.contains(&communication_type.as_str()) {
        return Err(AppError::Validation(format!(
            "Invalid communication_type. Must be one of: {}",
            COMMUNICATION_TYPES.join(", ")
        )));
    }
    let latest_communication = required(req.latest_communication, "latest_communication")?;

    Ok(NewSession {
        user_id,
        communication_type,
        latest_communication,
        company_response: non_blank(req.company_response),
        additional_context: non_blank(req.additional_context),
        files: req.files.filter(|f| !f.is_null()),
    })
}

pub fn validate_status_update(req: &StatusUpdateRequest) -> Result<SessionStatus, AppError> {
    req.status
        .as_deref()
        .and_then(SessionStatus::parse)
        .ok_or_else(|| AppError::Validation(INVALID_STATUS_MESSAGE.to_string()))
}

pub fn validate_new_strategy(req: NewStrategyRequest) -> Result<NewStrategy, AppError> {
    let user_id = required_user(req.user_id)?;
    let strategy_type = required(req.strategy_type, "strategy_type")?;
    let content = required(req.content, "content")?;
    check_confidence_score(req.confidence_score)?;

    Ok(NewStrategy {
        user_id,
        strategy_type,
        content,
        confidence_score: req.confidence_score,
        expected_outcome: req.expected_outcome.filter(|v| !v.is_null()),
        tactics: req.tactics.filter(|v| !v.is_null()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session_request() -> NewSessionRequest {
        NewSessionRequest {
            user_id: Some(Uuid::new_v4()),
            communication_type: Some("Email".to_string()),
            latest_communication: Some("  We can't go above $120k.  ".to_string()),
            company_response: Some(" ".to_string()),
            additional_context: None,
            files: Some(Value::Null),
        }
    }

    fn strategy_request() -> NewStrategyRequest {
        NewStrategyRequest {
            user_id: Some(Uuid::new_v4()),
            strategy_type: Some("counter_offer".to_string()),
            content: Some("Anchor at $135k and trade on start date.".to_string()),
            confidence_score: Some(0.8),
            expected_outcome: Some(json!({"base": 130000})),
            tactics: None,
        }
    }

    #[test]
    fn test_valid_session_is_normalized() {
        let s = validate_new_session(session_request()).unwrap();
        assert_eq!(s.communication_type, "email");
        assert_eq!(s.latest_communication, "We can't go above $120k.");
        assert_eq!(s.company_response, None);
        assert_eq!(s.files, None);
    }

    #[test]
    fn test_session_requires_user() {
        let mut req = session_request();
        req.user_id = None;
        let err = validate_new_session(req).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "user_id is required"));
    }

    #[test]
    fn test_unknown_communication_type_rejected() {
        let mut req = session_request();
        req.communication_type = Some("carrier pigeon".to_string());
        assert!(matches!(validate_new_session(req), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_blank_communication_rejected() {
        let mut req = session_request();
        req.latest_communication = Some("\n\t".to_string());
        assert!(validate_new_session(req).is_err());
    }

    #[test]
    fn test_status_values() {
        for (raw, expected) in [
            ("pending", SessionStatus::Pending),
            ("Analyzing", SessionStatus::Analyzing),
            (" completed ", SessionStatus::Completed),
        ] {
            let req = StatusUpdateRequest {
                status: Some(raw.to_string()),
            };
            assert_eq!(validate_status_update(&req).unwrap(), expected);
        }
        assert_eq!(SessionStatus::Analyzing.as_str(), "analyzing");
    }

    #[test]
    fn test_unknown_or_missing_status_rejected() {
        for status in [Some("done".to_string()), None] {
            let err = validate_status_update(&StatusUpdateRequest { status }).unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == INVALID_STATUS_MESSAGE));
        }
    }

    #[test]
    fn test_valid_strategy() {
        let s = validate_new_strategy(strategy_request()).unwrap();
        assert_eq!(s.strategy_type, "counter_offer");
        assert_eq!(s.expected_outcome, Some(json!({"base": 130000})));
    }

    #[test]
    fn test_strategy_confidence_out_of_range_rejected() {
        let mut req = strategy_request();
        req.confidence_score = Some(-0.1);
        assert!(validate_new_strategy(req).is_err());
    }

    #[test]
    fn test_strategy_requires_content() {
        let mut req = strategy_request();
        req.content = None;
        let err = validate_new_strategy(req).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "content is required"));
    }
}
