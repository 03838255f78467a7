use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoachingSessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub communication_type: String,
    pub latest_communication: String,
    pub company_response: Option<String>,
    pub additional_context: Option<String>,
    pub files: Option<Value>,
    /// `pending`, `analyzing` or `completed`.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StrategyRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub strategy_type: String,
    pub content: String,
    pub confidence_score: Option<f64>,
    pub expected_outcome: Option<Value>,
    pub tactics: Option<Value>,
    pub created_at: DateTime<Utc>,
}
