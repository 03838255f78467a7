use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_description: Option<String>,
    pub company: Option<String>,
    pub linkedin_url: Option<String>,
    pub additional_info: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NegotiationGoalsRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reservation_price: f64,
    pub target_price: f64,
    pub batna: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
