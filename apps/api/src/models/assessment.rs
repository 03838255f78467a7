use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::assessments::validation::ClientInfo;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentRow {
    pub id: Uuid,
    pub job_title: String,
    pub company: String,
    pub offer_amount: f64,
    pub benefits: Option<String>,
    pub additional_context: Option<String>,
    /// JSON array of `{name, path, type, size}` for stored offer documents.
    pub files: Option<Value>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub ip_address: Option<String>,
    #[serde(skip_serializing)]
    pub user_agent: Option<String>,
    pub market_analysis: Option<Value>,
    pub red_flags: Option<Value>,
    pub opportunities: Option<Value>,
    pub confidence_score: Option<f64>,
}

impl AssessmentRow {
    /// Where the submission came from. Recorded for audit, never serialized.
    pub fn client_info(&self) -> ClientInfo {
        ClientInfo {
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> AssessmentRow {
        AssessmentRow {
            id: Uuid::nil(),
            job_title: "Engineer".to_string(),
            company: "Initech".to_string(),
            offer_amount: 120_000.0,
            benefits: None,
            additional_context: None,
            files: None,
            submitted_at: Utc::now(),
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            market_analysis: None,
            red_flags: None,
            opportunities: None,
            confidence_score: None,
        }
    }

    #[test]
    fn test_client_info_reads_recorded_origin() {
        let info = row().client_info();
        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(info.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_origin_is_not_serialized() {
        let json = serde_json::to_value(row()).unwrap();
        assert!(json.get("ip_address").is_none());
        assert!(json.get("user_agent").is_none());
        assert_eq!(json["company"], "Initech");
    }
}
