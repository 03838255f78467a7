use axum::http::{header::USER_AGENT, HeaderMap};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;

/// Body of `POST /api/assessments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAssessmentRequest {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub offer_amount: Option<f64>,
    pub benefits: Option<String>,
    pub additional_context: Option<String>,
}

/// A submission that passed validation. Optional text fields are `None` when blank.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssessment {
    pub job_title: String,
    pub company: String,
    pub offer_amount: f64,
    pub benefits: Option<String>,
    pub additional_context: Option<String>,
}

/// Body of `PATCH /api/assessments/:id/analysis`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisPatch {
    pub market_analysis: Option<Value>,
    pub red_flags: Option<Value>,
    pub opportunities: Option<Value>,
    pub confidence_score: Option<f64>,
}

/// Where a submission came from, recorded alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// First `X-Forwarded-For` hop and the `User-Agent` header.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ip_address = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty());
        let user_agent = headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        Self {
            ip_address,
            user_agent,
        }
    }
}

/// Trimmed text, or `None` when absent or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validate_new_assessment(req: NewAssessmentRequest) -> Result<NewAssessment, AppError> {
    let job_title = non_blank(req.job_title)
        .ok_or_else(|| AppError::Validation("job_title is required".to_string()))?;
    let company = non_blank(req.company)
        .ok_or_else(|| AppError::Validation("company is required".to_string()))?;
    let offer_amount = req
        .offer_amount
        .ok_or_else(|| AppError::Validation("offer_amount is required".to_string()))?;
    if !offer_amount.is_finite() || offer_amount < 0.0 {
        return Err(AppError::Validation(
            "offer_amount must be a non-negative number".to_string(),
        ));
    }

    Ok(NewAssessment {
        job_title,
        company,
        offer_amount,
        benefits: non_blank(req.benefits),
        additional_context: non_blank(req.additional_context),
    })
}

pub fn validate_analysis_patch(patch: &AnalysisPatch) -> Result<(), AppError> {
    if patch.market_analysis.is_none()
        && patch.red_flags.is_none()
        && patch.opportunities.is_none()
        && patch.confidence_score.is_none()
    {
        return Err(AppError::Validation(
            "No analysis fields provided".to_string(),
        ));
    }
    check_confidence_score(patch.confidence_score)
}

pub fn check_confidence_score(score: Option<f64>) -> Result<(), AppError> {
    match score {
        Some(score) if !(0.0..=1.0).contains(&score) => Err(AppError::Validation(
            "confidence_score must be between 0 and 1".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Reduces a client-supplied file name to a safe object key segment.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn request() -> NewAssessmentRequest {
        NewAssessmentRequest {
            job_title: Some(" Product Manager ".to_string()),
            company: Some("Initech".to_string()),
            offer_amount: Some(125_000.0),
            benefits: Some("  ".to_string()),
            additional_context: Some("Relocation offered".to_string()),
        }
    }

    #[test]
    fn test_valid_assessment_is_cleaned() {
        let a = validate_new_assessment(request()).unwrap();
        assert_eq!(a.job_title, "Product Manager");
        assert_eq!(a.benefits, None);
        assert_eq!(a.additional_context.as_deref(), Some("Relocation offered"));
    }

    #[test]
    fn test_blank_job_title_rejected() {
        let mut req = request();
        req.job_title = Some("   ".to_string());
        assert!(matches!(validate_new_assessment(req), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_missing_company_rejected() {
        let mut req = request();
        req.company = None;
        assert!(matches!(validate_new_assessment(req), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_negative_offer_rejected() {
        let mut req = request();
        req.offer_amount = Some(-1.0);
        assert!(matches!(validate_new_assessment(req), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_finite_offer_rejected() {
        let mut req = request();
        req.offer_amount = Some(f64::NAN);
        assert!(validate_new_assessment(req).is_err());
    }

    #[test]
    fn test_zero_offer_allowed() {
        let mut req = request();
        req.offer_amount = Some(0.0);
        assert!(validate_new_assessment(req).is_ok());
    }

    #[test]
    fn test_empty_patch_rejected() {
        assert!(validate_analysis_patch(&AnalysisPatch::default()).is_err());
    }

    #[test]
    fn test_patch_with_json_fields_accepted() {
        let patch = AnalysisPatch {
            red_flags: Some(json!(["no equity"])),
            ..Default::default()
        };
        assert!(validate_analysis_patch(&patch).is_ok());
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let patch = AnalysisPatch {
            confidence_score: Some(1.5),
            ..Default::default()
        };
        assert!(validate_analysis_patch(&patch).is_err());
    }

    #[test]
    fn test_client_info_uses_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        let info = ClientInfo::from_headers(&headers);
        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(info.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_client_info_without_headers() {
        assert_eq!(ClientInfo::from_headers(&HeaderMap::new()), ClientInfo::default());
    }

    #[test]
    fn test_sanitize_strips_directories_and_odd_chars() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\Offer Letter (1).pdf"), "Offer_Letter__1_.pdf");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "document");
        assert_eq!(sanitize_file_name("..."), "document");
    }
}
