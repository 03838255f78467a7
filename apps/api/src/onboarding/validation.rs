use serde::{Deserialize, Serialize};

use crate::assessments::validation::non_blank;
use crate::errors::AppError;

/// Body of `PUT /api/onboarding/:user_id/profile`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRequest {
    pub job_description: Option<String>,
    pub company: Option<String>,
    pub linkedin_url: Option<String>,
    pub additional_info: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileData {
    pub job_description: Option<String>,
    pub company: Option<String>,
    pub linkedin_url: Option<String>,
    pub additional_info: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter_url: Option<String>,
}

/// Body of `PUT /api/onboarding/:user_id/goals`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalsRequest {
    pub reservation_price: Option<f64>,
    pub target_price: Option<f64>,
    pub batna: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationGoals {
    pub reservation_price: f64,
    pub target_price: f64,
    pub batna: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnboardingStatus {
    pub onboarding_completed: bool,
}

fn url_field(value: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    match non_blank(value) {
        Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => Err(
            AppError::Validation(format!("{field} must be an http:// or https:// URL")),
        ),
        other => Ok(other),
    }
}

pub fn validate_profile(req: ProfileRequest) -> Result<ProfileData, AppError> {
    Ok(ProfileData {
        job_description: non_blank(req.job_description),
        company: non_blank(req.company),
        linkedin_url: url_field(req.linkedin_url, "linkedin_url")?,
        additional_info: non_blank(req.additional_info),
        resume_url: url_field(req.resume_url, "resume_url")?,
        cover_letter_url: url_field(req.cover_letter_url, "cover_letter_url")?,
    })
}

fn price(value: Option<f64>, field: &str) -> Result<f64, AppError> {
    let value = value.ok_or_else(|| AppError::Validation(format!("{field} is required")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(value)
}

pub fn validate_goals(req: GoalsRequest) -> Result<NegotiationGoals, AppError> {
    Ok(NegotiationGoals {
        reservation_price: price(req.reservation_price, "reservation_price")?,
        target_price: price(req.target_price, "target_price")?,
        batna: non_blank(req.batna)
            .ok_or_else(|| AppError::Validation("batna is required".to_string()))?,
    })
}
