use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the offer text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    File,
}

impl InputType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "text" => Some(InputType::Text),
            "file" => Some(InputType::File),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::File => "file",
        }
    }
}

/// Body of `POST /api/analyze-offer` as it arrives on the wire.
/// Every field is optional here so missing fields produce a 400 with a
/// specific message instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOfferPayload {
    pub offer_input: Option<String>,
    pub input_type: Option<String>,
    pub file_name: Option<String>,
}

/// A validated analysis request. `offer_input` is trimmed, non-empty and free of
/// placeholder text; `file_name` is only ever set for file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub offer_input: String,
    pub input_type: InputType,
    pub file_name: Option<String>,
}

/// Self-reported by the model, echoed back as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    #[default]
    Low,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedOfferInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<String>,
    pub confidence: Confidence,
}

/// Structured view of a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferAnalysis {
    pub extracted_info: ExtractedOfferInfo,
    pub offer_summary: String,
    pub benchmark_assessment: String,
    pub strengths: String,
    pub negotiation_opportunities: String,
    pub suggested_strategy: String,
    pub risks_considerations: String,
}

/// Parsed analysis plus the verbatim reply and the outbound payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub analysis: OfferAnalysis,
    pub raw_response: String,
    pub debug_payload: Value,
}
