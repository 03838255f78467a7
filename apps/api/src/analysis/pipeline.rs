//! Offer analysis pipeline.
//!
//! Flow: normalize input → load + render prompt → one chat completion →
//! parse reply → `AnalysisResponse`.
//!
//! Validation and template errors are raised before the model is called.

use std::path::Path;

use tracing::info;

use crate::analysis::models::{AnalysisResponse, AnalyzeOfferPayload};
use crate::analysis::normalizer::normalize_request;
use crate::analysis::parser::parse_analysis;
use crate::analysis::prompt::load_template;
use crate::errors::AppError;
use crate::llm_client::ChatCompletion;

/// Runs one analysis end to end.
pub async fn analyze_offer(
    payload: AnalyzeOfferPayload,
    template_path: &Path,
    llm: &dyn ChatCompletion,
) -> Result<AnalysisResponse, AppError> {
    let request = normalize_request(payload)?;
    info!(
        "Analyzing {} offer input ({} chars)",
        request.input_type.as_str(),
        request.offer_input.chars().count()
    );

    let prompt = load_template(template_path).await?.render(&request);

    let completion = llm
        .complete(&prompt.system_instruction, &prompt.user_message())
        .await?;

    let analysis = parse_analysis(&completion.text);
    info!(
        "Offer analysis complete: confidence={:?}",
        analysis.extracted_info.confidence
    );

    Ok(AnalysisResponse {
        analysis,
        raw_response: completion.text,
        debug_payload: completion.payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Confidence;
    use crate::test_support::{shipped_template_path, FakeChat};

    fn payload(offer: &str, kind: &str) -> AnalyzeOfferPayload {
        AnalyzeOfferPayload {
            offer_input: Some(offer.to_string()),
            input_type: Some(kind.to_string()),
            file_name: None,
        }
    }

    #[tokio::test]
    async fn test_text_offer_end_to_end() {
        let llm = FakeChat::replying(
            "- **Company Name**: Acme Corp.\n\
             - **Job Title**: Senior Engineer\n\
             - **Base Salary**: $150,000\n\
             - **Confidence**: high\n\
             - **Offer Summary**: Competitive package.",
        );

        let response = analyze_offer(
            payload(
                "Company: Acme Corp. Title: Senior Engineer. Base: $150,000.",
                "text",
            ),
            &shipped_template_path(),
            &llm,
        )
        .await
        .unwrap();

        assert_eq!(llm.call_count(), 1);
        let info = &response.analysis.extracted_info;
        assert_eq!(info.company_name.as_deref(), Some("Acme Corp."));
        assert_eq!(info.job_title.as_deref(), Some("Senior Engineer"));
        assert_eq!(info.base_salary.as_deref(), Some("$150,000"));
        assert_eq!(info.confidence, Confidence::High);
        assert_eq!(response.analysis.offer_summary, "Competitive package.");
        assert!(response.raw_response.starts_with("- **Company Name**"));

        let (system, user) = llm.last_call().unwrap();
        assert!(system.contains("compensation consultant"));
        assert!(user.contains("Company: Acme Corp. Title: Senior Engineer. Base: $150,000."));
        assert!(!user.contains("## Output Format:"));
        assert!(user.contains("- **Offer Summary**:"));
        assert!(!user.contains("{{"));
        assert_eq!(response.debug_payload["messages"][1]["content"], user);
    }

    #[tokio::test]
    async fn test_unstated_offer_fields_are_omitted() {
        let llm = FakeChat::replying(
            "- **Company Name**: Not found\n\
             - **Job Title**: Account Executive\n\
             - **Base Salary**: Not found\n\
             - **Confidence**: low\n\
             - **Offer Summary**: Commission-heavy role with no stated base.",
        );

        let response = analyze_offer(
            payload("We'd love you to join as an Account Executive.", "text"),
            &shipped_template_path(),
            &llm,
        )
        .await
        .unwrap();

        let (_, user) = llm.last_call().unwrap();
        assert!(user.contains("or \"Not found\""));

        let info = &response.analysis.extracted_info;
        assert_eq!(info.company_name, None);
        assert_eq!(info.job_title.as_deref(), Some("Account Executive"));
        assert_eq!(info.base_salary, None);

        let json = serde_json::to_value(&response.analysis).unwrap();
        assert!(json["extractedInfo"].get("companyName").is_none());
        assert!(json["extractedInfo"].get("baseSalary").is_none());
    }

    #[tokio::test]
    async fn test_placeholder_input_never_reaches_model() {
        let llm = FakeChat::replying("unused");
        let err = analyze_offer(
            payload(
                "PDF file \"offer.pdf\" received successfully... copy and paste the text content...",
                "file",
            ),
            &shipped_template_path(),
            &llm,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unstructured_reply_degrades_to_sentinels() {
        let llm = FakeChat::replying("Honestly this offer seems fine, I would just accept it.");
        let response = analyze_offer(payload("Offer: $80,000 base", "text"), &shipped_template_path(), &llm)
            .await
            .unwrap();

        let a = &response.analysis;
        assert_eq!(a.offer_summary, "No offer summary information provided.");
        assert_eq!(a.benchmark_assessment, "No benchmark assessment information provided.");
        assert_eq!(a.strengths, "No strengths information provided.");
        assert_eq!(a.negotiation_opportunities, "No negotiation opportunities information provided.");
        assert_eq!(a.suggested_strategy, "No suggested strategy information provided.");
        assert_eq!(a.risks_considerations, "No risks / things to consider information provided.");
        assert_eq!(a.extracted_info.confidence, Confidence::Low);
    }

    #[tokio::test]
    async fn test_provider_error_is_external_service_error() {
        let llm = FakeChat::failing(429, "rate limited");
        let err = analyze_offer(payload("Offer: $80,000 base", "text"), &shipped_template_path(), &llm)
            .await
            .unwrap_err();

        match err {
            AppError::ExternalService(msg) => assert!(msg.contains("rate limited")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_is_no_content() {
        let llm = FakeChat::empty();
        let err = analyze_offer(payload("Offer: $80,000 base", "text"), &shipped_template_path(), &llm)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoContent));
    }

    #[tokio::test]
    async fn test_missing_template_fails_before_model_call() {
        let llm = FakeChat::replying("unused");
        let dir = tempfile::tempdir().unwrap();
        let err = analyze_offer(
            payload("Offer: $80,000 base", "text"),
            &dir.path().join("missing.md"),
            &llm,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Template(_)));
        assert_eq!(llm.call_count(), 0);
    }
}
