//! Input normalization: decides whether submitted text is genuine offer content
//! before anything is sent to the model.

use crate::analysis::models::{AnalysisRequest, AnalyzeOfferPayload, InputType};
use crate::errors::AppError;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: offerInput, inputType";
pub const INVALID_INPUT_TYPE_MESSAGE: &str = "Invalid inputType. Must be \"text\" or \"file\"";
pub const PLACEHOLDER_MESSAGE: &str =
    "Please copy and paste the actual content from your offer letter. \
     Real offer details are required for the analysis.";

/// Instructional phrases produced by the upload flow (or copied from UI hints)
/// that mean the user has not supplied real offer content.
/// Matched as case-insensitive substrings.
pub const PLACEHOLDER_PHRASES: &[&str] = &[
    "PDF file",
    "received successfully",
    "copy and paste",
    "text content from your PDF",
    "best experience",
    "Please copy and paste",
    "upload your offer letter",
    "paste the content directly",
];

/// Returns true when `text` contains any known placeholder phrase.
pub fn is_placeholder_text(text: &str) -> bool {
    let text_lower = text.to_lowercase();
    PLACEHOLDER_PHRASES
        .iter()
        .any(|phrase| text_lower.contains(&phrase.to_lowercase()))
}

/// Validates and cleans a wire payload into an `AnalysisRequest`.
///
/// Rejects with `AppError::Validation` when:
/// - `offerInput` or `inputType` is missing or blank
/// - `inputType` is not `text` or `file`
/// - `offerInput` contains placeholder text
pub fn normalize_request(payload: AnalyzeOfferPayload) -> Result<AnalysisRequest, AppError> {
    let offer_input = payload
        .offer_input
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let input_type = payload
        .input_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (Some(offer_input), Some(input_type)) = (offer_input, input_type) else {
        return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    };

    let input_type = InputType::parse(input_type)
        .ok_or_else(|| AppError::Validation(INVALID_INPUT_TYPE_MESSAGE.to_string()))?;

    if is_placeholder_text(offer_input) {
        tracing::info!("Rejected analysis request containing placeholder text");
        return Err(AppError::Validation(PLACEHOLDER_MESSAGE.to_string()));
    }

    let file_name = match input_type {
        InputType::File => payload
            .file_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        InputType::Text => None,
    };

    Ok(AnalysisRequest {
        offer_input: offer_input.to_string(),
        input_type,
        file_name,
    })
}
