//! Shared checks for base64 file uploads sent as JSON.

use axum::{
    extract::rejection::JsonRejection,
    http::{header::CONTENT_LENGTH, HeaderMap, StatusCode},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::errors::AppError;

/// Upper bound on an upload request body, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const FILE_TOO_LARGE_MESSAGE: &str = "File too large. Please upload a PDF smaller than 10MB.";
pub const NO_FILE_DATA_MESSAGE: &str = "No file data provided";
pub const INVALID_FILE_MESSAGE: &str =
    "Invalid or corrupted PDF file. Please try a different file.";

/// Rejects requests whose declared `Content-Length` is over the limit.
/// Bodies without the header are bounded by the router's body limit instead.
pub fn check_content_length(headers: &HeaderMap) -> Result<(), AppError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    match declared {
        Some(len) if len > MAX_UPLOAD_BYTES as u64 => {
            Err(AppError::PayloadTooLarge(FILE_TOO_LARGE_MESSAGE.to_string()))
        }
        _ => Ok(()),
    }
}

/// Unwraps an upload body. Bodies cut off by the route's body limit (no
/// `Content-Length` to check up front) get the same message as declared ones.
pub fn upload_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(AppError::PayloadTooLarge(FILE_TOO_LARGE_MESSAGE.to_string()))
        }
        Err(rejection) => Err(rejection.into()),
    }
}

/// Decodes standard base64, accepting an optional `data:<mime>;base64,` prefix.
pub fn decode_file_data(file_data: Option<&str>) -> Result<Vec<u8>, AppError> {
    let raw = file_data
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(NO_FILE_DATA_MESSAGE.to_string()))?;
    let encoded = match raw.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => raw,
    };
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| AppError::Validation(INVALID_FILE_MESSAGE.to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation(NO_FILE_DATA_MESSAGE.to_string()));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_length(len: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_str(len).unwrap());
        headers
    }

    #[test]
    fn test_content_length_at_limit_is_accepted() {
        assert!(check_content_length(&headers_with_length(&MAX_UPLOAD_BYTES.to_string())).is_ok());
    }

    #[test]
    fn test_content_length_over_limit_is_rejected() {
        let over = (MAX_UPLOAD_BYTES + 1).to_string();
        let err = check_content_length(&headers_with_length(&over)).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(ref m) if m == FILE_TOO_LARGE_MESSAGE));
    }

    #[test]
    fn test_missing_content_length_is_accepted() {
        assert!(check_content_length(&HeaderMap::new()).is_ok());
    }

    #[test]
    fn test_upload_payload_passes_body_through() {
        let body = upload_payload(Ok(Json(42_u8))).unwrap();
        assert_eq!(body, 42);
    }

    #[test]
    fn test_decodes_plain_base64() {
        assert_eq!(decode_file_data(Some("JVBERi0xLjQ=")).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_decodes_data_url() {
        let bytes = decode_file_data(Some("data:application/pdf;base64,JVBERi0xLjQ=")).unwrap();
        assert_eq!(bytes, b"%PDF-1.4");
    }

    #[test]
    fn test_missing_data_is_validation_error() {
        for input in [None, Some(""), Some("   ")] {
            let err = decode_file_data(input).unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == NO_FILE_DATA_MESSAGE));
        }
    }

    #[test]
    fn test_garbage_is_invalid_file() {
        let err = decode_file_data(Some("not base64 at all!")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == INVALID_FILE_MESSAGE));
    }
}
