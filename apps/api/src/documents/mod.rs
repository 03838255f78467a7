// Uploaded offer documents: size limits, base64 decoding, and the
// manual-input placeholder returned in place of PDF text extraction.

pub mod handlers;
pub mod upload;
