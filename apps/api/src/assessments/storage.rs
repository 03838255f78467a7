use aws_sdk_s3::primitives::ByteStream;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessments::validation::sanitize_file_name;
use crate::errors::AppError;

pub fn object_key(assessment_id: Uuid, file_name: &str) -> String {
    format!(
        "assessment-files/{}/{}",
        assessment_id,
        sanitize_file_name(file_name)
    )
}

/// Uploads `bytes` under `key` and returns the key.
pub async fn put_file(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: String,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<String, AppError> {
    let size = bytes.len();
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    info!("Uploaded {size} bytes to s3://{bucket}/{key}");
    Ok(key)
}

/// Best-effort removal of an uploaded object. Failures are logged with the key
/// so the orphan can be cleaned up by hand.
pub async fn discard_file(s3: &aws_sdk_s3::Client, bucket: &str, key: &str) {
    match s3.delete_object().bucket(bucket).key(key).send().await {
        Ok(_) => info!("Removed unreferenced object s3://{bucket}/{key}"),
        Err(e) => warn!("Orphaned object s3://{bucket}/{key} could not be removed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::{test_state, FakeChat};

    #[test]
    fn test_object_key_is_scoped_to_assessment() {
        let id = Uuid::nil();
        assert_eq!(
            object_key(id, "Offer Letter.pdf"),
            "assessment-files/00000000-0000-0000-0000-000000000000/Offer_Letter.pdf"
        );
    }

    #[tokio::test]
    async fn test_discard_file_swallows_storage_errors() {
        let state = test_state(Arc::new(FakeChat::empty()), Arc::new(FakeChat::empty()));
        let key = object_key(Uuid::new_v4(), "offer.pdf");
        discard_file(&state.s3, &state.config.s3_bucket, &key).await;
    }

    #[test]
    fn test_object_key_cannot_escape_prefix() {
        let key = object_key(Uuid::nil(), "../../other/secret.pdf");
        assert!(key.ends_with("/secret.pdf"));
        assert!(!key.contains(".."));
    }
}
