use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::{ChatCompletion, CredentialTier};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Model client billed to the free assessment credential.
    pub free_llm: Arc<dyn ChatCompletion>,
    /// Model client billed to the paid customer credential.
    pub paid_llm: Arc<dyn ChatCompletion>,
}

impl AppState {
    pub fn llm(&self, tier: CredentialTier) -> Arc<dyn ChatCompletion> {
        match tier {
            CredentialTier::Free => Arc::clone(&self.free_llm),
            CredentialTier::Paid => Arc::clone(&self.paid_llm),
        }
    }
}
