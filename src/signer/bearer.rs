//! Static bearer token authentication

use super::{SignRequest, SignResult, Signer};
use crate::error::{Result, VenueXError};
use async_trait::async_trait;

/// Credentials for [`BearerSigner`]
#[derive(Debug, Clone, Default)]
pub struct BearerConfig {
    /// Static API token
    pub token: String,
}

impl BearerConfig {
    /// Create a new bearer configuration
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

/// Sends the same `Authorization: Bearer <token>` header with every request
#[derive(Clone)]
pub struct BearerSigner {
    header_value: String,
}

impl std::fmt::Debug for BearerSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerSigner").finish_non_exhaustive()
    }
}

impl BearerSigner {
    /// Create a new bearer signer
    pub fn new(config: BearerConfig) -> Result<Self> {
        if config.token.is_empty() {
            return Err(VenueXError::config("bearer token is required"));
        }
        Ok(Self {
            header_value: format!("Bearer {}", config.token),
        })
    }
}

#[async_trait]
impl Signer for BearerSigner {
    async fn sign(&self, _request: &SignRequest) -> Result<SignResult> {
        Ok(SignResult::new().with_header("Authorization", self.header_value.as_str()))
    }
}
