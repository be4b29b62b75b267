//! HMAC-SHA256 signing (Coinbase Exchange style API keys)

use super::{unix_seconds, SignRequest, SignResult, Signer};
use crate::error::{Result, VenueXError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ::hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// API key header
pub const HEADER_ACCESS_KEY: &str = "CB-ACCESS-KEY";
/// Signature header
pub const HEADER_ACCESS_SIGN: &str = "CB-ACCESS-SIGN";
/// Timestamp header
pub const HEADER_ACCESS_TIMESTAMP: &str = "CB-ACCESS-TIMESTAMP";
/// Passphrase header
pub const HEADER_ACCESS_PASSPHRASE: &str = "CB-ACCESS-PASSPHRASE";

/// Credentials for [`HmacSigner`]
#[derive(Debug, Clone, Default)]
pub struct HmacConfig {
    /// API key
    pub api_key: String,
    /// Base64-encoded API secret
    pub secret: String,
    /// API passphrase
    pub passphrase: String,
}

impl HmacConfig {
    /// Create a new HMAC configuration
    pub fn new(
        api_key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            passphrase: passphrase.into(),
        }
    }
}

/// Signs requests with HMAC-SHA256 over `timestamp + method + path + body`.
///
/// Timestamps are Unix seconds. Identical inputs always produce identical
/// signatures.
#[derive(Clone)]
pub struct HmacSigner {
    api_key: String,
    passphrase: String,
    key: Vec<u8>,
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl HmacSigner {
    /// Create a new HMAC signer, decoding the secret up front
    pub fn new(config: HmacConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(VenueXError::config("API key is required"));
        }
        if config.secret.is_empty() {
            return Err(VenueXError::config("API secret is required"));
        }
        if config.passphrase.is_empty() {
            return Err(VenueXError::config("passphrase is required"));
        }

        let key = BASE64
            .decode(config.secret.as_bytes())
            .map_err(|e| VenueXError::config(format!("Invalid base64 API secret: {}", e)))?;

        Ok(Self {
            api_key: config.api_key,
            passphrase: config.passphrase,
            key,
        })
    }

    /// Base64 HMAC-SHA256 of `message`
    fn compute_signature(&self, message: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| VenueXError::signing(format!("HMAC key rejected: {}", e)))?;
        mac.update(message.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl Signer for HmacSigner {
    async fn sign(&self, request: &SignRequest) -> Result<SignResult> {
        let timestamp = request.timestamp_or_else(unix_seconds);
        let signature = self.compute_signature(&request.prehash(&timestamp))?;

        debug!(method = %request.method, path = %request.path, "signed request with HMAC");

        Ok(SignResult::new()
            .with_header(HEADER_ACCESS_KEY, self.api_key.as_str())
            .with_header(HEADER_ACCESS_SIGN, signature)
            .with_header(HEADER_ACCESS_TIMESTAMP, timestamp)
            .with_header(HEADER_ACCESS_PASSPHRASE, self.passphrase.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_signer() -> HmacSigner {
        // base64("secret")
        HmacSigner::new(HmacConfig::new("test-key", "c2VjcmV0", "test-pass")).unwrap()
    }

    async fn signature_of(signer: &HmacSigner, request: &SignRequest) -> String {
        signer
            .sign(request)
            .await
            .unwrap()
            .header(HEADER_ACCESS_SIGN)
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_known_signature_vector() {
        let signer = create_test_signer();
        let req = SignRequest::new("GET", "/orders").with_timestamp("1234567890");
        let result = signer.sign(&req).await.unwrap();

        assert_eq!(
            result.header(HEADER_ACCESS_SIGN),
            Some("c0bz9rdYCiGfAsKzIyfvmtx6eU1fbWn3SVcwKIVqZM4=")
        );
        assert_eq!(result.header(HEADER_ACCESS_KEY), Some("test-key"));
        assert_eq!(result.header(HEADER_ACCESS_TIMESTAMP), Some("1234567890"));
        assert_eq!(result.header(HEADER_ACCESS_PASSPHRASE), Some("test-pass"));
        assert!(result.query_params.is_empty());
    }

    #[tokio::test]
    async fn test_signature_is_deterministic() {
        let signer = create_test_signer();
        let req = SignRequest::new("POST", "/orders")
            .with_body(r#"{"size":"1"}"#)
            .with_timestamp("1700000000");

        let first = signature_of(&signer, &req).await;
        for _ in 0..4 {
            assert_eq!(signature_of(&signer, &req).await, first);
        }
    }

    #[tokio::test]
    async fn test_empty_and_absent_body_sign_identically() {
        let signer = create_test_signer();
        let absent = SignRequest::new("GET", "/orders").with_timestamp("1234567890");
        let empty = absent.clone().with_body(Vec::new());
        assert_eq!(
            signature_of(&signer, &absent).await,
            signature_of(&signer, &empty).await
        );
    }

    #[tokio::test]
    async fn test_every_input_changes_signature() {
        let signer = create_test_signer();
        let base = SignRequest::new("POST", "/orders")
            .with_body("{}")
            .with_timestamp("1234567890");
        let base_sig = signature_of(&signer, &base).await;

        let mut other_method = base.clone();
        other_method.method = "PUT".to_string();
        let mut other_path = base.clone();
        other_path.path = "/fills".to_string();
        let other_ts = base.clone().with_timestamp("1234567891");
        let other_body = base.clone().with_body(r#"{"a":1}"#);

        for req in [other_method, other_path, other_ts, other_body] {
            assert_ne!(signature_of(&signer, &req).await, base_sig);
        }
    }

    #[tokio::test]
    async fn test_generates_seconds_timestamp() {
        let signer = create_test_signer();
        let result = signer.sign(&SignRequest::new("GET", "/orders")).await.unwrap();
        let ts: i64 = result.header(HEADER_ACCESS_TIMESTAMP).unwrap().parse().unwrap();
        let now = chrono::Utc::now().timestamp();
        assert!((now - ts).abs() <= 5);
    }

    #[test]
    fn test_invalid_config() {
        assert!(HmacSigner::new(HmacConfig::new("", "c2VjcmV0", "p")).is_err());
        assert!(HmacSigner::new(HmacConfig::new("k", "", "p")).is_err());
        assert!(HmacSigner::new(HmacConfig::new("k", "c2VjcmV0", "")).is_err());

        let err = HmacSigner::new(HmacConfig::new("k", "not base64!!", "p")).unwrap_err();
        assert!(matches!(err, VenueXError::Config(_)));
    }

    #[tokio::test]
    async fn test_concurrent_signing() {
        let signer = std::sync::Arc::new(create_test_signer());
        let req = SignRequest::new("GET", "/orders").with_timestamp("1234567890");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let signer = signer.clone();
                let req = req.clone();
                tokio::spawn(async move { signature_of(&signer, &req).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(
                handle.await.unwrap(),
                "c0bz9rdYCiGfAsKzIyfvmtx6eU1fbWn3SVcwKIVqZM4="
            );
        }
    }
}
