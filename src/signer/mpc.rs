//! MPC-delegated signing (custody APIs)
//!
//! The signer only builds the message envelope. The signature itself comes
//! from an injected [`MessageSigner`], normally a client for a distributed
//! custody service.

use super::{unix_millis, SignRequest, SignResult, Signer};
use crate::error::{BoxError, Result, VenueXError};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

/// API key header
pub const HEADER_API_KEY: &str = "X-API-KEY";
/// Timestamp header
pub const HEADER_TIMESTAMP: &str = "X-TIMESTAMP";
/// Signature header
pub const HEADER_SIGNATURE: &str = "X-SIGNATURE";

/// External signing function used by [`MpcSigner`].
///
/// Cancellation is the implementor's business: dropping the returned future
/// is the only cancellation signal the signer sends.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Sign `message` and return the encoded signature
    async fn sign_message(&self, message: &[u8]) -> std::result::Result<String, BoxError>;
}

/// Adapts an async closure to [`MessageSigner`]
pub struct FnMessageSigner<F> {
    func: F,
}

impl<F> FnMessageSigner<F>
where
    F: Fn(Vec<u8>) -> BoxFuture<'static, std::result::Result<String, BoxError>> + Send + Sync,
{
    /// Wrap `func`
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> MessageSigner for FnMessageSigner<F>
where
    F: Fn(Vec<u8>) -> BoxFuture<'static, std::result::Result<String, BoxError>> + Send + Sync,
{
    async fn sign_message(&self, message: &[u8]) -> std::result::Result<String, BoxError> {
        (self.func)(message.to_vec()).await
    }
}

/// Deterministic stand-in for a custody service: hex SHA-256 of the message.
/// Not a real signature; for tests and local development only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256MessageSigner;

#[async_trait]
impl MessageSigner for Sha256MessageSigner {
    async fn sign_message(&self, message: &[u8]) -> std::result::Result<String, BoxError> {
        Ok(hex::encode(Sha256::digest(message)))
    }
}

/// Configuration for [`MpcSigner`]
#[derive(Clone, Default)]
pub struct MpcConfig {
    /// API key identifier
    pub api_key: String,
    /// External signing function
    pub signer: Option<Arc<dyn MessageSigner>>,
}

impl MpcConfig {
    /// Create a new MPC configuration
    pub fn new(api_key: impl Into<String>, signer: Arc<dyn MessageSigner>) -> Self {
        Self {
            api_key: api_key.into(),
            signer: Some(signer),
        }
    }
}

impl std::fmt::Debug for MpcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MpcConfig")
            .field("api_key", &self.api_key)
            .field("signer", &self.signer.is_some())
            .finish()
    }
}

/// Signs `timestamp + method + path + body` through an external signing function.
///
/// Timestamps are Unix milliseconds.
#[derive(Clone)]
pub struct MpcSigner {
    api_key: String,
    signer: Arc<dyn MessageSigner>,
}

impl std::fmt::Debug for MpcSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MpcSigner")
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl MpcSigner {
    /// Create a new MPC signer
    pub fn new(config: MpcConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(VenueXError::config("API key is required"));
        }
        let signer = config
            .signer
            .ok_or_else(|| VenueXError::config("MPC signing function is required"))?;

        Ok(Self {
            api_key: config.api_key,
            signer,
        })
    }
}

#[async_trait]
impl Signer for MpcSigner {
    async fn sign(&self, request: &SignRequest) -> Result<SignResult> {
        let timestamp = request.timestamp_or_else(unix_millis);
        let message = request.prehash(&timestamp);

        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| {
                warn!(method = %request.method, path = %request.path, error = %e, "MPC signing failed");
                VenueXError::signing_with_source("MPC signing failed", e)
            })?;

        debug!(method = %request.method, path = %request.path, "signed request via MPC");

        Ok(SignResult::new()
            .with_header(HEADER_API_KEY, self.api_key.as_str())
            .with_header(HEADER_TIMESTAMP, timestamp)
            .with_header(HEADER_SIGNATURE, signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::sync::Mutex;

    /// Records every message it is asked to sign
    #[derive(Default)]
    struct RecordingSigner {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageSigner for RecordingSigner {
        async fn sign_message(&self, message: &[u8]) -> std::result::Result<String, BoxError> {
            self.messages
                .lock()
                .unwrap()
                .push(String::from_utf8(message.to_vec()).unwrap());
            Ok("sig".to_string())
        }
    }

    #[tokio::test]
    async fn test_message_is_positional_concatenation() {
        let recorder = Arc::new(RecordingSigner::default());
        let signer = MpcSigner::new(MpcConfig::new("custody-key", recorder.clone())).unwrap();

        let req = SignRequest::new("POST", "/api/v1/orders")
            .with_body(r#"{"symbol":"BTC-USD"}"#)
            .with_timestamp("1234567890");
        let result = signer.sign(&req).await.unwrap();

        assert_eq!(
            *recorder.messages.lock().unwrap(),
            vec![r#"1234567890POST/api/v1/orders{"symbol":"BTC-USD"}"#.to_string()]
        );
        assert_eq!(result.header(HEADER_API_KEY), Some("custody-key"));
        assert_eq!(result.header(HEADER_TIMESTAMP), Some("1234567890"));
        assert_eq!(result.header(HEADER_SIGNATURE), Some("sig"));
    }

    #[tokio::test]
    async fn test_empty_and_absent_body_produce_same_message() {
        let recorder = Arc::new(RecordingSigner::default());
        let signer = MpcSigner::new(MpcConfig::new("k", recorder.clone())).unwrap();
        let absent = SignRequest::new("GET", "/wallets").with_timestamp("1");
        let empty = absent.clone().with_body(Vec::new());

        signer.sign(&absent).await.unwrap();
        signer.sign(&empty).await.unwrap();

        let messages = recorder.messages.lock().unwrap();
        assert_eq!(messages[0], messages[1]);
        assert_eq!(messages[0], "1GET/wallets");
    }

    #[tokio::test]
    async fn test_generates_millisecond_timestamp() {
        let signer = MpcSigner::new(MpcConfig::new("k", Arc::new(Sha256MessageSigner))).unwrap();
        let result = signer.sign(&SignRequest::new("GET", "/")).await.unwrap();
        let ts: i64 = result.header(HEADER_TIMESTAMP).unwrap().parse().unwrap();
        assert!(ts > 100_000_000_000);
        assert!((chrono::Utc::now().timestamp_millis() - ts).abs() < 5_000);
    }

    #[tokio::test]
    async fn test_sha256_stub_is_deterministic() {
        let signer = MpcSigner::new(MpcConfig::new("k", Arc::new(Sha256MessageSigner))).unwrap();
        let req = SignRequest::new("GET", "/orders").with_timestamp("1");
        let a = signer.sign(&req).await.unwrap();
        let b = signer.sign(&req).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.header(HEADER_SIGNATURE).unwrap(),
            hex::encode(Sha256::digest(b"1GET/orders"))
        );
    }

    #[tokio::test]
    async fn test_closure_signer() {
        let delegate = FnMessageSigner::new(|message: Vec<u8>| -> BoxFuture<'static, _> {
            Box::pin(async move { Ok(format!("len={}", message.len())) })
        });
        let signer = MpcSigner::new(MpcConfig::new("k", Arc::new(delegate))).unwrap();
        let result = signer
            .sign(&SignRequest::new("GET", "/x").with_timestamp("12"))
            .await
            .unwrap();
        assert_eq!(result.header(HEADER_SIGNATURE), Some("len=7"));
    }

    #[tokio::test]
    async fn test_delegate_failure_is_wrapped() {
        let delegate = FnMessageSigner::new(|_: Vec<u8>| -> BoxFuture<'static, _> {
            Box::pin(async { Err::<String, BoxError>("quorum not reached".into()) })
        });
        let signer = MpcSigner::new(MpcConfig::new("k", Arc::new(delegate))).unwrap();
        let err = signer.sign(&SignRequest::new("GET", "/")).await.unwrap_err();

        assert!(matches!(err, VenueXError::Signing { .. }));
        assert_eq!(err.to_string(), "MPC signing failed");
        assert_eq!(err.source().unwrap().to_string(), "quorum not reached");
    }

    #[test]
    fn test_invalid_config() {
        assert!(MpcSigner::new(MpcConfig::new("", Arc::new(Sha256MessageSigner))).is_err());
        let missing = MpcConfig {
            api_key: "k".to_string(),
            signer: None,
        };
        assert!(matches!(MpcSigner::new(missing), Err(VenueXError::Config(_))));
    }
}
