//! ES256 JWT signing (Coinbase Advanced Trade / CDP API keys)
//!
//! Every request gets a short-lived token bound to its method, host and path:
//!
//! ```text
//! header  {"alg":"ES256","typ":"JWT","kid":<key name>,"nonce":<32 hex chars>}
//! claims  {"iss":"cdp","nbf":now,"exp":now+window,"sub":<key name>,"uri":"GET api.coinbase.com/path"}
//! ```

use super::{SignRequest, SignResult, Signer};
use crate::error::{Result, VenueXError};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use p256::ecdsa::{signature::Signer as _, Signature, SigningKey};
use p256::pkcs8::DecodePrivateKey;
use p256::SecretKey;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Token lifetime used when none is configured
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 120;
/// Host used in the `uri` claim when the request carries no `Host` header
pub const DEFAULT_HOST: &str = "api.coinbase.com";
/// Issuer claim
pub const ISSUER: &str = "cdp";

/// Credentials for [`JwtSigner`]
#[derive(Debug, Clone, Default)]
pub struct JwtConfig {
    /// Key name, used as `kid` and `sub`
    pub key_name: String,
    /// PEM encoded P-256 private key (PKCS#8 or SEC1)
    pub private_key: String,
    /// Token lifetime in seconds; zero or negative selects the default
    pub expires_in: i64,
}

impl JwtConfig {
    /// Create a configuration with the default token lifetime
    pub fn new(key_name: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            private_key: private_key.into(),
            expires_in: DEFAULT_EXPIRES_IN_SECS,
        }
    }

    /// Set the token lifetime in seconds
    pub fn with_expires_in(mut self, seconds: i64) -> Self {
        self.expires_in = seconds;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtHeader {
    alg: String,
    typ: String,
    kid: String,
    nonce: String,
}

/// Claims carried by every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Issuer, always "cdp"
    pub iss: String,
    /// Not before (Unix seconds)
    pub nbf: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
    /// Subject, the key name
    pub sub: String,
    /// `"{METHOD} {HOST}{PATH}"`
    pub uri: String,
}

/// Issues a fresh ES256 token per request
#[derive(Clone)]
pub struct JwtSigner {
    key_name: String,
    signing_key: SigningKey,
    expires_in: i64,
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("key_name", &self.key_name)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

impl JwtSigner {
    /// Create a new JWT signer, parsing the private key up front
    pub fn new(config: JwtConfig) -> Result<Self> {
        if config.key_name.is_empty() {
            return Err(VenueXError::config("key name is required"));
        }
        if config.private_key.trim().is_empty() {
            return Err(VenueXError::config("private key is required"));
        }

        let secret = parse_ec_private_key(&config.private_key)?;
        let expires_in = if config.expires_in > 0 {
            config.expires_in
        } else {
            DEFAULT_EXPIRES_IN_SECS
        };

        Ok(Self {
            key_name: config.key_name,
            signing_key: SigningKey::from(&secret),
            expires_in,
        })
    }

    /// Configured token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Build and sign a token for `uri` valid from `now`
    pub fn build_token(&self, uri: &str, now: i64) -> Result<String> {
        let header = JwtHeader {
            alg: "ES256".to_string(),
            typ: "JWT".to_string(),
            kid: self.key_name.clone(),
            nonce: generate_nonce(),
        };
        let claims = JwtClaims {
            iss: ISSUER.to_string(),
            nbf: now,
            exp: now + self.expires_in,
            sub: self.key_name.clone(),
            uri: uri.to_string(),
        };

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
        );
        let signature: Signature = self.signing_key.sign(signing_input.as_bytes());

        Ok(format!(
            "{}.{}",
            signing_input,
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        ))
    }
}

#[async_trait]
impl Signer for JwtSigner {
    async fn sign(&self, request: &SignRequest) -> Result<SignResult> {
        let host = request.host().unwrap_or(DEFAULT_HOST);
        let uri = format!("{} {}{}", request.method, host, request.path);
        let token = self.build_token(&uri, chrono::Utc::now().timestamp())?;

        debug!(uri = %uri, "signed request with ES256 JWT");

        Ok(SignResult::new().with_header("Authorization", format!("Bearer {}", token)))
    }
}

/// Parse a PEM P-256 key, accepting PKCS#8 ("PRIVATE KEY") and SEC1 ("EC PRIVATE KEY")
fn parse_ec_private_key(pem: &str) -> Result<SecretKey> {
    let pem = pem.trim();
    SecretKey::from_pkcs8_pem(pem)
        .or_else(|_| SecretKey::from_sec1_pem(pem))
        .map_err(|e| VenueXError::config(format!("failed to parse EC private key: {}", e)))
}

/// 16 random bytes, hex encoded
fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
