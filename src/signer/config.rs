//! Credential configuration for VenueX signers

use super::{
    BearerConfig, BearerSigner, HmacConfig, HmacSigner, JwtConfig, JwtSigner, Signer,
};
use crate::error::{Result, VenueXError};
use std::str::FromStr;

/// Authentication scheme of a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// HMAC-SHA256 with API key, secret and passphrase
    Hmac,
    /// ES256 JWT with a named EC key
    Jwt,
    /// Static bearer token
    Bearer,
    /// Externally delegated MPC signing
    Mpc,
}

impl FromStr for AuthScheme {
    type Err = VenueXError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hmac" => Ok(AuthScheme::Hmac),
            "jwt" => Ok(AuthScheme::Jwt),
            "bearer" => Ok(AuthScheme::Bearer),
            "mpc" => Ok(AuthScheme::Mpc),
            _ => Err(VenueXError::config(
                "Invalid auth scheme. Use 'hmac', 'jwt', 'bearer' or 'mpc'",
            )),
        }
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthScheme::Hmac => write!(f, "hmac"),
            AuthScheme::Jwt => write!(f, "jwt"),
            AuthScheme::Bearer => write!(f, "bearer"),
            AuthScheme::Mpc => write!(f, "mpc"),
        }
    }
}

/// Credentials that can be loaded from configuration.
///
/// MPC credentials are not representable here because the signing function
/// has to be supplied in code; build an [`super::MpcSigner`] directly.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// HMAC credentials
    Hmac(HmacConfig),
    /// JWT credentials
    Jwt(JwtConfig),
    /// Bearer token
    Bearer(BearerConfig),
}

impl Credentials {
    /// Scheme these credentials authenticate with
    pub fn scheme(&self) -> AuthScheme {
        match self {
            Credentials::Hmac(_) => AuthScheme::Hmac,
            Credentials::Jwt(_) => AuthScheme::Jwt,
            Credentials::Bearer(_) => AuthScheme::Bearer,
        }
    }

    /// Validate the credentials and build the matching signer
    pub fn into_signer(self) -> Result<Box<dyn Signer>> {
        let signer: Box<dyn Signer> = match self {
            Credentials::Hmac(config) => Box::new(HmacSigner::new(config)?),
            Credentials::Jwt(config) => Box::new(JwtSigner::new(config)?),
            Credentials::Bearer(config) => Box::new(BearerSigner::new(config)?),
        };
        Ok(signer)
    }

    /// Load credentials from environment variables.
    ///
    /// With `prefix = "COINBASE"` the following sets are tried in order and
    /// the first complete one wins:
    ///
    /// * `COINBASE_API_KEY`, `COINBASE_API_SECRET`, `COINBASE_PASSPHRASE`
    /// * `COINBASE_KEY_NAME`, `COINBASE_PRIVATE_KEY` (`COINBASE_JWT_EXPIRES_IN` optional)
    /// * `COINBASE_BEARER_TOKEN`
    ///
    /// Setting `COINBASE_AUTH_SCHEME` restricts loading to that scheme.
    pub fn from_env(prefix: &str) -> Result<Self> {
        let var = |name: &str| {
            std::env::var(format!("{}_{}", prefix, name))
                .ok()
                .filter(|v| !v.is_empty())
        };

        let forced = var("AUTH_SCHEME").map(|s| s.parse::<AuthScheme>()).transpose()?;
        let wants = |scheme: AuthScheme| forced.map_or(true, |f| f == scheme);

        if wants(AuthScheme::Hmac) {
            if let (Some(key), Some(secret), Some(passphrase)) =
                (var("API_KEY"), var("API_SECRET"), var("PASSPHRASE"))
            {
                return Ok(Credentials::Hmac(HmacConfig::new(key, secret, passphrase)));
            }
        }

        if wants(AuthScheme::Jwt) {
            if let (Some(key_name), Some(private_key)) = (var("KEY_NAME"), var("PRIVATE_KEY")) {
                let mut config = JwtConfig::new(key_name, private_key);
                if let Some(expires_in) = var("JWT_EXPIRES_IN") {
                    config.expires_in = expires_in.parse().map_err(|_| {
                        VenueXError::config(format!(
                            "{}_JWT_EXPIRES_IN must be an integer number of seconds",
                            prefix
                        ))
                    })?;
                }
                return Ok(Credentials::Jwt(config));
            }
        }

        if wants(AuthScheme::Bearer) {
            if let Some(token) = var("BEARER_TOKEN") {
                return Ok(Credentials::Bearer(BearerConfig::new(token)));
            }
        }

        Err(VenueXError::config(format!(
            "no complete credential set found for prefix {}",
            prefix
        )))
    }
}
