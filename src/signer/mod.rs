//! Request signing for venue APIs
//!
//! Every authentication scheme implements [`Signer`]: it receives a
//! [`SignRequest`] describing one outbound call and returns the headers and
//! query parameters that authenticate it. Signers hold only immutable
//! configuration validated at construction, so one instance can be shared
//! across any number of concurrent callers.

pub mod bearer;
pub mod config;
pub mod hmac;
pub mod jwt;
pub mod mpc;

pub use bearer::{BearerConfig, BearerSigner};
pub use config::Credentials;
pub use self::hmac::{HmacConfig, HmacSigner};
pub use jwt::{JwtConfig, JwtSigner};
pub use mpc::{FnMessageSigner, MessageSigner, MpcConfig, MpcSigner, Sha256MessageSigner};

use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HOST};
use std::borrow::Cow;
use std::collections::HashMap;

/// Produces authentication material for outbound requests
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign one request.
    ///
    /// Fails only on sign-time problems such as an MPC delegate error;
    /// credential problems are rejected when the signer is constructed.
    async fn sign(&self, request: &SignRequest) -> Result<SignResult>;
}

/// One outbound call to be authenticated
#[derive(Debug, Clone, Default)]
pub struct SignRequest {
    /// HTTP method (e.g. "GET")
    pub method: String,
    /// URL path without query string (e.g. "/api/v3/brokerage/orders")
    pub path: String,
    /// Raw request body. `None` and an empty body sign identically.
    pub body: Option<Vec<u8>>,
    /// Venue-formatted timestamp. Empty means the signer generates one.
    pub timestamp: String,
    /// Existing request headers, read-only
    pub headers: HeaderMap,
}

impl SignRequest {
    /// Create a request without body, timestamp or headers
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a fixed timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Set the existing request headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Body as text; absent and empty bodies both yield ""
    pub fn body_str(&self) -> Cow<'_, str> {
        match &self.body {
            Some(body) => String::from_utf8_lossy(body),
            None => Cow::Borrowed(""),
        }
    }

    /// Value of the `Host` header, if present and valid text
    pub fn host(&self) -> Option<&str> {
        self.headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|h| !h.is_empty())
    }

    /// The caller-supplied timestamp, or one produced by `generate`
    pub(crate) fn timestamp_or_else(&self, generate: impl FnOnce() -> String) -> String {
        if self.timestamp.is_empty() {
            generate()
        } else {
            self.timestamp.clone()
        }
    }

    /// Positional concatenation `timestamp + method + path + body` with no delimiters
    pub(crate) fn prehash(&self, timestamp: &str) -> String {
        format!("{}{}{}{}", timestamp, self.method, self.path, self.body_str())
    }
}

/// Authentication material produced by a [`Signer`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignResult {
    /// Headers to set on the request, overwriting same-named headers
    pub headers: HashMap<String, String>,
    /// Query parameters to merge into the request URL
    pub query_params: HashMap<String, String>,
}

impl SignResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Header value by exact name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Current Unix time in seconds as a decimal string
pub(crate) fn unix_seconds() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// Current Unix time in milliseconds as a decimal string
pub(crate) fn unix_millis() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
