//! Error types for the VenueX SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for VenueX operations
pub type Result<T> = std::result::Result<T, VenueXError>;

/// Boxed error returned by externally supplied collaborators (e.g. MPC signing functions)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Retry classification of an error reported by a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VenueErrorKind {
    /// Client-caused failure, retrying the same request will not help
    Permanent,
    /// Server-side failure, a retry may succeed
    Temporary,
    /// Temporary failure that additionally requires backing off
    RateLimit,
}

impl VenueErrorKind {
    /// Whether a request failing with this kind may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, VenueErrorKind::Temporary | VenueErrorKind::RateLimit)
    }

    /// Whether the caller must back off before retrying
    pub fn requires_backoff(&self) -> bool {
        matches!(self, VenueErrorKind::RateLimit)
    }
}

impl std::fmt::Display for VenueErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VenueErrorKind::Permanent => write!(f, "permanent"),
            VenueErrorKind::Temporary => write!(f, "temporary"),
            VenueErrorKind::RateLimit => write!(f, "rate_limit"),
        }
    }
}

/// A classified error response from a trading venue
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{venue} {kind} error (HTTP {status}): {message}")]
pub struct VenueError {
    /// Venue that produced the error (e.g. "coinbase")
    pub venue: String,
    /// Retry classification
    pub kind: VenueErrorKind,
    /// HTTP status code of the response
    pub status: u16,
    /// Venue or SDK error code, when one could be determined
    pub code: Option<String>,
    /// Human readable message
    pub message: String,
    /// Raw response body, kept for debugging
    pub raw_body: String,
}

impl VenueError {
    /// Create a new venue error
    pub fn new(
        venue: impl Into<String>,
        kind: VenueErrorKind,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self {
            venue: venue.into(),
            kind,
            status,
            code: None,
            message: message.into(),
            raw_body: String::new(),
        }
    }

    /// Attach an error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the raw response body
    pub fn with_raw_body(mut self, raw_body: impl Into<String>) -> Self {
        self.raw_body = raw_body.into();
        self
    }

    /// Whether the failed request may be retried
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Whether the failure is client-caused
    pub fn is_permanent(&self) -> bool {
        self.kind == VenueErrorKind::Permanent
    }

    /// Whether the venue asked the caller to back off
    pub fn is_rate_limit(&self) -> bool {
        self.kind == VenueErrorKind::RateLimit
    }
}

/// Main error type for VenueX SDK operations
#[derive(Error, Debug)]
pub enum VenueXError {
    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (missing or invalid credentials)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sign-time failures
    #[error("{message}")]
    Signing {
        /// What failed
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxError>,
    },

    /// A venue response could not be read
    #[error("Parse error: {0}")]
    Parse(String),

    /// Classified error reported by a venue
    #[error(transparent)]
    Venue(#[from] VenueError),

    /// Invalid parameter errors
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Order/market not found errors
    #[error("Not found: {0}")]
    NotFound(String),
}

impl VenueXError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new signing error without an underlying cause
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new signing error wrapping its cause
    pub fn signing_with_source(message: impl Into<String>, source: BoxError) -> Self {
        Self::Signing {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// The classified venue error, if this is one
    pub fn venue_error(&self) -> Option<&VenueError> {
        match self {
            Self::Venue(e) => Some(e),
            _ => None,
        }
    }

    /// Whether this is a local parse failure rather than a venue-reported error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Json(_))
    }

    /// Whether the operation may be retried. Only venue errors carry a retry decision.
    pub fn is_retryable(&self) -> bool {
        self.venue_error().map(VenueError::is_retryable).unwrap_or(false)
    }

    /// Whether the venue asked the caller to back off
    pub fn is_rate_limit(&self) -> bool {
        self.venue_error().map(VenueError::is_rate_limit).unwrap_or(false)
    }
}
