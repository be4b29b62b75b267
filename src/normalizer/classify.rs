//! HTTP error classification shared by venue normalizers

use crate::error::{VenueError, VenueErrorKind};

/// Text fragments that mark a 400 response as a client mistake
pub const CLIENT_ERROR_KEYWORDS: &[&str] = &[
    "invalid",
    "missing",
    "insufficient",
    "exceed",
    "too small",
    "too large",
    "not allowed",
    "unsupported",
    "duplicate",
    "malformed",
];

/// Venue-specific classification settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// Venue name carried into every [`VenueError`]
    pub venue: &'static str,
    /// Case-insensitive fragments that make a 400 permanent
    pub client_keywords: &'static [&'static str],
}

impl ErrorPolicy {
    /// Create a policy
    pub const fn new(venue: &'static str, client_keywords: &'static [&'static str]) -> Self {
        Self {
            venue,
            client_keywords,
        }
    }

    /// Whether `text` contains one of the client keywords
    pub fn is_client_error(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.client_keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
    }

    /// Map an HTTP status and the venue's error text to a kind
    pub fn classify(&self, status: u16, text: &str) -> VenueErrorKind {
        match status {
            401 | 403 | 404 => VenueErrorKind::Permanent,
            429 => VenueErrorKind::RateLimit,
            500 | 502 | 503 | 504 => VenueErrorKind::Temporary,
            400 if self.is_client_error(text) => VenueErrorKind::Permanent,
            _ => VenueErrorKind::Temporary,
        }
    }

    /// Error for a body that is empty or could not be decoded.
    ///
    /// Classification falls back to the raw text.
    pub fn unparsed(&self, status: u16, body: &[u8]) -> VenueError {
        let raw = String::from_utf8_lossy(body).into_owned();
        let message = if raw.trim().is_empty() {
            format!("{} api error: status {} (no body)", self.venue, status)
        } else {
            format!("{} api error: status {}: {}", self.venue, status, raw)
        };

        VenueError::new(self.venue, self.classify(status, &raw), status, message).with_raw_body(raw)
    }
}
