use super::VENUE_ID;
use crate::error::VenueError;
use crate::normalizer::classify::ErrorPolicy;
use crate::normalizer::common::null_as_default;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Prime error codes that mark a client mistake, followed by the shared
/// text keywords
pub const PRIME_CLIENT_KEYWORDS: &[&str] = &[
    "invalid_argument",
    "invalid_product",
    "invalid_order",
    "invalid_order_id",
    "invalid_portfolio",
    "invalid_portfolio_id",
    "insufficient_funds",
    "order_not_found",
    "validation_error",
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

/// Classification settings for Prime
pub const PRIME_ERROR_POLICY: ErrorPolicy = ErrorPolicy::new(VENUE_ID, PRIME_CLIENT_KEYWORDS);

#[derive(Debug, Default, Deserialize)]
struct PrimeError {
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    code: String,
    details: Option<Map<String, Value>>,
}

impl PrimeError {
    /// `prime api error: CODE (message) [details: {...}]`
    fn format_message(&self) -> String {
        let mut msg = String::from("prime api error");

        match (self.code.is_empty(), self.message.is_empty()) {
            (false, false) => msg.push_str(&format!(": {} ({})", self.code, self.message)),
            (false, true) => msg.push_str(&format!(": {}", self.code)),
            (true, false) => msg.push_str(&format!(": {}", self.message)),
            (true, true) => {}
        }

        if let Some(details) = self.details.as_ref().filter(|d| !d.is_empty()) {
            if let Ok(json) = serde_json::to_string(details) {
                msg.push_str(&format!(" [details: {}]", json));
            }
        }
        msg
    }
}

pub(super) fn normalize_error(status: u16, body: &[u8]) -> VenueError {
    let policy = PRIME_ERROR_POLICY;

    if body.iter().all(u8::is_ascii_whitespace) {
        return policy.unparsed(status, body);
    }

    let prime: PrimeError = match serde_json::from_slice(body) {
        Ok(prime) => prime,
        Err(e) => {
            warn!(venue = VENUE_ID, status, error = %e, "unparseable error body");
            return policy.unparsed(status, body);
        }
    };

    let kind = policy.classify(status, &format!("{} {}", prime.code, prime.message));
    let error = VenueError::new(
        VENUE_ID,
        kind,
        status,
        format!("{} (status: {})", prime.format_message(), status),
    )
    .with_raw_body(String::from_utf8_lossy(body));

    if prime.code.is_empty() {
        error
    } else {
        error.with_code(prime.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VenueErrorKind;

    #[test]
    fn test_client_code_is_permanent() {
        let err = normalize_error(400, include_bytes!("../../../testdata/prime/error_invalid_order.json"));
        assert_eq!(err.kind, VenueErrorKind::Permanent);
        assert_eq!(err.code.as_deref(), Some("INVALID_ORDER"));
        assert_eq!(
            err.message,
            r#"prime api error: INVALID_ORDER (limit_price must be positive) [details: {"field":"limit_price"}] (status: 400)"#
        );
    }

    #[test]
    fn test_unknown_bad_request_is_temporary() {
        let err = normalize_error(400, br#"{"code": "UPSTREAM_TIMEOUT", "message": "try later"}"#);
        assert_eq!(err.kind, VenueErrorKind::Temporary);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        let body = br#"{"code": "X", "message": "y"}"#;
        assert_eq!(normalize_error(401, body).kind, VenueErrorKind::Permanent);
        assert_eq!(normalize_error(404, body).kind, VenueErrorKind::Permanent);
        assert_eq!(normalize_error(429, body).kind, VenueErrorKind::RateLimit);
        assert_eq!(normalize_error(502, body).kind, VenueErrorKind::Temporary);
        assert_eq!(normalize_error(504, body).kind, VenueErrorKind::Temporary);
    }

    #[test]
    fn test_message_without_code() {
        let err = normalize_error(500, br#"{"message": "internal"}"#);
        assert_eq!(err.code, None);
        assert_eq!(err.message, "prime api error: internal (status: 500)");
    }

    #[test]
    fn test_unreadable_bodies() {
        let err = normalize_error(429, b"");
        assert!(err.is_rate_limit());
        assert_eq!(err.message, "prime api error: status 429 (no body)");

        let err = normalize_error(400, b"Bad Request: missing portfolio");
        assert!(err.is_permanent());
        assert_eq!(err.raw_body, "Bad Request: missing portfolio");
    }

    #[test]
    fn test_null_code() {
        let err = normalize_error(400, br#"{"code": null, "message": "try later", "details": null}"#);
        assert_eq!(err.kind, VenueErrorKind::Temporary);
        assert_eq!(err.code, None);
        assert_eq!(err.message, "prime api error: try later (status: 400)");
    }
}
