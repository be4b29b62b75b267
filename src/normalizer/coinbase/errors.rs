use super::VENUE_ID;
use crate::error::{VenueError, VenueErrorKind};
use crate::normalizer::classify::{ErrorPolicy, CLIENT_ERROR_KEYWORDS};
use crate::normalizer::common::null_as_default;
use serde::Deserialize;
use tracing::warn;

/// Classification settings for Advanced Trade
pub const COINBASE_ERROR_POLICY: ErrorPolicy = ErrorPolicy::new(VENUE_ID, CLIENT_ERROR_KEYWORDS);

#[derive(Debug, Default, Deserialize)]
struct CoinbaseError {
    #[serde(default, deserialize_with = "null_as_default")]
    error: String,
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    error_details: String,
    #[serde(default, deserialize_with = "null_as_default")]
    preview_failure_reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    new_order_failure_reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    edit_failure_reason: String,
}

impl CoinbaseError {
    /// `coinbase api error: ERR (message) [details; preview: ..; order: ..; edit: ..]`
    fn format_message(&self) -> String {
        let mut msg = String::from("coinbase api error");

        match (self.error.is_empty(), self.message.is_empty()) {
            (false, false) => msg.push_str(&format!(": {} ({})", self.error, self.message)),
            (false, true) => msg.push_str(&format!(": {}", self.error)),
            (true, false) => msg.push_str(&format!(": {}", self.message)),
            (true, true) => {}
        }

        let details: Vec<String> = [
            ("", &self.error_details),
            ("preview: ", &self.preview_failure_reason),
            ("order: ", &self.new_order_failure_reason),
            ("edit: ", &self.edit_failure_reason),
        ]
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{}{}", label, value))
        .collect();

        if !details.is_empty() {
            msg.push_str(&format!(" [{}]", details.join("; ")));
        }
        msg
    }

    /// Text searched for client error keywords
    fn classification_text(&self) -> String {
        format!("{} {} {}", self.error, self.message, self.error_details)
    }
}

fn code_label(status: u16, kind: VenueErrorKind) -> &'static str {
    match (status, kind) {
        (401 | 403, _) => "AUTH_FAILURE",
        (429, _) => "RATE_LIMIT",
        (400, VenueErrorKind::Permanent) => "INVALID_REQUEST",
        (400, _) => "BAD_REQUEST",
        (404, _) => "NOT_FOUND",
        (500 | 502 | 503 | 504, _) => "SERVER_ERROR",
        _ => "UNKNOWN",
    }
}

pub(super) fn normalize_error(status: u16, body: &[u8]) -> VenueError {
    let policy = COINBASE_ERROR_POLICY;

    let parsed = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<CoinbaseError>(body)
            .map_err(|e| warn!(venue = VENUE_ID, status, error = %e, "unparseable error body"))
            .ok()
    };

    let error = match parsed {
        Some(cb) => {
            let kind = policy.classify(status, &cb.classification_text());
            VenueError::new(
                VENUE_ID,
                kind,
                status,
                format!("{} (status: {})", cb.format_message(), status),
            )
            .with_raw_body(String::from_utf8_lossy(body))
        }
        None => policy.unparsed(status, body),
    };

    let code = code_label(status, error.kind);
    error.with_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let cases = [
            (401, VenueErrorKind::Permanent, "AUTH_FAILURE"),
            (403, VenueErrorKind::Permanent, "AUTH_FAILURE"),
            (404, VenueErrorKind::Permanent, "NOT_FOUND"),
            (429, VenueErrorKind::RateLimit, "RATE_LIMIT"),
            (500, VenueErrorKind::Temporary, "SERVER_ERROR"),
            (504, VenueErrorKind::Temporary, "SERVER_ERROR"),
            (418, VenueErrorKind::Temporary, "UNKNOWN"),
        ];
        for (status, kind, code) in cases {
            let err = normalize_error(status, br#"{"error": "X", "message": "y"}"#);
            assert_eq!(err.kind, kind, "status {}", status);
            assert_eq!(err.code.as_deref(), Some(code), "status {}", status);
            assert_eq!(err.status, status);
            assert_eq!(err.venue, "coinbase");
        }
    }

    #[test]
    fn test_client_error_keywords() {
        let err = normalize_error(
            400,
            include_bytes!("../../../testdata/coinbase/error_insufficient.json"),
        );
        assert!(err.is_permanent());
        assert_eq!(err.code.as_deref(), Some("INVALID_REQUEST"));
        assert_eq!(
            err.message,
            "coinbase api error: INVALID_ARGUMENT (Insufficient balance in source account) \
             [account 8bfc20d7 has 0.1 BTC available; preview: PREVIEW_INSUFFICIENT_FUND; \
             order: INSUFFICIENT_FUND] (status: 400)"
        );

        let err = normalize_error(400, br#"{"message": "missing required field"}"#);
        assert!(err.is_permanent());

        let err = normalize_error(400, br#"{"message": "try again later"}"#);
        assert_eq!(err.kind, VenueErrorKind::Temporary);
        assert_eq!(err.code.as_deref(), Some("BAD_REQUEST"));
    }

    #[test]
    fn test_message_formats() {
        let only_message = CoinbaseError {
            message: "boom".into(),
            ..Default::default()
        };
        assert_eq!(only_message.format_message(), "coinbase api error: boom");

        let only_edit = CoinbaseError {
            error: "E".into(),
            edit_failure_reason: "EDIT_TOO_LATE".into(),
            ..Default::default()
        };
        assert_eq!(
            only_edit.format_message(),
            "coinbase api error: E [edit: EDIT_TOO_LATE]"
        );

        assert_eq!(CoinbaseError::default().format_message(), "coinbase api error");
    }

    #[test]
    fn test_unreadable_bodies() {
        let err = normalize_error(503, b"");
        assert_eq!(err.kind, VenueErrorKind::Temporary);
        assert_eq!(err.message, "coinbase api error: status 503 (no body)");
        assert_eq!(err.code.as_deref(), Some("SERVER_ERROR"));

        let err = normalize_error(400, b"<html>Invalid request</html>");
        assert_eq!(err.kind, VenueErrorKind::Permanent);
        assert_eq!(err.raw_body, "<html>Invalid request</html>");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_null_fields_keep_structured_message() {
        let err = normalize_error(
            400,
            br#"{"error": "UNKNOWN_FAILURE_REASON", "message": "order rejected", "error_details": null}"#,
        );
        assert_eq!(err.kind, VenueErrorKind::Temporary);
        assert_eq!(err.code.as_deref(), Some("BAD_REQUEST"));
        assert_eq!(
            err.message,
            "coinbase api error: UNKNOWN_FAILURE_REASON (order rejected) (status: 400)"
        );

        // failure reasons are reported but never classified
        let err = normalize_error(
            400,
            br#"{"error": "UNKNOWN_FAILURE_REASON", "message": "order rejected", "error_details": null, "new_order_failure_reason": "INSUFFICIENT_FUND"}"#,
        );
        assert_eq!(err.kind, VenueErrorKind::Temporary);
        assert_eq!(
            err.message,
            "coinbase api error: UNKNOWN_FAILURE_REASON (order rejected) [order: INSUFFICIENT_FUND] (status: 400)"
        );
    }
}
