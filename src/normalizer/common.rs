//! Parsing helpers shared by every venue normalizer
//!
//! Timestamps, decimals, enum synonyms and order book levels all arrive in
//! several encodings depending on the venue and endpoint. These helpers fix
//! one precedence order for each so that venues agree on edge cases.

use crate::error::{Result, VenueXError};
use crate::types::{OrderBookLevel, OrderSide, OrderStatus, OrderType, TimeInForce, TradeSide};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Unix values below this are seconds
const SECONDS_LIMIT: i64 = 100_000_000_000;
/// Unix values below this (and at least [`SECONDS_LIMIT`]) are milliseconds
const MILLIS_LIMIT: i64 = 100_000_000_000_000;
/// Unix values below this (and at least [`MILLIS_LIMIT`]) are microseconds
const MICROS_LIMIT: i64 = 100_000_000_000_000_000;

/// Naive formats tried after RFC 3339, in order. All are interpreted as UTC.
const NAIVE_UTC_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%d %H:%M:%S",
];

/// Offset-carrying format tried last
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

fn is_blank(s: &str) -> bool {
    s.is_empty() || s == "null"
}

/// Optional leading '-' followed by at least one ASCII digit
fn is_numeric(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a venue timestamp.
///
/// * `""` and `"null"` (after trimming) yield `Ok(None)`.
/// * Integer strings are Unix time; the magnitude selects the unit:
///   below 1e11 seconds, below 1e14 milliseconds, below 1e17 microseconds.
/// * Anything else is tried as RFC 3339 and then a fixed list of ISO 8601
///   and SQL style layouts.
pub fn parse_timestamp(s: &str) -> Result<Option<DateTime<Utc>>> {
    let s = s.trim();
    if is_blank(s) {
        return Ok(None);
    }

    if is_numeric(s) {
        return parse_unix_timestamp(s).map(Some);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    for format in NAIVE_UTC_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Some(naive.and_utc()));
        }
    }

    if let Ok(dt) = DateTime::parse_from_str(s, OFFSET_FORMAT) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    Err(VenueXError::parse(format!("unable to parse timestamp: {:?}", s)))
}

fn parse_unix_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let n: i64 = s
        .parse()
        .map_err(|e| VenueXError::parse(format!("invalid unix timestamp {:?}: {}", s, e)))?;

    let parsed = if n < SECONDS_LIMIT {
        DateTime::<Utc>::from_timestamp(n, 0)
    } else if n < MILLIS_LIMIT {
        DateTime::<Utc>::from_timestamp_millis(n)
    } else if n < MICROS_LIMIT {
        DateTime::<Utc>::from_timestamp_micros(n)
    } else {
        return Err(VenueXError::parse(format!(
            "unix timestamp out of reasonable range: {}",
            n
        )));
    };

    parsed.ok_or_else(|| VenueXError::parse(format!("unix timestamp out of range: {}", n)))
}

/// Like [`parse_timestamp`], falling back to the current time on error or blank input
pub fn parse_timestamp_or_now(s: &str) -> DateTime<Utc> {
    parse_timestamp(s).ok().flatten().unwrap_or_else(Utc::now)
}

/// Parse a timestamp, treating unparseable input as absent
pub fn parse_timestamp_lenient(s: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(s).ok().flatten()
}

/// Parse a decimal string as `f64`.
///
/// `""` and `"null"` are zero. Scientific notation is accepted. NaN and
/// infinities are rejected.
pub fn parse_decimal(s: &str) -> Result<f64> {
    let s = s.trim();
    if is_blank(s) {
        return Ok(0.0);
    }

    let value: f64 = s
        .parse()
        .map_err(|e| VenueXError::parse(format!("invalid decimal {:?}: {}", s, e)))?;

    if !value.is_finite() {
        return Err(VenueXError::parse(format!(
            "invalid decimal {:?} (NaN or Inf)",
            s
        )));
    }
    Ok(value)
}

/// Like [`parse_decimal`], returning zero instead of an error
pub fn parse_decimal_or_zero(s: &str) -> f64 {
    parse_decimal(s).unwrap_or(0.0)
}

/// Decimal field that may be missing: blank or unparseable input is `None`
pub fn optional_decimal(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if is_blank(s) {
        return None;
    }
    parse_decimal(s).ok()
}

/// Format a decimal without exponent or trailing zeros
pub fn format_decimal(value: f64) -> String {
    // Display for f64 is the shortest round-trip representation, never exponential
    format!("{}", value)
}

/// Read a decimal from a JSON number or string. `null` is zero.
pub fn decimal_from_value(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| VenueXError::parse(format!("number {} is not representable", n))),
        Value::String(s) => parse_decimal(s),
        Value::Null => Ok(0.0),
        other => Err(VenueXError::parse(format!(
            "expected number or string, got {}",
            json_type_name(other)
        ))),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `Some(s)` unless `s` is empty
pub fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Canonical form used for synonym lookups: trimmed, lowercase, with `-` and
/// spaces replaced by `_`
pub fn normalize_enum_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

/// Fixed table mapping venue spellings to a canonical enum value.
///
/// Keys are stored in [`normalize_enum_key`] form. Misses return the table's
/// fallback, never an error.
#[derive(Debug, Clone, Copy)]
pub struct SynonymTable<T: 'static> {
    entries: &'static [(&'static str, T)],
    fallback: T,
}

impl<T: Copy + 'static> SynonymTable<T> {
    /// Create a table
    pub const fn new(entries: &'static [(&'static str, T)], fallback: T) -> Self {
        Self { entries, fallback }
    }

    /// Map a raw venue value, `None` when it is not in the table
    pub fn get(&self, raw: &str) -> Option<T> {
        let key = normalize_enum_key(raw);
        self.entries
            .iter()
            .find(|(synonym, _)| *synonym == key)
            .map(|(_, value)| *value)
    }

    /// Map a raw venue value
    pub fn lookup(&self, raw: &str) -> T {
        self.get(raw).unwrap_or(self.fallback)
    }
}

/// Order status synonyms common across venues
pub const ORDER_STATUS_SYNONYMS: SynonymTable<OrderStatus> = SynonymTable::new(
    &[
        ("open", OrderStatus::Open),
        ("new", OrderStatus::Open),
        ("active", OrderStatus::Open),
        ("pending", OrderStatus::Open),
        ("accepted", OrderStatus::Open),
        ("filled", OrderStatus::Filled),
        ("done", OrderStatus::Filled),
        ("closed", OrderStatus::Filled),
        ("complete", OrderStatus::Filled),
        ("cancelled", OrderStatus::Cancelled),
        ("canceled", OrderStatus::Cancelled),
        ("cancelled_by_user", OrderStatus::Cancelled),
        ("canceled_by_user", OrderStatus::Cancelled),
        ("rejected", OrderStatus::Rejected),
        ("failed", OrderStatus::Rejected),
        ("invalid", OrderStatus::Rejected),
        ("expired", OrderStatus::Rejected),
        ("partially_filled", OrderStatus::PartiallyFilled),
        ("partial", OrderStatus::PartiallyFilled),
        ("partial_fill", OrderStatus::PartiallyFilled),
        ("partially_filled_active", OrderStatus::PartiallyFilled),
    ],
    OrderStatus::Unspecified,
);

/// Order type synonyms common across venues
pub const ORDER_TYPE_SYNONYMS: SynonymTable<OrderType> = SynonymTable::new(
    &[
        ("limit", OrderType::Limit),
        ("market", OrderType::Market),
        ("stop", OrderType::StopLoss),
        ("stop_loss", OrderType::StopLoss),
        ("stop_market", OrderType::StopLoss),
        ("stop_limit", OrderType::StopLimit),
        ("stop_loss_limit", OrderType::StopLimit),
        ("trailing_stop", OrderType::TrailingStop),
        ("trailing_stop_loss", OrderType::TrailingStop),
        ("post_only", OrderType::PostOnly),
        ("maker_only", OrderType::PostOnly),
        ("ioc", OrderType::Ioc),
        ("immediate_or_cancel", OrderType::Ioc),
        ("fok", OrderType::Fok),
        ("fill_or_kill", OrderType::Fok),
        ("gtc", OrderType::Gtc),
        ("good_til_cancelled", OrderType::Gtc),
    ],
    OrderType::Unspecified,
);

/// Order side synonyms common across venues
pub const ORDER_SIDE_SYNONYMS: SynonymTable<OrderSide> = SynonymTable::new(
    &[
        ("buy", OrderSide::Buy),
        ("bid", OrderSide::Buy),
        ("sell", OrderSide::Sell),
        ("ask", OrderSide::Sell),
    ],
    OrderSide::Unspecified,
);

/// Trade aggressor side synonyms
pub const TRADE_SIDE_SYNONYMS: SynonymTable<TradeSide> = SynonymTable::new(
    &[
        ("buy", TradeSide::Buy),
        ("bid", TradeSide::Buy),
        ("sell", TradeSide::Sell),
        ("ask", TradeSide::Sell),
    ],
    TradeSide::Unspecified,
);

/// Time in force synonyms common across venues
pub const TIME_IN_FORCE_SYNONYMS: SynonymTable<TimeInForce> = SynonymTable::new(
    &[
        ("gtc", TimeInForce::Gtc),
        ("good_til_cancelled", TimeInForce::Gtc),
        ("good_til_canceled", TimeInForce::Gtc),
        ("good_till_cancelled", TimeInForce::Gtc),
        ("ioc", TimeInForce::Ioc),
        ("immediate_or_cancel", TimeInForce::Ioc),
        ("fok", TimeInForce::Fok),
        ("fill_or_kill", TimeInForce::Fok),
        ("gtd", TimeInForce::Gtd),
        ("good_til_date", TimeInForce::Gtd),
        ("good_til_time", TimeInForce::Gtd),
    ],
    TimeInForce::Unspecified,
);

/// Map an order status string using the common synonym table
pub fn parse_order_status(s: &str) -> OrderStatus {
    ORDER_STATUS_SYNONYMS.lookup(s)
}

/// Map an order type string using the common synonym table
pub fn parse_order_type(s: &str) -> OrderType {
    ORDER_TYPE_SYNONYMS.lookup(s)
}

/// Map an order side string using the common synonym table
pub fn parse_order_side(s: &str) -> OrderSide {
    ORDER_SIDE_SYNONYMS.lookup(s)
}

/// Map a time in force string using the common synonym table
pub fn parse_time_in_force(s: &str) -> TimeInForce {
    TIME_IN_FORCE_SYNONYMS.lookup(s)
}

/// Decode one level element that may be a JSON number or a numeric string
fn level_number(value: &Value, what: &str, index: usize) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            VenueXError::parse(format!("level {}: {} {} is not representable", index, what, n))
        }),
        Value::String(s) => Ok(parse_decimal_or_zero(s)),
        other => Err(VenueXError::parse(format!(
            "level {}: invalid {} type {}",
            index,
            what,
            json_type_name(other)
        ))),
    }
}

/// Convert `[[price, size], [price, size, count], ...]` arrays to levels.
///
/// Price and size may each be a JSON number or a string. A third element, if
/// present, is the order count. With `skip_empty`, levels whose price and
/// size are both zero are dropped.
pub fn parse_levels(levels: &[Vec<Value>], skip_empty: bool) -> Result<Vec<OrderBookLevel>> {
    let mut result = Vec::with_capacity(levels.len());

    for (i, level) in levels.iter().enumerate() {
        if level.len() < 2 {
            return Err(VenueXError::parse(format!(
                "level {}: expected at least 2 elements, got {}",
                i,
                level.len()
            )));
        }

        let price = level_number(&level[0], "price", i)?;
        let quantity = level_number(&level[1], "size", i)?;

        if skip_empty && price == 0.0 && quantity == 0.0 {
            continue;
        }

        let order_count = level.get(2).and_then(|count| match count {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let f = parse_decimal_or_zero(s);
                (f > 0.0).then_some(f as i64)
            }
            _ => None,
        });

        result.push(OrderBookLevel {
            price: Some(price),
            quantity: Some(quantity),
            order_count,
        });
    }

    Ok(result)
}

/// Parse one side of a book, naming the side in the error
pub(crate) fn parse_book_side(
    levels: &[Vec<Value>],
    skip_empty: bool,
    side: &str,
) -> Result<Vec<OrderBookLevel>> {
    parse_levels(levels, skip_empty).map_err(|e| match e {
        VenueXError::Parse(msg) => VenueXError::parse(format!("failed to parse {}: {}", side, msg)),
        other => other,
    })
}

/// Read an explicit JSON `null` as the field's default value.
///
/// Pair with `#[serde(default)]` so a missing key behaves the same.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reject empty input with a parse error naming the response kind
pub(crate) fn ensure_not_empty(raw: &[u8], kind: &str) -> Result<()> {
    if raw.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(VenueXError::parse(format!("empty {} response", kind)));
    }
    Ok(())
}

/// Deserialize a venue payload, mapping failures to a parse error
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    raw: &[u8],
    venue: &str,
    kind: &str,
) -> Result<T> {
    ensure_not_empty(raw, kind)?;
    serde_json::from_slice(raw)
        .map_err(|e| VenueXError::parse(format!("failed to parse {} {}: {}", venue, kind, e)))
}

/// Deserialize either `{"<key>": [...]}` or a single bare record
pub(crate) fn decode_list_or_single<T: serde::de::DeserializeOwned>(
    raw: &[u8],
    venue: &str,
    kind: &str,
    key: &str,
) -> Result<Vec<T>> {
    let mut value: Value = decode(raw, venue, kind)?;
    let parse_err =
        |e: serde_json::Error| VenueXError::parse(format!("failed to parse {} {}: {}", venue, kind, e));

    match value.get_mut(key).map(Value::take) {
        Some(list @ Value::Array(_)) => serde_json::from_value(list).map_err(parse_err),
        _ => serde_json::from_value(value).map(|one| vec![one]).map_err(parse_err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_year_2021() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_timestamp_blank() {
        assert_eq!(parse_timestamp("").unwrap(), None);
        assert_eq!(parse_timestamp("null").unwrap(), None);
        assert_eq!(parse_timestamp("   ").unwrap(), None);
        assert_eq!(parse_timestamp(" null ").unwrap(), None);
    }

    #[test]
    fn test_parse_timestamp_unix_units() {
        let expected = Some(new_year_2021());
        assert_eq!(parse_timestamp("1609459200").unwrap(), expected);
        assert_eq!(parse_timestamp("1609459200000").unwrap(), expected);
        assert_eq!(parse_timestamp("1609459200000000").unwrap(), expected);
        assert_eq!(parse_timestamp("2021-01-01T00:00:00Z").unwrap(), expected);
    }

    #[test]
    fn test_parse_timestamp_unix_sub_second() {
        let ts = parse_timestamp("1609459200123").unwrap().unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 123);
        let ts = parse_timestamp("1609459200123456").unwrap().unwrap();
        assert_eq!(ts.timestamp_subsec_micros(), 123456);
    }

    #[test]
    fn test_parse_timestamp_unix_out_of_range() {
        assert!(parse_timestamp("100000000000000000").is_err());
        assert!(parse_timestamp("99999999999999999999999").is_err());
        assert!(parse_timestamp("-").is_err());
    }

    #[test]
    fn test_parse_timestamp_negative_is_seconds() {
        let ts = parse_timestamp("-86400").unwrap().unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(1969, 12, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_calendar_formats() {
        let expected = Utc.with_ymd_and_hms(2023, 6, 15, 12, 30, 45).unwrap();
        for input in [
            "2023-06-15T12:30:45Z",
            "2023-06-15T12:30:45+00:00",
            "2023-06-15T14:30:45+02:00",
            "2023-06-15 12:30:45",
        ] {
            assert_eq!(parse_timestamp(input).unwrap(), Some(expected), "{}", input);
        }

        let millis = parse_timestamp("2023-06-15T12:30:45.123Z").unwrap().unwrap();
        assert_eq!(millis.timestamp_subsec_millis(), 123);
        let nanos = parse_timestamp("2023-06-15T12:30:45.123456789Z").unwrap().unwrap();
        assert_eq!(nanos.timestamp_subsec_nanos(), 123456789);
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("not a time").is_err());
        assert!(parse_timestamp("2023-13-45").is_err());
        assert!(matches!(parse_timestamp("yesterday"), Err(VenueXError::Parse(_))));
    }

    #[test]
    fn test_parse_timestamp_or_now() {
        let before = Utc::now();
        let ts = parse_timestamp_or_now("garbage");
        assert!(ts >= before);
        assert_eq!(parse_timestamp_or_now("1609459200"), new_year_2021());
        assert!(parse_timestamp_or_now("") >= before);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1.23e5").unwrap(), 123000.0);
        assert_eq!(parse_decimal("").unwrap(), 0.0);
        assert_eq!(parse_decimal("null").unwrap(), 0.0);
        assert_eq!(parse_decimal(" 42.5 ").unwrap(), 42.5);
        assert_eq!(parse_decimal("0.00000001").unwrap(), 0.00000001);
        assert_eq!(parse_decimal("-3").unwrap(), -3.0);
    }

    #[test]
    fn test_parse_decimal_rejects_non_finite() {
        for input in ["NaN", "nan", "Inf", "-Inf", "infinity", "1e400"] {
            assert!(parse_decimal(input).is_err(), "{}", input);
        }
        assert!(parse_decimal("abc").is_err());
        assert_eq!(parse_decimal_or_zero("abc"), 0.0);
        assert_eq!(parse_decimal_or_zero("NaN"), 0.0);
    }

    #[test]
    fn test_optional_decimal() {
        assert_eq!(optional_decimal(None), None);
        assert_eq!(optional_decimal(Some("")), None);
        assert_eq!(optional_decimal(Some("null")), None);
        assert_eq!(optional_decimal(Some("abc")), None);
        assert_eq!(optional_decimal(Some("0")), Some(0.0));
        assert_eq!(optional_decimal(Some("1.5")), Some(1.5));
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(123000.0), "123000");
        assert_eq!(format_decimal(0.00000001), "0.00000001");
        assert_eq!(format_decimal(1.5), "1.5");
    }

    #[test]
    fn test_decimal_from_value() {
        assert_eq!(decimal_from_value(&serde_json::json!(50000)).unwrap(), 50000.0);
        assert_eq!(decimal_from_value(&serde_json::json!("1.5")).unwrap(), 1.5);
        assert_eq!(decimal_from_value(&Value::Null).unwrap(), 0.0);
        assert!(decimal_from_value(&serde_json::json!([1])).is_err());
        assert!(decimal_from_value(&serde_json::json!("NaN")).is_err());
    }

    #[test]
    fn test_order_status_synonyms() {
        for input in ["open", "OPEN", "  open  ", "new", "pending", "Accepted"] {
            assert_eq!(parse_order_status(input), OrderStatus::Open, "{}", input);
        }
        assert_eq!(parse_order_status("partially-filled"), OrderStatus::PartiallyFilled);
        assert_eq!(parse_order_status("Partially Filled"), OrderStatus::PartiallyFilled);
        assert_eq!(parse_order_status("canceled"), OrderStatus::Cancelled);
        assert_eq!(parse_order_status("EXPIRED"), OrderStatus::Rejected);
        assert_eq!(parse_order_status("done"), OrderStatus::Filled);
        assert_eq!(parse_order_status("QUEUED_FOR_AUCTION"), OrderStatus::Unspecified);
        assert_eq!(parse_order_status(""), OrderStatus::Unspecified);
    }

    #[test]
    fn test_order_type_synonyms() {
        assert_eq!(parse_order_type("LIMIT"), OrderType::Limit);
        assert_eq!(parse_order_type("stop-market"), OrderType::StopLoss);
        assert_eq!(parse_order_type("stop_limit"), OrderType::StopLimit);
        assert_eq!(parse_order_type("Trailing Stop"), OrderType::TrailingStop);
        assert_eq!(parse_order_type("maker_only"), OrderType::PostOnly);
        assert_eq!(parse_order_type("fill_or_kill"), OrderType::Fok);
        assert_eq!(parse_order_type("TWAP"), OrderType::Unspecified);
    }

    #[test]
    fn test_side_and_tif_synonyms() {
        assert_eq!(parse_order_side("BUY"), OrderSide::Buy);
        assert_eq!(parse_order_side("ask"), OrderSide::Sell);
        assert_eq!(parse_order_side("short"), OrderSide::Unspecified);

        assert_eq!(parse_time_in_force("GOOD-TIL-CANCELED"), TimeInForce::Gtc);
        assert_eq!(parse_time_in_force("good_til_time"), TimeInForce::Gtd);
        assert_eq!(parse_time_in_force("ioc"), TimeInForce::Ioc);
        assert_eq!(parse_time_in_force("day"), TimeInForce::Unspecified);
    }

    #[test]
    fn test_synonym_table_get() {
        assert_eq!(ORDER_TYPE_SYNONYMS.get("market"), Some(OrderType::Market));
        assert_eq!(ORDER_TYPE_SYNONYMS.get("unknown"), None);
    }

    #[test]
    fn test_parse_levels_mixed_encodings() {
        let levels: Vec<Vec<Value>> =
            serde_json::from_str(r#"[[50000, 1.5], ["49990.5", "2"], ["49980", 0.1, 3], [1, "2", "4"]]"#)
                .unwrap();
        let parsed = parse_levels(&levels, false).unwrap();

        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[0], OrderBookLevel::new(50000.0, 1.5));
        assert_eq!(parsed[1].price, Some(49990.5));
        assert_eq!(parsed[1].quantity, Some(2.0));
        assert_eq!(parsed[2].order_count, Some(3));
        assert_eq!(parsed[3].order_count, Some(4));
    }

    #[test]
    fn test_parse_levels_skip_empty() {
        let levels: Vec<Vec<Value>> = serde_json::from_str(r#"[[0, 0], ["0", "0"], [1, 0]]"#).unwrap();
        assert_eq!(parse_levels(&levels, true).unwrap().len(), 1);
        assert_eq!(parse_levels(&levels, false).unwrap().len(), 3);
    }

    #[test]
    fn test_parse_levels_malformed() {
        let short: Vec<Vec<Value>> = serde_json::from_str(r#"[[50000]]"#).unwrap();
        assert!(parse_levels(&short, false).is_err());

        let bad_type: Vec<Vec<Value>> = serde_json::from_str(r#"[[true, 1]]"#).unwrap();
        assert!(matches!(parse_levels(&bad_type, false), Err(VenueXError::Parse(_))));

        assert!(parse_levels(&[], false).unwrap().is_empty());
    }

    #[test]
    fn test_book_side_error_names_side_once() {
        let short: Vec<Vec<Value>> = serde_json::from_str(r#"[[50000]]"#).unwrap();
        let err = parse_book_side(&short, false, "asks").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error: failed to parse asks: level 0: expected at least 2 elements, got 1"
        );
    }

    #[test]
    fn test_null_fields_read_as_default() {
        #[derive(serde::Deserialize)]
        struct Record {
            #[serde(default, deserialize_with = "null_as_default")]
            fee: f64,
            #[serde(default, deserialize_with = "null_as_default")]
            flag: bool,
            #[serde(default, deserialize_with = "null_as_default")]
            levels: Vec<Vec<Value>>,
            #[serde(default, deserialize_with = "null_as_default")]
            text: String,
        }

        let nulls: Record =
            serde_json::from_str(r#"{"fee": null, "flag": null, "levels": null, "text": null}"#).unwrap();
        assert_eq!(nulls.fee, 0.0);
        assert!(!nulls.flag);
        assert!(nulls.levels.is_empty());
        assert_eq!(nulls.text, "");

        let missing: Record = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.fee, 0.0);

        let set: Record = serde_json::from_str(r#"{"fee": 1.5, "flag": true, "text": "x"}"#).unwrap();
        assert_eq!(set.fee, 1.5);
        assert!(set.flag);
        assert_eq!(set.text, "x");

        assert!(serde_json::from_str::<Record>(r#"{"fee": "1.5"}"#).is_err());
    }

    #[test]
    fn test_decode_errors() {
        #[derive(serde::Deserialize)]
        struct Payload {
            #[allow(dead_code)]
            id: String,
        }

        let err = decode::<Payload>(b"", "coinbase", "order").err().unwrap();
        assert_eq!(err.to_string(), "Parse error: empty order response");

        let err = decode::<Payload>(b"{not json", "coinbase", "order").err().unwrap();
        assert!(err.to_string().contains("failed to parse coinbase order"));
    }

    #[test]
    fn test_decode_list_or_single() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Item {
            id: Option<String>,
        }

        let list: Vec<Item> =
            decode_list_or_single(br#"{"items": [{"id": "a"}, {"id": "b"}]}"#, "v", "item", "items")
                .unwrap();
        assert_eq!(list.len(), 2);

        let single: Vec<Item> = decode_list_or_single(br#"{"id": "c"}"#, "v", "item", "items").unwrap();
        assert_eq!(single, vec![Item { id: Some("c".to_string()) }]);

        let err = decode_list_or_single::<Item>(br#"{"items": [{"id": 5}]}"#, "v", "item", "items")
            .unwrap_err();
        assert!(err.to_string().contains("failed to parse v item"));
    }
}
