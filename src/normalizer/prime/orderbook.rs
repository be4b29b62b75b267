use super::VENUE_ID;
use crate::error::Result;
use crate::normalizer::common::{
    decode, non_empty, null_as_default, parse_book_side, parse_timestamp_or_now,
};
use crate::types::OrderBook;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct PrimeOrderBook {
    product_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    bids: Vec<Vec<Value>>,
    #[serde(default, deserialize_with = "null_as_default")]
    asks: Vec<Vec<Value>>,
    time: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    sequence: i64,
}

pub(super) fn normalize_order_book(raw: &[u8]) -> Result<OrderBook> {
    let prime: PrimeOrderBook = decode(raw, "prime", "orderbook")?;

    // Prime pads snapshots with [0, 0] levels
    let bids = parse_book_side(&prime.bids, true, "bids")?;
    let asks = parse_book_side(&prime.asks, true, "asks")?;

    let book = OrderBook {
        venue_id: Some(VENUE_ID.to_string()),
        venue_symbol: non_empty(prime.product_id.as_deref()),
        timestamp: Some(parse_timestamp_or_now(prime.time.as_deref().unwrap_or_default())),
        sequence: (prime.sequence > 0).then_some(prime.sequence),
        ..Default::default()
    };
    Ok(book.with_levels(bids, asks))
}
