use super::VENUE_ID;
use crate::error::Result;
use crate::normalizer::common::{
    decode, non_empty, null_as_default, parse_book_side, parse_timestamp_or_now,
};
use crate::types::OrderBook;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Response of `/best_bid_ask` and `/product_book`
#[derive(Debug, Deserialize)]
struct CoinbaseOrderBook {
    #[serde(default, deserialize_with = "null_as_default")]
    pricebook: PriceBook,
    time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceBook {
    product_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    bids: Vec<Vec<Value>>,
    #[serde(default, deserialize_with = "null_as_default")]
    asks: Vec<Vec<Value>>,
    time: Option<String>,
}

pub(super) fn normalize_order_book(raw: &[u8]) -> Result<OrderBook> {
    let book: CoinbaseOrderBook = decode(raw, "coinbase", "orderbook")?;

    let time = book
        .time
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(book.pricebook.time.as_deref())
        .unwrap_or_default();

    let bids = parse_book_side(&book.pricebook.bids, false, "bids")?;
    let asks = parse_book_side(&book.pricebook.asks, false, "asks")?;

    debug!(
        venue = VENUE_ID,
        bids = bids.len(),
        asks = asks.len(),
        "normalized order book"
    );

    let book = OrderBook {
        venue_id: Some(VENUE_ID.to_string()),
        venue_symbol: non_empty(book.pricebook.product_id.as_deref()),
        timestamp: Some(parse_timestamp_or_now(time)),
        ..Default::default()
    };
    Ok(book.with_levels(bids, asks))
}
