use super::VENUE_ID;
use crate::error::{Result, VenueXError};
use crate::normalizer::common::{
    decimal_from_value, decode_list_or_single, non_empty, parse_timestamp, TRADE_SIDE_SYNONYMS,
};
use crate::types::Trade;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Market data trade; price and size may be strings or numbers
#[derive(Debug, Deserialize)]
struct PrimeTrade {
    trade_id: Option<String>,
    product_id: Option<String>,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    size: Value,
    side: Option<String>,
    time: Option<String>,
}

fn to_trade(prime: PrimeTrade) -> Result<Trade> {
    let timestamp = parse_timestamp(prime.time.as_deref().unwrap_or_default())
        .map_err(|e| VenueXError::parse(format!("invalid trade time: {}", e)))?;
    let price = decimal_from_value(&prime.price)?;
    let quantity = decimal_from_value(&prime.size)?;

    Ok(Trade {
        trade_id: non_empty(prime.trade_id.as_deref()),
        venue_id: Some(VENUE_ID.to_string()),
        venue_symbol: non_empty(prime.product_id.as_deref()),
        timestamp,
        price: Some(price),
        quantity: Some(quantity),
        side: Some(TRADE_SIDE_SYNONYMS.lookup(prime.side.as_deref().unwrap_or_default())),
        value: Some(price * quantity),
    })
}

pub(super) fn normalize_trade(raw: &[u8]) -> Result<Trade> {
    decode_list_or_single::<PrimeTrade>(raw, "prime", "trade", "trades")?
        .into_iter()
        .next()
        .ok_or_else(|| VenueXError::parse("prime trades response contains no trades"))
        .and_then(to_trade)
}

/// Normalize every trade in a trades response, skipping entries that fail
pub fn normalize_trades(raw: &[u8]) -> Result<Vec<Trade>> {
    let trades: Vec<PrimeTrade> = decode_list_or_single(raw, "prime", "trades", "trades")?;

    Ok(trades
        .into_iter()
        .filter_map(|prime| {
            let trade_id = prime.trade_id.clone();
            to_trade(prime)
                .map_err(|e| warn!(venue = VENUE_ID, trade_id = ?trade_id, error = %e, "skipping trade"))
                .ok()
        })
        .collect())
}
