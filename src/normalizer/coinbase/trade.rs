use super::VENUE_ID;
use crate::error::{Result, VenueXError};
use crate::normalizer::common::{
    decode_list_or_single, non_empty, parse_decimal_or_zero, parse_timestamp, TRADE_SIDE_SYNONYMS,
};
use crate::types::Trade;
use serde::Deserialize;
use tracing::warn;

/// Public market trade; side is the taker's
#[derive(Debug, Deserialize)]
struct CoinbaseTrade {
    trade_id: Option<String>,
    product_id: Option<String>,
    price: Option<String>,
    size: Option<String>,
    time: Option<String>,
    side: Option<String>,
}

fn to_trade(cb: CoinbaseTrade) -> Result<Trade> {
    let timestamp = parse_timestamp(cb.time.as_deref().unwrap_or_default())
        .map_err(|e| VenueXError::parse(format!("invalid trade time: {}", e)))?;
    let price = parse_decimal_or_zero(cb.price.as_deref().unwrap_or_default());
    let quantity = parse_decimal_or_zero(cb.size.as_deref().unwrap_or_default());

    Ok(Trade {
        trade_id: non_empty(cb.trade_id.as_deref()),
        venue_id: Some(VENUE_ID.to_string()),
        venue_symbol: non_empty(cb.product_id.as_deref()),
        timestamp,
        price: Some(price),
        quantity: Some(quantity),
        side: Some(TRADE_SIDE_SYNONYMS.lookup(cb.side.as_deref().unwrap_or_default())),
        value: Some(price * quantity),
    })
}

pub(super) fn normalize_trade(raw: &[u8]) -> Result<Trade> {
    decode_list_or_single::<CoinbaseTrade>(raw, "coinbase", "trade", "trades")?
        .into_iter()
        .next()
        .ok_or_else(|| VenueXError::parse("coinbase trades response contains no trades"))
        .and_then(to_trade)
}

/// Normalize every trade in a market trades response.
///
/// Entries that fail to normalize are logged and skipped.
pub fn normalize_trades(raw: &[u8]) -> Result<Vec<Trade>> {
    let trades: Vec<CoinbaseTrade> = decode_list_or_single(raw, "coinbase", "trades", "trades")?;

    Ok(trades
        .into_iter()
        .filter_map(|cb| {
            let trade_id = cb.trade_id.clone();
            to_trade(cb)
                .map_err(|e| warn!(venue = VENUE_ID, trade_id = ?trade_id, error = %e, "skipping trade"))
                .ok()
        })
        .collect())
}
