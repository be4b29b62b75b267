use crate::error::{Result, VenueXError};
use crate::normalizer::common::{decode, non_empty, null_as_default, parse_timestamp};
use crate::types::{ExecutionReport, ExecutionType};
use serde::Deserialize;

/// Prime fill. Unlike the REST order shapes, amounts are JSON numbers.
#[derive(Debug, Deserialize)]
struct PrimeFill {
    fill_id: Option<String>,
    order_id: Option<String>,
    symbol: Option<String>,
    match_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    fill_price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    fill_qty: f64,
    client_order_id: Option<String>,
    side: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    fee: f64,
    order_status: Option<String>,
    event_time: Option<String>,
}

pub(super) fn normalize_execution_report(raw: &[u8]) -> Result<ExecutionReport> {
    let fill: PrimeFill = decode(raw, "prime", "fill")?;

    let timestamp = parse_timestamp(fill.event_time.as_deref().unwrap_or_default())
        .map_err(|e| VenueXError::parse(format!("invalid event_time: {}", e)))?;

    let fill_id = non_empty(fill.fill_id.as_deref());
    let order_id = non_empty(fill.order_id.as_deref());

    Ok(ExecutionReport {
        execution_id: fill_id.clone(),
        venue_execution_id: fill_id,
        order_id: order_id.clone(),
        venue_order_id: order_id,
        client_order_id: non_empty(fill.client_order_id.as_deref()),
        venue_symbol: non_empty(fill.symbol.as_deref()),
        execution_type: Some(ExecutionType::Fill),
        order_status: non_empty(fill.order_status.as_deref()),
        side: non_empty(fill.side.as_deref()),
        timestamp,
        price: Some(fill.fill_price),
        quantity: Some(fill.fill_qty),
        fee: Some(fill.fee),
        value: Some(fill.fill_price * fill.fill_qty),
        trade_id: non_empty(fill.match_id.as_deref()),
        // Prime does not report liquidity; treat fills as taker
        is_maker: Some(false),
        liquidity: None,
    })
}
