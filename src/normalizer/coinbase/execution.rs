use crate::error::{Result, VenueXError};
use crate::normalizer::common::{decode, non_empty, parse_decimal_or_zero, parse_timestamp};
use crate::types::{ExecutionReport, ExecutionType};
use serde::Deserialize;

/// Fill from `/orders/historical/fills`
#[derive(Debug, Deserialize)]
struct CoinbaseFill {
    entry_id: Option<String>,
    trade_id: Option<String>,
    order_id: Option<String>,
    trade_time: Option<String>,
    trade_type: Option<String>,
    price: Option<String>,
    size: Option<String>,
    commission: Option<String>,
    product_id: Option<String>,
    liquidity_indicator: Option<String>,
    side: Option<String>,
}

fn execution_type(trade_type: &str) -> ExecutionType {
    match trade_type {
        "FILL" => ExecutionType::Trade,
        _ => ExecutionType::Unspecified,
    }
}

pub(super) fn normalize_execution_report(raw: &[u8]) -> Result<ExecutionReport> {
    let fill: CoinbaseFill = decode(raw, "coinbase", "fill")?;

    let timestamp = parse_timestamp(fill.trade_time.as_deref().unwrap_or_default())
        .map_err(|e| VenueXError::parse(format!("invalid trade_time: {}", e)))?;

    let price = parse_decimal_or_zero(fill.price.as_deref().unwrap_or_default());
    let quantity = parse_decimal_or_zero(fill.size.as_deref().unwrap_or_default());
    let fee = parse_decimal_or_zero(fill.commission.as_deref().unwrap_or_default());
    let liquidity = non_empty(fill.liquidity_indicator.as_deref());
    let entry_id = non_empty(fill.entry_id.as_deref());
    let order_id = non_empty(fill.order_id.as_deref());

    Ok(ExecutionReport {
        execution_id: entry_id.clone(),
        venue_execution_id: entry_id,
        order_id: order_id.clone(),
        venue_order_id: order_id,
        client_order_id: None,
        venue_symbol: non_empty(fill.product_id.as_deref()),
        execution_type: Some(execution_type(fill.trade_type.as_deref().unwrap_or_default())),
        order_status: Some("FILLED".to_string()),
        side: non_empty(fill.side.as_deref()),
        timestamp,
        price: Some(price),
        quantity: Some(quantity),
        fee: Some(fee),
        value: Some(price * quantity),
        trade_id: non_empty(fill.trade_id.as_deref()),
        is_maker: Some(liquidity.as_deref() == Some("MAKER")),
        liquidity,
    })
}
