use crate::error::{Result, VenueXError};
use crate::normalizer::common::{
    decode, non_empty, null_as_default, optional_decimal, parse_timestamp, SynonymTable,
};
use crate::types::{Order, OrderSide, OrderStatus, OrderType, TimeInForce};
use serde::Deserialize;
use tracing::debug;

/// Prime order statuses
pub const PRIME_ORDER_STATUS: SynonymTable<OrderStatus> = SynonymTable::new(
    &[
        ("open", OrderStatus::Open),
        ("working", OrderStatus::Open),
        ("filled", OrderStatus::Filled),
        ("cancelled", OrderStatus::Cancelled),
        ("expired", OrderStatus::Rejected),
        ("pending", OrderStatus::Pending),
        ("rejected", OrderStatus::Rejected),
    ],
    OrderStatus::Unspecified,
);

/// Prime order types; algorithmic and negotiated orders are limit orders
pub const PRIME_ORDER_TYPE: SynonymTable<OrderType> = SynonymTable::new(
    &[
        ("market", OrderType::Market),
        ("limit", OrderType::Limit),
        ("stop_limit", OrderType::StopLimit),
        ("twap", OrderType::Limit),
        ("vwap", OrderType::Limit),
        ("block", OrderType::Limit),
        ("rfq", OrderType::Limit),
    ],
    OrderType::Unspecified,
);

/// Prime order sides
pub const PRIME_ORDER_SIDE: SynonymTable<OrderSide> = SynonymTable::new(
    &[("buy", OrderSide::Buy), ("sell", OrderSide::Sell)],
    OrderSide::Unspecified,
);

/// Prime time in force. Unrecognised values fall back to GTC.
pub const PRIME_TIME_IN_FORCE: SynonymTable<TimeInForce> = SynonymTable::new(
    &[
        ("good_until_date_time", TimeInForce::Gtd),
        ("good_until_cancelled", TimeInForce::Gtc),
        ("immediate_or_cancel", TimeInForce::Ioc),
        ("fill_or_kill", TimeInForce::Fok),
    ],
    TimeInForce::Gtc,
);

#[derive(Debug, Deserialize)]
struct PrimeOrder {
    id: Option<String>,
    product_id: Option<String>,
    side: Option<String>,
    client_order_id: Option<String>,
    #[serde(rename = "type")]
    order_type: Option<String>,
    base_quantity: Option<String>,
    limit_price: Option<String>,
    stop_price: Option<String>,
    status: Option<String>,
    time_in_force: Option<String>,
    created_at: Option<String>,
    filled_quantity: Option<String>,
    average_filled_price: Option<String>,
    commission: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    post_only: bool,
}

pub(super) fn normalize_order(raw: &[u8]) -> Result<Order> {
    let prime: PrimeOrder = decode(raw, "prime", "order")?;

    let created_at = parse_timestamp(prime.created_at.as_deref().unwrap_or_default())
        .map_err(|e| VenueXError::parse(format!("invalid created_at: {}", e)))?;

    let order_id = non_empty(prime.id.as_deref());
    debug!(venue = "prime", order_id = ?order_id, "normalized order");

    Ok(Order {
        order_id: order_id.clone(),
        client_order_id: non_empty(prime.client_order_id.as_deref()),
        venue_order_id: order_id,
        venue_symbol: non_empty(prime.product_id.as_deref()),
        side: prime.side.as_deref().map(|s| PRIME_ORDER_SIDE.lookup(s)),
        order_type: prime.order_type.as_deref().map(|t| PRIME_ORDER_TYPE.lookup(t)),
        status: prime.status.as_deref().map(|s| PRIME_ORDER_STATUS.lookup(s)),
        time_in_force: Some(PRIME_TIME_IN_FORCE.lookup(
            prime.time_in_force.as_deref().unwrap_or_default(),
        )),
        quantity: optional_decimal(prime.base_quantity.as_deref()),
        price: optional_decimal(prime.limit_price.as_deref()),
        stop_price: optional_decimal(prime.stop_price.as_deref()),
        filled_quantity: optional_decimal(prime.filled_quantity.as_deref()),
        average_fill_price: optional_decimal(prime.average_filled_price.as_deref()),
        total_fees: optional_decimal(prime.commission.as_deref()),
        post_only: Some(prime.post_only),
        rejection_reason: None,
        created_at,
        // Prime does not report a modification time
        updated_at: created_at,
    })
}
