use crate::error::{Result, VenueXError};
use crate::normalizer::common::{
    decode, non_empty, optional_decimal, parse_order_side, parse_order_status, parse_order_type,
    null_as_default, parse_time_in_force, parse_timestamp, parse_timestamp_lenient, SynonymTable,
};
use crate::types::{Order, OrderStatus, OrderType, TimeInForce};
use serde::Deserialize;
use tracing::debug;

/// Advanced Trade statuses the shared table does not know
const COINBASE_ORDER_STATUS: SynonymTable<OrderStatus> = SynonymTable::new(
    &[
        ("queued", OrderStatus::Pending),
        ("cancel_queued", OrderStatus::Open),
        ("edit_queued", OrderStatus::Open),
    ],
    OrderStatus::Unspecified,
);

/// Advanced Trade spells time in force out in full
const COINBASE_TIME_IN_FORCE: SynonymTable<TimeInForce> = SynonymTable::new(
    &[
        ("good_until_cancelled", TimeInForce::Gtc),
        ("good_until_date_time", TimeInForce::Gtd),
    ],
    TimeInForce::Unspecified,
);

#[derive(Debug, Deserialize)]
struct CoinbaseOrder {
    order_id: Option<String>,
    product_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    order_configuration: OrderConfiguration,
    side: Option<String>,
    client_order_id: Option<String>,
    status: Option<String>,
    time_in_force: Option<String>,
    created_time: Option<String>,
    filled_size: Option<String>,
    average_filled_price: Option<String>,
    total_fees: Option<String>,
    order_type: Option<String>,
    reject_reason: Option<String>,
    last_fill_time: Option<String>,
}

/// Exactly one variant is populated per order
#[derive(Debug, Default, Deserialize)]
struct OrderConfiguration {
    market_market_ioc: Option<ConfigParams>,
    sor_limit_ioc: Option<ConfigParams>,
    limit_limit_gtc: Option<ConfigParams>,
    limit_limit_gtd: Option<ConfigParams>,
    limit_limit_fok: Option<ConfigParams>,
    stop_limit_stop_limit_gtc: Option<ConfigParams>,
    stop_limit_stop_limit_gtd: Option<ConfigParams>,
    trigger_bracket_gtc: Option<ConfigParams>,
    trigger_bracket_gtd: Option<ConfigParams>,
}

/// Union of the fields used by the configuration variants
#[derive(Debug, Default, Deserialize)]
struct ConfigParams {
    quote_size: Option<String>,
    base_size: Option<String>,
    limit_price: Option<String>,
    stop_price: Option<String>,
    stop_trigger_price: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    post_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigKind {
    MarketIoc,
    SorLimitIoc,
    LimitGtc,
    LimitGtd,
    LimitFok,
    StopLimitGtc,
    StopLimitGtd,
    TriggerBracketGtc,
    TriggerBracketGtd,
}

impl ConfigKind {
    fn order_type(self) -> OrderType {
        match self {
            ConfigKind::MarketIoc => OrderType::Market,
            ConfigKind::SorLimitIoc
            | ConfigKind::LimitGtc
            | ConfigKind::LimitGtd
            | ConfigKind::LimitFok => OrderType::Limit,
            ConfigKind::StopLimitGtc
            | ConfigKind::StopLimitGtd
            | ConfigKind::TriggerBracketGtc
            | ConfigKind::TriggerBracketGtd => OrderType::StopLimit,
        }
    }
}

impl OrderConfiguration {
    fn active(&self) -> Option<(ConfigKind, &ConfigParams)> {
        let variants = [
            (ConfigKind::MarketIoc, &self.market_market_ioc),
            (ConfigKind::SorLimitIoc, &self.sor_limit_ioc),
            (ConfigKind::LimitGtc, &self.limit_limit_gtc),
            (ConfigKind::LimitGtd, &self.limit_limit_gtd),
            (ConfigKind::LimitFok, &self.limit_limit_fok),
            (ConfigKind::StopLimitGtc, &self.stop_limit_stop_limit_gtc),
            (ConfigKind::StopLimitGtd, &self.stop_limit_stop_limit_gtd),
            (ConfigKind::TriggerBracketGtc, &self.trigger_bracket_gtc),
            (ConfigKind::TriggerBracketGtd, &self.trigger_bracket_gtd),
        ];

        variants
            .into_iter()
            .find_map(|(kind, params)| params.as_ref().map(|p| (kind, p)))
    }
}

/// Price, quantity and stop price of the active configuration.
/// Market orders carry no price; their size is the quote size when given.
fn extract_terms(kind: ConfigKind, params: &ConfigParams) -> (Option<f64>, Option<f64>, Option<f64>) {
    match kind {
        ConfigKind::MarketIoc => {
            let quantity = optional_decimal(params.quote_size.as_deref())
                .or_else(|| optional_decimal(params.base_size.as_deref()));
            (None, quantity, None)
        }
        ConfigKind::StopLimitGtc | ConfigKind::StopLimitGtd => (
            optional_decimal(params.limit_price.as_deref()),
            optional_decimal(params.base_size.as_deref()),
            optional_decimal(params.stop_price.as_deref()),
        ),
        ConfigKind::TriggerBracketGtc | ConfigKind::TriggerBracketGtd => (
            optional_decimal(params.limit_price.as_deref()),
            optional_decimal(params.base_size.as_deref()),
            optional_decimal(params.stop_trigger_price.as_deref()),
        ),
        _ => (
            optional_decimal(params.limit_price.as_deref()),
            optional_decimal(params.base_size.as_deref()),
            None,
        ),
    }
}

fn determine_order_type(raw_type: Option<&str>, config: Option<ConfigKind>) -> OrderType {
    raw_type
        .map(parse_order_type)
        .filter(|t| *t != OrderType::Unspecified)
        .or_else(|| config.map(ConfigKind::order_type))
        .unwrap_or_default()
}

fn map_status(raw: &str) -> OrderStatus {
    COINBASE_ORDER_STATUS
        .get(raw)
        .unwrap_or_else(|| parse_order_status(raw))
}

fn map_time_in_force(raw: &str) -> TimeInForce {
    COINBASE_TIME_IN_FORCE
        .get(raw)
        .unwrap_or_else(|| parse_time_in_force(raw))
}

pub(super) fn normalize_order(raw: &[u8]) -> Result<Order> {
    let cb: CoinbaseOrder = decode(raw, "coinbase", "order")?;

    let created_at = parse_timestamp(cb.created_time.as_deref().unwrap_or_default())
        .map_err(|e| VenueXError::parse(format!("invalid created_time: {}", e)))?;

    let active = cb.order_configuration.active();
    let (price, quantity, stop_price) = active
        .map(|(kind, params)| extract_terms(kind, params))
        .unwrap_or_default();

    let post_only = match active {
        Some((ConfigKind::LimitGtc | ConfigKind::LimitGtd, params)) if params.post_only => Some(true),
        _ => None,
    };

    let order_id = non_empty(cb.order_id.as_deref());

    debug!(venue = "coinbase", order_id = ?order_id, "normalized order");

    Ok(Order {
        order_id: order_id.clone(),
        client_order_id: non_empty(cb.client_order_id.as_deref()),
        venue_order_id: order_id,
        venue_symbol: non_empty(cb.product_id.as_deref()),
        side: cb.side.as_deref().map(parse_order_side),
        order_type: Some(determine_order_type(
            cb.order_type.as_deref(),
            active.map(|(kind, _)| kind),
        )),
        status: cb.status.as_deref().map(map_status),
        time_in_force: cb.time_in_force.as_deref().map(map_time_in_force),
        quantity,
        price,
        stop_price,
        filled_quantity: optional_decimal(cb.filled_size.as_deref()),
        average_fill_price: optional_decimal(cb.average_filled_price.as_deref()),
        total_fees: optional_decimal(cb.total_fees.as_deref()),
        post_only,
        rejection_reason: non_empty(cb.reject_reason.as_deref()),
        created_at,
        updated_at: cb.last_fill_time.as_deref().and_then(parse_timestamp_lenient),
    })
}
