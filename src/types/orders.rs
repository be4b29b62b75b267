//! Canonical order and execution types shared by all venues

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Venue reported a side we do not recognise
    #[default]
    Unspecified,
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Unspecified => write!(f, "unspecified"),
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Venue reported a type we do not recognise
    #[default]
    Unspecified,
    /// Limit order
    Limit,
    /// Market order
    Market,
    /// Stop (stop-market) order
    StopLoss,
    /// Stop-limit order
    StopLimit,
    /// Trailing stop order
    TrailingStop,
    /// Post-only (maker only) order
    PostOnly,
    /// Immediate-or-cancel order
    Ioc,
    /// Fill-or-kill order
    Fok,
    /// Good-til-cancelled order
    Gtc,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::Unspecified => "unspecified",
            OrderType::Limit => "limit",
            OrderType::Market => "market",
            OrderType::StopLoss => "stop_loss",
            OrderType::StopLimit => "stop_limit",
            OrderType::TrailingStop => "trailing_stop",
            OrderType::PostOnly => "post_only",
            OrderType::Ioc => "ioc",
            OrderType::Fok => "fok",
            OrderType::Gtc => "gtc",
        };
        write!(f, "{}", s)
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Venue reported a status we do not recognise
    #[default]
    Unspecified,
    /// Order is resting on the book
    Open,
    /// Order was accepted but is not yet working
    Pending,
    /// Order is partially filled
    PartiallyFilled,
    /// Order is completely filled
    Filled,
    /// Order was cancelled
    Cancelled,
    /// Order was rejected or expired
    Rejected,
}

impl OrderStatus {
    /// Whether the order can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Unspecified => "unspecified",
            OrderStatus::Open => "open",
            OrderStatus::Pending => "pending",
            OrderStatus::PartiallyFilled => "partially_filled",
            OrderStatus::Filled => "filled",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Venue reported a value we do not recognise
    #[default]
    Unspecified,
    /// Good til cancelled
    Gtc,
    /// Immediate or cancel
    Ioc,
    /// Fill or kill
    Fok,
    /// Good til date
    Gtd,
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeInForce::Unspecified => write!(f, "unspecified"),
            TimeInForce::Gtc => write!(f, "gtc"),
            TimeInForce::Ioc => write!(f, "ioc"),
            TimeInForce::Fok => write!(f, "fok"),
            TimeInForce::Gtd => write!(f, "gtd"),
        }
    }
}

/// Kind of event an execution report describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionType {
    /// Unknown event
    #[default]
    Unspecified,
    /// Order accepted
    New,
    /// Trade executed
    Trade,
    /// Fill reported by a venue fills endpoint
    Fill,
    /// Order cancelled
    Cancelled,
    /// Order rejected
    Rejected,
}

impl std::fmt::Display for ExecutionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExecutionType::Unspecified => "unspecified",
            ExecutionType::New => "new",
            ExecutionType::Trade => "trade",
            ExecutionType::Fill => "fill",
            ExecutionType::Cancelled => "cancelled",
            ExecutionType::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// Canonical order record. Every field is optional because venues omit fields
/// inconsistently and a zero price is not the same as a missing one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Order {
    /// Order ID assigned by the SDK caller or venue
    pub order_id: Option<String>,
    /// Client-supplied order ID
    pub client_order_id: Option<String>,
    /// Order ID on the venue
    pub venue_order_id: Option<String>,
    /// Instrument symbol on the venue (e.g. "BTC-USD")
    pub venue_symbol: Option<String>,
    /// Order side
    pub side: Option<OrderSide>,
    /// Order type
    pub order_type: Option<OrderType>,
    /// Order status
    pub status: Option<OrderStatus>,
    /// Time in force
    pub time_in_force: Option<TimeInForce>,
    /// Ordered quantity
    pub quantity: Option<f64>,
    /// Limit price
    pub price: Option<f64>,
    /// Stop/trigger price
    pub stop_price: Option<f64>,
    /// Quantity filled so far
    pub filled_quantity: Option<f64>,
    /// Volume-weighted average fill price
    pub average_fill_price: Option<f64>,
    /// Fees charged so far
    pub total_fees: Option<f64>,
    /// Whether the order may only add liquidity
    pub post_only: Option<bool>,
    /// Reason given by the venue for a rejection
    pub rejection_reason: Option<String>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Quantity still open, when both quantity and filled quantity are known
    pub fn remaining_quantity(&self) -> Option<f64> {
        match (self.quantity, self.filled_quantity) {
            (Some(qty), Some(filled)) => Some((qty - filled).max(0.0)),
            _ => None,
        }
    }
}

/// Canonical execution (fill) report
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Execution ID
    pub execution_id: Option<String>,
    /// Execution ID on the venue
    pub venue_execution_id: Option<String>,
    /// Order ID
    pub order_id: Option<String>,
    /// Order ID on the venue
    pub venue_order_id: Option<String>,
    /// Client-supplied order ID
    pub client_order_id: Option<String>,
    /// Instrument symbol on the venue
    pub venue_symbol: Option<String>,
    /// Kind of event
    pub execution_type: Option<ExecutionType>,
    /// Order status as reported by the venue
    pub order_status: Option<String>,
    /// Side as reported by the venue
    pub side: Option<String>,
    /// Event time
    pub timestamp: Option<DateTime<Utc>>,
    /// Fill price
    pub price: Option<f64>,
    /// Fill quantity
    pub quantity: Option<f64>,
    /// Fee charged for this fill
    pub fee: Option<f64>,
    /// Notional value (price * quantity)
    pub value: Option<f64>,
    /// Trade ID
    pub trade_id: Option<String>,
    /// Whether this fill added liquidity
    pub is_maker: Option<bool>,
    /// Liquidity indicator as reported by the venue
    pub liquidity: Option<String>,
}
