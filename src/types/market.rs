//! Canonical market data types: order books and trades

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single price level of an order book
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// Level price
    pub price: Option<f64>,
    /// Total size at this price
    pub quantity: Option<f64>,
    /// Number of orders at this price, when the venue reports it
    pub order_count: Option<i64>,
}

impl OrderBookLevel {
    /// Create a level from price and size
    pub fn new(price: f64, quantity: f64) -> Self {
        Self {
            price: Some(price),
            quantity: Some(quantity),
            order_count: None,
        }
    }
}

/// Canonical order book snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderBook {
    /// Venue the book came from
    pub venue_id: Option<String>,
    /// Instrument symbol on the venue
    pub venue_symbol: Option<String>,
    /// Snapshot time
    pub timestamp: Option<DateTime<Utc>>,
    /// Venue sequence number
    pub sequence: Option<i64>,
    /// Bid levels, best first
    pub bids: Vec<OrderBookLevel>,
    /// Ask levels, best first
    pub asks: Vec<OrderBookLevel>,
    /// Best bid price
    pub best_bid: Option<f64>,
    /// Best ask price
    pub best_ask: Option<f64>,
    /// Best ask minus best bid
    pub spread: Option<f64>,
    /// Average of best bid and best ask
    pub mid_price: Option<f64>,
}

impl OrderBook {
    /// Attach levels and derive best bid/ask, spread and mid price.
    ///
    /// Levels are trusted to be sorted best-first by the venue. Spread and mid
    /// price are only set when both sides are non-empty.
    pub fn with_levels(mut self, bids: Vec<OrderBookLevel>, asks: Vec<OrderBookLevel>) -> Self {
        self.best_bid = bids.first().and_then(|l| l.price);
        self.best_ask = asks.first().and_then(|l| l.price);
        self.bids = bids;
        self.asks = asks;

        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => {
                self.spread = Some(ask - bid);
                self.mid_price = Some((bid + ask) / 2.0);
            }
            _ => {
                self.spread = None;
                self.mid_price = None;
            }
        }
        self
    }
}

/// Aggressor side of a public trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    /// Unknown side
    #[default]
    Unspecified,
    /// Buyer was the aggressor
    Buy,
    /// Seller was the aggressor
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Unspecified => write!(f, "unspecified"),
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// Canonical public trade
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trade {
    /// Trade ID
    pub trade_id: Option<String>,
    /// Venue the trade happened on
    pub venue_id: Option<String>,
    /// Instrument symbol on the venue
    pub venue_symbol: Option<String>,
    /// Execution time
    pub timestamp: Option<DateTime<Utc>>,
    /// Trade price
    pub price: Option<f64>,
    /// Trade size
    pub quantity: Option<f64>,
    /// Aggressor side
    pub side: Option<TradeSide>,
    /// Notional value (price * quantity)
    pub value: Option<f64>,
}
