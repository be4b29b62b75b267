//! Conversion of venue responses into canonical records
//!
//! Every venue gets a [`Normalizer`] that understands its JSON shapes, enum
//! spellings and error bodies. Normalizers are stateless and can be shared
//! across threads.

pub mod classify;
pub mod coinbase;
pub mod common;
pub mod prime;

pub use classify::{ErrorPolicy, CLIENT_ERROR_KEYWORDS};
pub use coinbase::CoinbaseNormalizer;
pub use prime::PrimeNormalizer;

use crate::api::join_url;
use crate::error::{Result, VenueError, VenueXError};
use crate::types::{Balance, ExecutionReport, Order, OrderBook, Trade};
use std::str::FromStr;

/// Converts raw venue response bodies into canonical records
pub trait Normalizer: Send + Sync {
    /// Venue identifier stamped on market data records
    fn venue(&self) -> &'static str;

    /// Normalize an order response
    fn normalize_order(&self, raw: &[u8]) -> Result<Order>;

    /// Normalize a fill or execution response
    fn normalize_execution_report(&self, raw: &[u8]) -> Result<ExecutionReport>;

    /// Normalize a balance or account response
    fn normalize_balance(&self, raw: &[u8]) -> Result<Balance>;

    /// Normalize an order book snapshot
    fn normalize_order_book(&self, raw: &[u8]) -> Result<OrderBook>;

    /// Normalize a trade response
    fn normalize_trade(&self, raw: &[u8]) -> Result<Trade>;

    /// Classify an error response. Never fails: unreadable bodies are
    /// classified on their raw text.
    fn normalize_error(&self, status: u16, body: &[u8]) -> VenueError;
}

/// Supported venues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Venue {
    /// Coinbase Advanced Trade
    Coinbase,
    /// Coinbase Prime
    Prime,
}

impl Venue {
    /// Normalizer for this venue
    pub fn normalizer(&self) -> Box<dyn Normalizer> {
        match self {
            Venue::Coinbase => Box::new(CoinbaseNormalizer::new()),
            Venue::Prime => Box::new(PrimeNormalizer::new()),
        }
    }

    /// Production REST base URL
    pub fn api_url(&self) -> &'static str {
        match self {
            Venue::Coinbase => "https://api.coinbase.com",
            Venue::Prime => "https://api.prime.coinbase.com",
        }
    }

    /// Absolute URL of `path` on this venue's REST API
    pub fn endpoint(&self, path: &str) -> String {
        join_url(self.api_url(), path)
    }
}

impl FromStr for Venue {
    type Err = VenueXError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "coinbase" | "coinbase_advanced" | "advanced_trade" => Ok(Venue::Coinbase),
            "prime" | "coinbase_prime" => Ok(Venue::Prime),
            _ => Err(VenueXError::config(
                "Invalid venue. Use 'coinbase' or 'prime'",
            )),
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Venue::Coinbase => write!(f, "coinbase"),
            Venue::Prime => write!(f, "prime"),
        }
    }
}
