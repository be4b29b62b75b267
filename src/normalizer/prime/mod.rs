//! Coinbase Prime normalizer

mod balance;
mod errors;
mod execution;
mod order;
mod orderbook;
mod trade;

pub use balance::normalize_wallet_balance;
pub use errors::{PRIME_CLIENT_KEYWORDS, PRIME_ERROR_POLICY};
pub use order::{
    PRIME_ORDER_SIDE, PRIME_ORDER_STATUS, PRIME_ORDER_TYPE, PRIME_TIME_IN_FORCE,
};
pub use trade::normalize_trades;

use super::Normalizer;
use crate::error::{Result, VenueError};
use crate::types::{Balance, ExecutionReport, Order, OrderBook, Trade};

/// Venue identifier for Coinbase Prime
pub const VENUE_ID: &str = "prime";

/// Normalizer for Coinbase Prime responses
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimeNormalizer;

impl PrimeNormalizer {
    /// Create a new normalizer
    pub fn new() -> Self {
        Self
    }

    /// Normalize a wallet balance; the wallet id becomes the account id
    pub fn normalize_wallet_balance(&self, raw: &[u8]) -> Result<Balance> {
        balance::normalize_wallet_balance(raw)
    }

    /// Normalize every trade in a market trades response
    pub fn normalize_trades(&self, raw: &[u8]) -> Result<Vec<Trade>> {
        trade::normalize_trades(raw)
    }
}

impl Normalizer for PrimeNormalizer {
    fn venue(&self) -> &'static str {
        VENUE_ID
    }

    fn normalize_order(&self, raw: &[u8]) -> Result<Order> {
        order::normalize_order(raw)
    }

    fn normalize_execution_report(&self, raw: &[u8]) -> Result<ExecutionReport> {
        execution::normalize_execution_report(raw)
    }

    fn normalize_balance(&self, raw: &[u8]) -> Result<Balance> {
        balance::normalize_balance(raw)
    }

    fn normalize_order_book(&self, raw: &[u8]) -> Result<OrderBook> {
        orderbook::normalize_order_book(raw)
    }

    fn normalize_trade(&self, raw: &[u8]) -> Result<Trade> {
        trade::normalize_trade(raw)
    }

    fn normalize_error(&self, status: u16, body: &[u8]) -> VenueError {
        errors::normalize_error(status, body)
    }
}
