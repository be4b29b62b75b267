//! Coinbase Advanced Trade (v3) normalizer

mod balance;
mod errors;
mod execution;
mod order;
mod orderbook;
mod trade;

pub use balance::{account_totals, normalize_balances};
pub use errors::COINBASE_ERROR_POLICY;
pub use trade::normalize_trades;

use super::Normalizer;
use crate::error::{Result, VenueError};
use crate::types::{Balance, ExecutionReport, Order, OrderBook, Trade};

/// Venue identifier for Coinbase Advanced Trade
pub const VENUE_ID: &str = "coinbase";

/// Normalizer for Coinbase Advanced Trade responses
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinbaseNormalizer;

impl CoinbaseNormalizer {
    /// Create a new normalizer
    pub fn new() -> Self {
        Self
    }

    /// Normalize every account in an accounts response
    pub fn normalize_balances(&self, raw: &[u8]) -> Result<Vec<Balance>> {
        balance::normalize_balances(raw)
    }

    /// Normalize every trade in a market trades response
    pub fn normalize_trades(&self, raw: &[u8]) -> Result<Vec<Trade>> {
        trade::normalize_trades(raw)
    }
}

impl Normalizer for CoinbaseNormalizer {
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
