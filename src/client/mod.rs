//! Venue client interface
//!
//! [`VenueClient`] is the uniform surface every venue integration exposes:
//! order entry, order queries, balances, order books, streaming subscriptions
//! and a health probe. Results are the canonical records from [`crate::types`],
//! so callers never see venue JSON.
//!
//! Cancellation follows the usual async contract: dropping a returned future
//! abandons the call.

pub mod builders;
pub mod mock;

pub use builders::{
    BalanceBuilder, ExecutionReportBuilder, OrderBookBuilder, OrderBuilder, TradeBuilder,
};
pub use mock::{MockCall, MockClient, MockMethod};

use crate::error::Result;
use crate::types::{Balance, ExecutionReport, Order, OrderBook, OrderFilter, OrderStatus, Trade};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Callback invoked for every order book update of a subscription
pub type OrderBookHandler = Arc<dyn Fn(OrderBook) -> Result<()> + Send + Sync>;

/// Callback invoked for every trade of a subscription
pub type TradeHandler = Arc<dyn Fn(Trade) -> Result<()> + Send + Sync>;

/// Uniform interface implemented by every venue client
#[async_trait]
pub trait VenueClient: Send + Sync {
    /// Submit a new order and return the venue's acknowledgement
    async fn place_order(&self, order: &Order) -> Result<ExecutionReport>;

    /// Cancel an order by ID and return its final status.
    ///
    /// Venues may reject cancelling an order that is already terminal.
    async fn cancel_order(&self, order_id: &str) -> Result<OrderStatus>;

    /// Current state of one order
    async fn get_order(&self, order_id: &str) -> Result<Order>;

    /// Orders matching `filter`
    async fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    /// Current account balance
    async fn get_balance(&self) -> Result<Balance>;

    /// Order book snapshot for `symbol`
    async fn get_order_book(&self, symbol: &str) -> Result<OrderBook>;

    /// Stream order book updates for `symbol` into `handler`.
    ///
    /// Venues without streaming support return an error.
    async fn subscribe_order_book(&self, symbol: &str, handler: OrderBookHandler) -> Result<()>;

    /// Stream trades for `symbol` into `handler`
    async fn subscribe_trades(&self, symbol: &str, handler: TradeHandler) -> Result<()>;

    /// Succeeds when the venue is reachable and operational
    async fn health(&self) -> Result<()>;
}

/// Generate a fresh client order ID (UUID v4)
pub fn new_client_order_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_client_order_ids_are_unique_uuids() {
        let ids: HashSet<String> = (0..50).map(|_| new_client_order_id()).collect();
        assert_eq!(ids.len(), 50);
        for id in &ids {
            assert!(Uuid::parse_str(id).is_ok());
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let client: Arc<dyn VenueClient> = Arc::new(MockClient::new());
        assert!(client.health().await.is_ok());
        let status = client.cancel_order("abc").await.unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }
}
