//! Fluent builders for canonical records
//!
//! Each builder starts from a plausible `BTC-USD` record so tests only set
//! the fields they care about.

use super::new_client_order_id;
use crate::types::{
    Balance, ExecutionReport, ExecutionType, Order, OrderBook, OrderBookLevel, OrderSide,
    OrderStatus, OrderType, TimeInForce, Trade, TradeSide,
};
use chrono::{DateTime, Utc};

const DEFAULT_SYMBOL: &str = "BTC-USD";

/// Builds [`Order`] records
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    order: Order,
}

impl OrderBuilder {
    /// Open GTC limit buy of 1.0 at 50000.0
    pub fn new() -> Self {
        Self {
            order: Order {
                order_id: Some("test-order-1".to_string()),
                venue_symbol: Some(DEFAULT_SYMBOL.to_string()),
                order_type: Some(OrderType::Limit),
                side: Some(OrderSide::Buy),
                status: Some(OrderStatus::Open),
                time_in_force: Some(TimeInForce::Gtc),
                quantity: Some(1.0),
                price: Some(50000.0),
                created_at: Some(Utc::now()),
                ..Default::default()
            },
        }
    }

    /// Set the order ID
    pub fn with_order_id(mut self, id: impl Into<String>) -> Self {
        self.order.order_id = Some(id.into());
        self
    }

    /// Set the venue order ID
    pub fn with_venue_order_id(mut self, id: impl Into<String>) -> Self {
        self.order.venue_order_id = Some(id.into());
        self
    }

    /// Set the client order ID
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.order.client_order_id = Some(id.into());
        self
    }

    /// Set a freshly generated client order ID
    pub fn with_generated_client_order_id(self) -> Self {
        self.with_client_order_id(new_client_order_id())
    }

    /// Set the venue symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.order.venue_symbol = Some(symbol.into());
        self
    }

    /// Set the order type
    pub fn with_order_type(mut self, order_type: OrderType) -> Self {
        self.order.order_type = Some(order_type);
        self
    }

    /// Set the side
    pub fn with_side(mut self, side: OrderSide) -> Self {
        self.order.side = Some(side);
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.order.status = Some(status);
        self
    }

    /// Set the time in force
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.order.time_in_force = Some(tif);
        self
    }

    /// Set the quantity
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.order.quantity = Some(quantity);
        self
    }

    /// Set the limit price
    pub fn with_price(mut self, price: f64) -> Self {
        self.order.price = Some(price);
        self
    }

    /// Set the filled quantity
    pub fn with_filled_quantity(mut self, filled: f64) -> Self {
        self.order.filled_quantity = Some(filled);
        self
    }

    /// Finish the order
    pub fn build(self) -> Order {
        self.order
    }
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds [`ExecutionReport`] records
#[derive(Debug, Clone)]
pub struct ExecutionReportBuilder {
    report: ExecutionReport,
}

impl ExecutionReportBuilder {
    /// `NEW` report for a buy of 1.0 at 50000.0
    pub fn new() -> Self {
        Self {
            report: ExecutionReport {
                execution_id: Some("test-exec-1".to_string()),
                order_id: Some("test-order-1".to_string()),
                venue_symbol: Some(DEFAULT_SYMBOL.to_string()),
                execution_type: Some(ExecutionType::New),
                order_status: Some("NEW".to_string()),
                side: Some("BUY".to_string()),
                timestamp: Some(Utc::now()),
                quantity: Some(1.0),
                price: Some(50000.0),
                ..Default::default()
            },
        }
    }

    /// Set the execution ID
    pub fn with_execution_id(mut self, id: impl Into<String>) -> Self {
        self.report.execution_id = Some(id.into());
        self
    }

    /// Set the order ID
    pub fn with_order_id(mut self, id: impl Into<String>) -> Self {
        self.report.order_id = Some(id.into());
        self
    }

    /// Set the venue order ID
    pub fn with_venue_order_id(mut self, id: impl Into<String>) -> Self {
        self.report.venue_order_id = Some(id.into());
        self
    }

    /// Set the venue symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.report.venue_symbol = Some(symbol.into());
        self
    }

    /// Set the execution type
    pub fn with_execution_type(mut self, execution_type: ExecutionType) -> Self {
        self.report.execution_type = Some(execution_type);
        self
    }

    /// Set the venue order status string
    pub fn with_order_status(mut self, status: impl Into<String>) -> Self {
        self.report.order_status = Some(status.into());
        self
    }

    /// Set the fill quantity
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.report.quantity = Some(quantity);
        self
    }

    /// Set the fill price
    pub fn with_price(mut self, price: f64) -> Self {
        self.report.price = Some(price);
        self
    }

    /// Finish the report
    pub fn build(self) -> ExecutionReport {
        self.report
    }
}

impl Default for ExecutionReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds [`Balance`] records
#[derive(Debug, Clone)]
pub struct BalanceBuilder {
    balance: Balance,
}

impl BalanceBuilder {
    /// 2.0 BTC total with 0.5 locked
    pub fn new() -> Self {
        Self {
            balance: Balance {
                account_id: Some("test-account".to_string()),
                asset_id: Some("BTC".to_string()),
                available: Some(1.5),
                total: Some(2.0),
                locked: Some(0.5),
                updated_at: Some(Utc::now()),
            },
        }
    }

    /// Set the account ID
    pub fn with_account_id(mut self, id: impl Into<String>) -> Self {
        self.balance.account_id = Some(id.into());
        self
    }

    /// Set the asset
    pub fn with_asset_id(mut self, asset: impl Into<String>) -> Self {
        self.balance.asset_id = Some(asset.into());
        self
    }

    /// Set the available amount
    pub fn with_available(mut self, available: f64) -> Self {
        self.balance.available = Some(available);
        self
    }

    /// Set the total amount
    pub fn with_total(mut self, total: f64) -> Self {
        self.balance.total = Some(total);
        self
    }

    /// Set the locked amount
    pub fn with_locked(mut self, locked: f64) -> Self {
        self.balance.locked = Some(locked);
        self
    }

    /// Finish the balance
    pub fn build(self) -> Balance {
        self.balance
    }
}

impl Default for BalanceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds [`OrderBook`] records.
///
/// Levels are kept in insertion order; top-of-book fields are derived on
/// [`OrderBookBuilder::build`].
#[derive(Debug, Clone)]
pub struct OrderBookBuilder {
    book: OrderBook,
    bids: Vec<OrderBookLevel>,
    asks: Vec<OrderBookLevel>,
}

impl OrderBookBuilder {
    /// Empty `BTC-USD` book stamped now
    pub fn new() -> Self {
        Self {
            book: OrderBook {
                venue_symbol: Some(DEFAULT_SYMBOL.to_string()),
                timestamp: Some(Utc::now()),
                ..Default::default()
            },
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Set the venue symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.book.venue_symbol = Some(symbol.into());
        self
    }

    /// Append a bid level
    pub fn with_bid(mut self, price: f64, quantity: f64) -> Self {
        self.bids.push(OrderBookLevel::new(price, quantity));
        self
    }

    /// Append an ask level
    pub fn with_ask(mut self, price: f64, quantity: f64) -> Self {
        self.asks.push(OrderBookLevel::new(price, quantity));
        self
    }

    /// Set the snapshot time
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.book.timestamp = Some(timestamp);
        self
    }

    /// Finish the book
    pub fn build(self) -> OrderBook {
        self.book.with_levels(self.bids, self.asks)
    }
}

impl Default for OrderBookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds [`Trade`] records
#[derive(Debug, Clone)]
pub struct TradeBuilder {
    trade: Trade,
}

impl TradeBuilder {
    /// Buy of 0.1 at 50000.0
    pub fn new() -> Self {
        Self {
            trade: Trade {
                trade_id: Some("test-trade-1".to_string()),
                venue_symbol: Some(DEFAULT_SYMBOL.to_string()),
                price: Some(50000.0),
                quantity: Some(0.1),
                side: Some(TradeSide::Buy),
                timestamp: Some(Utc::now()),
                ..Default::default()
            },
        }
    }

    /// Set the trade ID
    pub fn with_trade_id(mut self, id: impl Into<String>) -> Self {
        self.trade.trade_id = Some(id.into());
        self
    }

    /// Set the venue symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.trade.venue_symbol = Some(symbol.into());
        self
    }

    /// Set the price
    pub fn with_price(mut self, price: f64) -> Self {
        self.trade.price = Some(price);
        self
    }

    /// Set the quantity
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.trade.quantity = Some(quantity);
        self
    }

    /// Set the aggressor side
    pub fn with_side(mut self, side: TradeSide) -> Self {
        self.trade.side = Some(side);
        self
    }

    /// Set the trade time
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.trade.timestamp = Some(timestamp);
        self
    }

    /// Finish the trade
    pub fn build(self) -> Trade {
        self.trade
    }
}

impl Default for TradeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_order_builder() {
        let order = OrderBuilder::new()
            .with_order_id("o-9")
            .with_venue_order_id("v-9")
            .with_symbol("ETH-USD")
            .with_side(OrderSide::Sell)
            .with_order_type(OrderType::Market)
            .with_status(OrderStatus::PartiallyFilled)
            .with_quantity(3.0)
            .with_filled_quantity(1.0)
            .build();

        assert_eq!(order.order_id.as_deref(), Some("o-9"));
        assert_eq!(order.venue_order_id.as_deref(), Some("v-9"));
        assert_eq!(order.venue_symbol.as_deref(), Some("ETH-USD"));
        assert_eq!(order.side, Some(OrderSide::Sell));
        assert_eq!(order.order_type, Some(OrderType::Market));
        assert_eq!(order.time_in_force, Some(TimeInForce::Gtc));
        assert_eq!(order.remaining_quantity(), Some(2.0));
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_generated_client_order_id() {
        let a = OrderBuilder::new().with_generated_client_order_id().build();
        let b = OrderBuilder::new().with_generated_client_order_id().build();
        assert_eq!(a.client_order_id.as_ref().map(String::len), Some(36));
        assert_ne!(a.client_order_id, b.client_order_id);
    }

    #[test]
    fn test_execution_report_builder() {
        let report = ExecutionReportBuilder::new()
            .with_execution_id("e-2")
            .with_execution_type(ExecutionType::Fill)
            .with_order_status("FILLED")
            .with_price(10.0)
            .with_quantity(4.0)
            .build();

        assert_eq!(report.execution_id.as_deref(), Some("e-2"));
        assert_eq!(report.execution_type, Some(ExecutionType::Fill));
        assert_eq!(report.order_status.as_deref(), Some("FILLED"));
        assert_eq!(report.side.as_deref(), Some("BUY"));
        assert_eq!(report.price, Some(10.0));
    }

    #[test]
    fn test_balance_builder() {
        let balance = BalanceBuilder::new()
            .with_asset_id("USD")
            .with_total(100.0)
            .with_available(60.0)
            .with_locked(40.0)
            .build();

        assert_eq!(balance.asset_id.as_deref(), Some("USD"));
        assert_eq!(balance.account_id.as_deref(), Some("test-account"));
        assert_eq!(balance.total, Some(100.0));
        assert_eq!(balance.available, Some(60.0));
        assert_eq!(balance.locked, Some(40.0));
    }

    #[test]
    fn test_order_book_builder_derives_top_of_book() {
        let ts = Utc.timestamp_opt(1_705_314_600, 0).unwrap();
        let book = OrderBookBuilder::new()
            .with_symbol("ETH-USD")
            .with_bid(99.0, 1.0)
            .with_bid(98.0, 2.0)
            .with_ask(101.0, 1.5)
            .with_timestamp(ts)
            .build();

        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.best_bid, Some(99.0));
        assert_eq!(book.best_ask, Some(101.0));
        assert_eq!(book.spread, Some(2.0));
        assert_eq!(book.mid_price, Some(100.0));
        assert_eq!(book.timestamp, Some(ts));

        let empty = OrderBookBuilder::new().build();
        assert!(empty.bids.is_empty());
        assert_eq!(empty.spread, None);
    }

    #[test]
    fn test_trade_builder() {
        let trade = TradeBuilder::new()
            .with_trade_id("t-5")
            .with_side(TradeSide::Sell)
            .with_price(2.5)
            .with_quantity(4.0)
            .build();

        assert_eq!(trade.trade_id.as_deref(), Some("t-5"));
        assert_eq!(trade.side, Some(TradeSide::Sell));
        assert_eq!(trade.price, Some(2.5));
        assert_eq!(trade.quantity, Some(4.0));
        assert_eq!(trade.venue_symbol.as_deref(), Some("BTC-USD"));
    }
}
