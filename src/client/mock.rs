//! Deterministic in-memory [`VenueClient`] for tests
//!
//! [`MockClient`] records every call with its arguments and answers with
//! fixed defaults unless a hook is installed for the method. Subscriptions
//! keep their handlers, so tests can push updates with
//! [`MockClient::emit_order_book`] and [`MockClient::emit_trade`].

use super::{OrderBookHandler, TradeHandler, VenueClient};
use crate::error::Result;
use crate::types::{
    Balance, ExecutionReport, ExecutionType, Order, OrderBook, OrderFilter, OrderStatus, Trade,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type PlaceOrderHook = Arc<dyn Fn(&Order) -> Result<ExecutionReport> + Send + Sync>;
type OrderIdHook<R> = Arc<dyn Fn(&str) -> Result<R> + Send + Sync>;
type GetOrdersHook = Arc<dyn Fn(&OrderFilter) -> Result<Vec<Order>> + Send + Sync>;
type NoArgHook<R> = Arc<dyn Fn() -> Result<R> + Send + Sync>;
type SubscribeHook<H> = Arc<dyn Fn(&str, H) -> Result<()> + Send + Sync>;

/// Method of [`VenueClient`], used to query the call history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockMethod {
    /// [`VenueClient::place_order`]
    PlaceOrder,
    /// [`VenueClient::cancel_order`]
    CancelOrder,
    /// [`VenueClient::get_order`]
    GetOrder,
    /// [`VenueClient::get_orders`]
    GetOrders,
    /// [`VenueClient::get_balance`]
    GetBalance,
    /// [`VenueClient::get_order_book`]
    GetOrderBook,
    /// [`VenueClient::subscribe_order_book`]
    SubscribeOrderBook,
    /// [`VenueClient::subscribe_trades`]
    SubscribeTrades,
    /// [`VenueClient::health`]
    Health,
}

/// One recorded call and its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    /// Order passed to `place_order`
    PlaceOrder(Order),
    /// Order ID passed to `cancel_order`
    CancelOrder(String),
    /// Order ID passed to `get_order`
    GetOrder(String),
    /// Filter passed to `get_orders`
    GetOrders(OrderFilter),
    /// `get_balance` call
    GetBalance,
    /// Symbol passed to `get_order_book`
    GetOrderBook(String),
    /// Symbol passed to `subscribe_order_book`
    SubscribeOrderBook(String),
    /// Symbol passed to `subscribe_trades`
    SubscribeTrades(String),
    /// `health` call
    Health,
}

impl MockCall {
    /// Method this call was made to
    pub fn method(&self) -> MockMethod {
        match self {
            MockCall::PlaceOrder(_) => MockMethod::PlaceOrder,
            MockCall::CancelOrder(_) => MockMethod::CancelOrder,
            MockCall::GetOrder(_) => MockMethod::GetOrder,
            MockCall::GetOrders(_) => MockMethod::GetOrders,
            MockCall::GetBalance => MockMethod::GetBalance,
            MockCall::GetOrderBook(_) => MockMethod::GetOrderBook,
            MockCall::SubscribeOrderBook(_) => MockMethod::SubscribeOrderBook,
            MockCall::SubscribeTrades(_) => MockMethod::SubscribeTrades,
            MockCall::Health => MockMethod::Health,
        }
    }
}

#[derive(Default)]
struct Hooks {
    place_order: Option<PlaceOrderHook>,
    cancel_order: Option<OrderIdHook<OrderStatus>>,
    get_order: Option<OrderIdHook<Order>>,
    get_orders: Option<GetOrdersHook>,
    get_balance: Option<NoArgHook<Balance>>,
    get_order_book: Option<OrderIdHook<OrderBook>>,
    subscribe_order_book: Option<SubscribeHook<OrderBookHandler>>,
    subscribe_trades: Option<SubscribeHook<TradeHandler>>,
    health: Option<NoArgHook<()>>,
}

#[derive(Default)]
struct MockState {
    hooks: Hooks,
    calls: Vec<MockCall>,
    order_book_handlers: Vec<(String, OrderBookHandler)>,
    trade_handlers: Vec<(String, TradeHandler)>,
}

impl MockState {
    fn count(&self, method: MockMethod) -> usize {
        self.calls.iter().filter(|c| c.method() == method).count()
    }
}

/// Mock [`VenueClient`] with call recording and optional per-method hooks.
///
/// Hooks are installed with the `on_*` builder methods before the mock is
/// shared, or with the `set_*_hook` methods at any time, including after
/// [`MockClient::reset`]. Without a hook each method returns a fixed default:
///
/// | method | default |
/// |---|---|
/// | `place_order` | `NEW` report with execution ID `mock-order-{n}` |
/// | `cancel_order` | [`OrderStatus::Cancelled`] |
/// | `get_order` | open `BTC-USD` order with the requested ID |
/// | `get_orders` | empty list |
/// | `get_balance` | empty balance |
/// | `get_order_book` | empty book for the requested symbol |
/// | `subscribe_*` | `Ok(())`, handler kept for `emit_*` |
/// | `health` | `Ok(())` |
#[derive(Default)]
pub struct MockClient {
    state: RwLock<MockState>,
}

impl std::fmt::Debug for MockClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClient")
            .field("state", &"<RwLock>")
            .finish()
    }
}

impl MockClient {
    /// Create a mock with no hooks and an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `place_order` with `hook`
    pub fn on_place_order<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Order) -> Result<ExecutionReport> + Send + Sync + 'static,
    {
        self.state.get_mut().hooks.place_order = Some(Arc::new(hook));
        self
    }

    /// Answer `cancel_order` with `hook`
    pub fn on_cancel_order<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> Result<OrderStatus> + Send + Sync + 'static,
    {
        self.state.get_mut().hooks.cancel_order = Some(Arc::new(hook));
        self
    }

    /// Answer `get_order` with `hook`
    pub fn on_get_order<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> Result<Order> + Send + Sync + 'static,
    {
        self.state.get_mut().hooks.get_order = Some(Arc::new(hook));
        self
    }

    /// Answer `get_orders` with `hook`
    pub fn on_get_orders<F>(mut self, hook: F) -> Self
    where
        F: Fn(&OrderFilter) -> Result<Vec<Order>> + Send + Sync + 'static,
    {
        self.state.get_mut().hooks.get_orders = Some(Arc::new(hook));
        self
    }

    /// Answer `get_balance` with `hook`
    pub fn on_get_balance<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<Balance> + Send + Sync + 'static,
    {
        self.state.get_mut().hooks.get_balance = Some(Arc::new(hook));
        self
    }

    /// Answer `get_order_book` with `hook`
    pub fn on_get_order_book<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> Result<OrderBook> + Send + Sync + 'static,
    {
        self.state.get_mut().hooks.get_order_book = Some(Arc::new(hook));
        self
    }

    /// Answer `subscribe_order_book` with `hook`
    pub fn on_subscribe_order_book<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, OrderBookHandler) -> Result<()> + Send + Sync + 'static,
    {
        self.state.get_mut().hooks.subscribe_order_book = Some(Arc::new(hook));
        self
    }

    /// Answer `subscribe_trades` with `hook`
    pub fn on_subscribe_trades<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, TradeHandler) -> Result<()> + Send + Sync + 'static,
    {
        self.state.get_mut().hooks.subscribe_trades = Some(Arc::new(hook));
        self
    }

    /// Answer `health` with `hook`
    pub fn on_health<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.state.get_mut().hooks.health = Some(Arc::new(hook));
        self
    }

    /// Replace the `place_order` hook on a shared mock
    pub async fn set_place_order_hook<F>(&self, hook: F)
    where
        F: Fn(&Order) -> Result<ExecutionReport> + Send + Sync + 'static,
    {
        self.state.write().await.hooks.place_order = Some(Arc::new(hook));
    }

    /// Replace the `cancel_order` hook on a shared mock
    pub async fn set_cancel_order_hook<F>(&self, hook: F)
    where
        F: Fn(&str) -> Result<OrderStatus> + Send + Sync + 'static,
    {
        self.state.write().await.hooks.cancel_order = Some(Arc::new(hook));
    }

    /// Replace the `get_order` hook on a shared mock
    pub async fn set_get_order_hook<F>(&self, hook: F)
    where
        F: Fn(&str) -> Result<Order> + Send + Sync + 'static,
    {
        self.state.write().await.hooks.get_order = Some(Arc::new(hook));
    }

    /// Replace the `get_orders` hook on a shared mock
    pub async fn set_get_orders_hook<F>(&self, hook: F)
    where
        F: Fn(&OrderFilter) -> Result<Vec<Order>> + Send + Sync + 'static,
    {
        self.state.write().await.hooks.get_orders = Some(Arc::new(hook));
    }

    /// Replace the `get_balance` hook on a shared mock
    pub async fn set_get_balance_hook<F>(&self, hook: F)
    where
        F: Fn() -> Result<Balance> + Send + Sync + 'static,
    {
        self.state.write().await.hooks.get_balance = Some(Arc::new(hook));
    }

    /// Replace the `get_order_book` hook on a shared mock
    pub async fn set_get_order_book_hook<F>(&self, hook: F)
    where
        F: Fn(&str) -> Result<OrderBook> + Send + Sync + 'static,
    {
        self.state.write().await.hooks.get_order_book = Some(Arc::new(hook));
    }

    /// Replace the `subscribe_order_book` hook on a shared mock
    pub async fn set_subscribe_order_book_hook<F>(&self, hook: F)
    where
        F: Fn(&str, OrderBookHandler) -> Result<()> + Send + Sync + 'static,
    {
        self.state.write().await.hooks.subscribe_order_book = Some(Arc::new(hook));
    }

    /// Replace the `subscribe_trades` hook on a shared mock
    pub async fn set_subscribe_trades_hook<F>(&self, hook: F)
    where
        F: Fn(&str, TradeHandler) -> Result<()> + Send + Sync + 'static,
    {
        self.state.write().await.hooks.subscribe_trades = Some(Arc::new(hook));
    }

    /// Replace the `health` hook on a shared mock
    pub async fn set_health_hook<F>(&self, hook: F)
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.state.write().await.hooks.health = Some(Arc::new(hook));
    }

    /// Drop every hook, keeping history and subscriptions
    pub async fn clear_hooks(&self) {
        self.state.write().await.hooks = Hooks::default();
    }

    /// Every recorded call, oldest first
    pub async fn calls(&self) -> Vec<MockCall> {
        self.state.read().await.calls.clone()
    }

    /// Number of calls made to `method`
    pub async fn call_count(&self, method: MockMethod) -> usize {
        self.state.read().await.count(method)
    }

    /// The `n`th call (0-indexed) made to `method`
    pub async fn call(&self, method: MockMethod, n: usize) -> Option<MockCall> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter(|c| c.method() == method)
            .nth(n)
            .cloned()
    }

    /// Deliver `book` to every order book handler subscribed to `symbol`.
    ///
    /// Returns how many handlers were invoked, or the first handler error.
    pub async fn emit_order_book(&self, symbol: &str, book: OrderBook) -> Result<usize> {
        let handlers: Vec<OrderBookHandler> = {
            let state = self.state.read().await;
            state
                .order_book_handlers
                .iter()
                .filter(|(s, _)| s == symbol)
                .map(|(_, h)| h.clone())
                .collect()
        };
        for handler in &handlers {
            handler(book.clone())?;
        }
        Ok(handlers.len())
    }

    /// Deliver `trade` to every trade handler subscribed to `symbol`
    pub async fn emit_trade(&self, symbol: &str, trade: Trade) -> Result<usize> {
        let handlers: Vec<TradeHandler> = {
            let state = self.state.read().await;
            state
                .trade_handlers
                .iter()
                .filter(|(s, _)| s == symbol)
                .map(|(_, h)| h.clone())
                .collect()
        };
        for handler in &handlers {
            handler(trade.clone())?;
        }
        Ok(handlers.len())
    }

    /// Clear hooks, call history and subscriptions
    pub async fn reset(&self) {
        *self.state.write().await = MockState::default();
    }

    async fn record(&self, call: MockCall) {
        debug!(method = ?call.method(), "mock call");
        self.state.write().await.calls.push(call);
    }
}

#[async_trait]
impl VenueClient for MockClient {
    async fn place_order(&self, order: &Order) -> Result<ExecutionReport> {
        let (n, hook) = {
            let mut state = self.state.write().await;
            state.calls.push(MockCall::PlaceOrder(order.clone()));
            (state.count(MockMethod::PlaceOrder), state.hooks.place_order.clone())
        };
        debug!(method = ?MockMethod::PlaceOrder, "mock call");

        if let Some(hook) = hook {
            return hook(order);
        }

        Ok(ExecutionReport {
            execution_id: Some(format!("mock-order-{}", n)),
            order_id: order.order_id.clone(),
            client_order_id: order.client_order_id.clone(),
            venue_symbol: order.venue_symbol.clone(),
            execution_type: Some(ExecutionType::New),
            order_status: Some("NEW".to_string()),
            price: order.price,
            quantity: order.quantity,
            ..Default::default()
        })
    }

    async fn cancel_order(&self, order_id: &str) -> Result<OrderStatus> {
        self.record(MockCall::CancelOrder(order_id.to_string())).await;
        let hook = self.state.read().await.hooks.cancel_order.clone();
        match hook {
            Some(hook) => hook(order_id),
            None => Ok(OrderStatus::Cancelled),
        }
    }

    async fn get_order(&self, order_id: &str) -> Result<Order> {
        self.record(MockCall::GetOrder(order_id.to_string())).await;
        let hook = self.state.read().await.hooks.get_order.clone();
        match hook {
            Some(hook) => hook(order_id),
            None => Ok(Order {
                order_id: Some(order_id.to_string()),
                status: Some(OrderStatus::Open),
                venue_symbol: Some("BTC-USD".to_string()),
                ..Default::default()
            }),
        }
    }

    async fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        self.record(MockCall::GetOrders(filter.clone())).await;
        let hook = self.state.read().await.hooks.get_orders.clone();
        match hook {
            Some(hook) => hook(filter),
            None => Ok(Vec::new()),
        }
    }

    async fn get_balance(&self) -> Result<Balance> {
        self.record(MockCall::GetBalance).await;
        let hook = self.state.read().await.hooks.get_balance.clone();
        match hook {
            Some(hook) => hook(),
            None => Ok(Balance::default()),
        }
    }

    async fn get_order_book(&self, symbol: &str) -> Result<OrderBook> {
        self.record(MockCall::GetOrderBook(symbol.to_string())).await;
        let hook = self.state.read().await.hooks.get_order_book.clone();
        match hook {
            Some(hook) => hook(symbol),
            None => Ok(OrderBook {
                venue_symbol: Some(symbol.to_string()),
                ..Default::default()
            }),
        }
    }

    async fn subscribe_order_book(&self, symbol: &str, handler: OrderBookHandler) -> Result<()> {
        let hook = {
            let mut state = self.state.write().await;
            state
                .calls
                .push(MockCall::SubscribeOrderBook(symbol.to_string()));
            state
                .order_book_handlers
                .push((symbol.to_string(), handler.clone()));
            state.hooks.subscribe_order_book.clone()
        };
        match hook {
            Some(hook) => hook(symbol, handler),
            None => Ok(()),
        }
    }

    async fn subscribe_trades(&self, symbol: &str, handler: TradeHandler) -> Result<()> {
        let hook = {
            let mut state = self.state.write().await;
            state.calls.push(MockCall::SubscribeTrades(symbol.to_string()));
            state.trade_handlers.push((symbol.to_string(), handler.clone()));
            state.hooks.subscribe_trades.clone()
        };
        match hook {
            Some(hook) => hook(symbol, handler),
            None => Ok(()),
        }
    }

    async fn health(&self) -> Result<()> {
        self.record(MockCall::Health).await;
        let hook = self.state.read().await.hooks.health.clone();
        match hook {
            Some(hook) => hook(),
            None => Ok(()),
        }
    }
}
