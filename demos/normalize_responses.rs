//! Normalize responses example
//!
//! Feeds captured venue responses through the normalizers and shows the
//! canonical records and classified errors.

use tracing::{info, warn};
use venuex_rust_sdk::{Normalizer, Venue};

const COINBASE_ORDER: &str = include_str!("../testdata/coinbase/order_limit.json");
const COINBASE_BOOK: &str = include_str!("../testdata/coinbase/orderbook.json");
const PRIME_BALANCE: &str = include_str!("../testdata/prime/balance.json");
const PRIME_ERROR: &str = include_str!("../testdata/prime/error_invalid_order.json");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let coinbase = "coinbase".parse::<Venue>()?.normalizer();
    let prime = "coinbase_prime".parse::<Venue>()?.normalizer();

    let order = coinbase.normalize_order(COINBASE_ORDER.as_bytes())?;
    info!(
        "{} order {:?}: {:?} {:?} {:?} @ {:?} ({:?})",
        coinbase.venue(),
        order.order_id,
        order.side,
        order.quantity,
        order.venue_symbol,
        order.price,
        order.status
    );

    let book = coinbase.normalize_order_book(COINBASE_BOOK.as_bytes())?;
    info!(
        "{:?} book: best bid {:?}, best ask {:?}, spread {:?}",
        book.venue_symbol, book.best_bid, book.best_ask, book.spread
    );

    let balance = prime.normalize_balance(PRIME_BALANCE.as_bytes())?;
    info!(
        "{} balance {:?}: total {:?}, available {:?}, locked {:?}",
        prime.venue(),
        balance.asset_id,
        balance.total,
        balance.available,
        balance.locked
    );

    let error = prime.normalize_error(400, PRIME_ERROR.as_bytes());
    warn!(
        "{} (retryable: {}, code: {:?})",
        error,
        error.is_retryable(),
        error.code
    );

    let error = coinbase.normalize_error(503, b"upstream connect error");
    warn!("{} (retryable: {})", error, error.is_retryable());

    Ok(())
}
