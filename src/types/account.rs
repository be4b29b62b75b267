//! Account balance types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical balance of one asset in one account
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Balance {
    /// Account, portfolio or wallet the balance belongs to
    pub account_id: Option<String>,
    /// Asset symbol (e.g. "BTC")
    pub asset_id: Option<String>,
    /// Total balance (available + locked)
    pub total: Option<f64>,
    /// Balance available for trading or withdrawal
    pub available: Option<f64>,
    /// Balance held by open orders or pending transfers
    pub locked: Option<f64>,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
}
