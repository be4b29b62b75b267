use crate::error::Result;
use crate::normalizer::common::{decode, non_empty, parse_decimal_or_zero};
use crate::types::Balance;
use serde::Deserialize;

/// Portfolio balance of one asset
#[derive(Debug, Deserialize)]
struct PrimeBalance {
    symbol: Option<String>,
    amount: Option<String>,
    holds: Option<String>,
}

/// Balance of one asset in one wallet
#[derive(Debug, Deserialize)]
struct PrimeWalletBalance {
    symbol: Option<String>,
    amount: Option<String>,
    holds: Option<String>,
    wallet_id: Option<String>,
}

/// Amount is the total; holds are locked; the rest is available
fn split_amount(amount: Option<&str>, holds: Option<&str>) -> (f64, f64, f64) {
    let total = parse_decimal_or_zero(amount.unwrap_or_default());
    let locked = parse_decimal_or_zero(holds.unwrap_or_default());
    (total, total - locked, locked)
}

pub(super) fn normalize_balance(raw: &[u8]) -> Result<Balance> {
    let prime: PrimeBalance = decode(raw, "prime", "balance")?;
    let (total, available, locked) = split_amount(prime.amount.as_deref(), prime.holds.as_deref());

    Ok(Balance {
        account_id: None,
        asset_id: non_empty(prime.symbol.as_deref()),
        total: Some(total),
        available: Some(available),
        locked: Some(locked),
        updated_at: None,
    })
}

/// Normalize a wallet balance response
pub fn normalize_wallet_balance(raw: &[u8]) -> Result<Balance> {
    let wallet: PrimeWalletBalance = decode(raw, "prime", "wallet balance")?;
    let (total, available, locked) = split_amount(wallet.amount.as_deref(), wallet.holds.as_deref());

    Ok(Balance {
        account_id: non_empty(wallet.wallet_id.as_deref()),
        asset_id: non_empty(wallet.symbol.as_deref()),
        total: Some(total),
        available: Some(available),
        locked: Some(locked),
        updated_at: None,
    })
}
