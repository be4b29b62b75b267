use crate::error::{Result, VenueXError};
use crate::normalizer::common::{
    decode_list_or_single, non_empty, null_as_default, parse_decimal_or_zero, parse_timestamp_lenient,
};
use crate::types::Balance;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct CoinbaseAccount {
    uuid: Option<String>,
    currency: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    available_balance: AccountAmount,
    #[serde(default, deserialize_with = "null_as_default")]
    hold: AccountAmount,
    updated_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AccountAmount {
    value: Option<String>,
}

impl AccountAmount {
    fn decimal(&self) -> f64 {
        parse_decimal_or_zero(self.value.as_deref().unwrap_or_default())
    }
}

/// Accepts `{"accounts": [...]}` or a bare account
fn decode_accounts(raw: &[u8]) -> Result<Vec<CoinbaseAccount>> {
    decode_list_or_single(raw, "coinbase", "account", "accounts")
}

fn to_balance(account: CoinbaseAccount) -> Balance {
    let available = account.available_balance.decimal();
    let hold = account.hold.decimal();

    Balance {
        account_id: non_empty(account.uuid.as_deref()),
        asset_id: non_empty(account.currency.as_deref()),
        total: Some(available + hold),
        available: Some(available),
        locked: Some(hold),
        updated_at: account.updated_at.as_deref().and_then(parse_timestamp_lenient),
    }
}

pub(super) fn normalize_balance(raw: &[u8]) -> Result<Balance> {
    decode_accounts(raw)?
        .into_iter()
        .next()
        .map(to_balance)
        .ok_or_else(|| VenueXError::parse("coinbase accounts response contains no accounts"))
}

/// Normalize all accounts of an accounts response
pub fn normalize_balances(raw: &[u8]) -> Result<Vec<Balance>> {
    Ok(decode_accounts(raw)?.into_iter().map(to_balance).collect())
}

/// Total (available + hold) per currency
pub fn account_totals(raw: &[u8]) -> Result<HashMap<String, f64>> {
    Ok(decode_accounts(raw)?
        .into_iter()
        .map(|account| {
            let total = account.available_balance.decimal() + account.hold.decimal();
            (account.currency.unwrap_or_default(), total)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNTS: &[u8] = include_bytes!("../../../testdata/coinbase/accounts.json");

    #[test]
    fn test_first_account() {
        let balance = normalize_balance(ACCOUNTS).unwrap();
        assert_eq!(
            balance.account_id.as_deref(),
            Some("8bfc20d7-f7c6-4422-bf07-8243ca4169fe")
        );
        assert_eq!(balance.asset_id.as_deref(), Some("BTC"));
        assert_eq!(balance.available, Some(1.25));
        assert_eq!(balance.locked, Some(0.25));
        assert_eq!(balance.total, Some(1.5));
        assert!(balance.updated_at.is_some());
    }

    #[test]
    fn test_all_accounts() {
        let balances = normalize_balances(ACCOUNTS).unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[1].asset_id.as_deref(), Some("USD"));
        assert_eq!(balances[1].total, Some(1000.5));
        assert_eq!(balances[1].locked, Some(0.0));
    }

    #[test]
    fn test_single_account_object() {
        let raw = br#"{"uuid": "a", "currency": "ETH", "available_balance": {"value": "2"}, "hold": {"value": "1"}}"#;
        let balance = normalize_balance(raw).unwrap();
        assert_eq!(balance.total, Some(3.0));
        assert_eq!(balance.available, Some(2.0));
        assert_eq!(normalize_balances(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_account_list() {
        assert!(normalize_balances(br#"{"accounts": []}"#).unwrap().is_empty());
        assert!(normalize_balance(br#"{"accounts": []}"#).unwrap_err().is_parse());
    }

    #[test]
    fn test_account_totals() {
        let totals = account_totals(ACCOUNTS).unwrap();
        assert_eq!(totals.get("BTC"), Some(&1.5));
        assert_eq!(totals.get("USD"), Some(&1000.5));
    }

    #[test]
    fn test_null_hold() {
        let raw = br#"{"uuid": "a", "currency": "BTC", "available_balance": {"value": "2"}, "hold": null}"#;
        let balance = normalize_balance(raw).unwrap();
        assert_eq!(balance.locked, Some(0.0));
        assert_eq!(balance.total, Some(2.0));
    }
}
