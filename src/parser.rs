// src/parser.rs
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::policy;

/// Number of decimals of the chain's native asset
pub const ASTR_DECIMALS: u32 = 18;

/// One entry of a Subscan extrinsic `params` array
#[derive(Debug, Deserialize)]
struct Param {
    #[serde(default)]
    type_name: Option<String>,
    #[serde(default)]
    value: serde_json::Value,
}

/// Decoded dapp-staking call parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StakingParams {
    /// EVM contract address of the staked dapp, when present
    pub dapp_address: Option<String>,
    /// Every Balance param converted to token units, in call order
    pub balances: Vec<Decimal>,
}

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("params are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("balance param is not an integer amount")]
    BadBalance,
}

/// Decode the JSON-encoded `params` string of a dapp-staking extrinsic.
pub fn decode_staking_params(raw: &str) -> Result<StakingParams, ParamError> {
    let params: Vec<Param> = serde_json::from_str(raw)?;

    let mut dapp_address = None;
    let mut balances = Vec::new();
    for param in &params {
        match param.type_name.as_deref() {
            Some("SmartContract") => {
                if let Some(evm) = param.value.get("Evm").and_then(|v| v.as_str()) {
                    dapp_address = Some(evm.to_string());
                }
            }
            Some("Balance") => {
                let amount = match &param.value {
                    serde_json::Value::String(s) => policy::parse_base_units(s, ASTR_DECIMALS),
                    serde_json::Value::Number(n) => policy::parse_base_units(&n.to_string(), ASTR_DECIMALS),
                    _ => None,
                }
                .ok_or(ParamError::BadBalance)?;
                balances.push(amount);
            }
            _ => {}
        }
    }

    Ok(StakingParams { dapp_address, balances })
}

/// Pick the recorded amount for a staking call. The amount is the last
/// Balance param in the list; the call qualifies as soon as any Balance
/// param clears the limit.
pub fn select_staked_amount(balances: &[Decimal], lower_limit: Decimal) -> (Decimal, bool) {
    let mut amount = Decimal::ZERO;
    let mut qualified = false;
    for balance in balances {
        amount = *balance;
        if policy::qualifies(*balance, lower_limit) {
            qualified = true;
        }
    }
    (amount, qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_contract_and_balance() {
        let raw = r#"[
            {"type_name": "SmartContract", "value": {"Evm": "0xD0000000000000000000000000000000000000D"}},
            {"type_name": "Balance", "value": "5000000000000000000"}
        ]"#;
        let params = decode_staking_params(raw).unwrap();
        assert_eq!(
            params.dapp_address.as_deref(),
            Some("0xD0000000000000000000000000000000000000D")
        );
        assert_eq!(params.balances, vec![Decimal::from(5)]);
    }

    #[test]
    fn balance_as_json_number_is_accepted() {
        let raw = r#"[{"type_name": "Balance", "value": 7000000000000000000}]"#;
        let params = decode_staking_params(raw).unwrap();
        assert_eq!(params.balances, vec![Decimal::from(7)]);
    }

    #[test]
    fn unknown_params_are_ignored() {
        let raw = r#"[{"type_name": "EraIndex", "value": 42}]"#;
        let params = decode_staking_params(raw).unwrap();
        assert!(params.dapp_address.is_none());
        assert!(params.balances.is_empty());
    }

    #[test]
    fn malformed_params_are_an_error() {
        assert!(decode_staking_params("not json").is_err());
        assert!(matches!(
            decode_staking_params(r#"[{"type_name": "Balance", "value": {"nested": true}}]"#),
            Err(ParamError::BadBalance)
        ));
    }

    #[test]
    fn last_balance_wins_and_any_qualifying_balance_counts() {
        let limit = Decimal::from(1_000_000);
        let balances = vec![Decimal::from(2_000_000), Decimal::from(5)];

        // recorded amount is the last param even though the first one qualified
        let (amount, qualified) = select_staked_amount(&balances, limit);
        assert_eq!(amount, Decimal::from(5));
        assert!(qualified);

        let (amount, qualified) = select_staked_amount(&[Decimal::from(5)], limit);
        assert_eq!(amount, Decimal::from(5));
        assert!(!qualified);

        let (amount, qualified) = select_staked_amount(&[], limit);
        assert_eq!(amount, Decimal::ZERO);
        assert!(!qualified);
    }
}
