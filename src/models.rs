// src/models.rs
use rust_decimal::Decimal;

/// A locally known account on the Astar chain
#[derive(Debug, Clone)]
pub struct Account {
    pub address: String,
    pub name: String,         // assigned locally; non-empty marks a tracked account
    pub display: String,      // on-chain identity display, set once on first sighting
    pub balance: Decimal,
    pub balance_lock: Decimal,
    pub updated_at: String,   // stored + returned as plain string
}

impl Account {
    /// Label shown in notifications: local name, then on-chain display,
    /// then the raw address.
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.display.is_empty() {
            &self.display
        } else {
            &self.address
        }
    }
}

/// A dapp registered for dapp staking, tied to its contract account
#[derive(Debug, Clone)]
pub struct Dapp {
    pub name: String,
    pub account_address: String,
}

/// Field set for a transfer row about to be recorded
#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub extrinsic_index: String,
    pub from_address: String,
    pub to_address: String,
    pub asset_symbol: String,
    pub module: String,
    pub amount: Decimal,
    pub usd_amount: Decimal,
}

/// A watched TON address
#[derive(Debug, Clone)]
pub struct TonAccount {
    pub address: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, display: &str) -> Account {
        Account {
            address: "aAddr".to_string(),
            name: name.to_string(),
            display: display.to_string(),
            balance: Decimal::ZERO,
            balance_lock: Decimal::ZERO,
            updated_at: String::new(),
        }
    }

    #[test]
    fn label_prefers_name_then_display_then_address() {
        assert_eq!(account("alice", "Alice on-chain").label(), "alice");
        assert_eq!(account("", "Alice on-chain").label(), "Alice on-chain");
        assert_eq!(account("", "").label(), "aAddr");
    }
}
