// src/message.rs
//! Notification text for the Telegram channels. Pure string building over
//! already resolved inputs, no I/O.

use rust_decimal::Decimal;

use crate::models::{Account, Dapp};

const SUBSCAN_ACCOUNT_URL: &str = "https://astar.subscan.io/account/";
const PORTAL_DAPP_URL: &str = "https://portal.astar.network/astar/dapp-staking/dapp?dapp=";
const TONVIEWER_URL: &str = "https://tonviewer.com/";

/// Ranks below this show up as "Top {rank}"
const TOP_RANK_CUTOFF: i64 = 100;

/// Format an amount with thousands separators and fixed two decimals,
/// e.g. "2,000,000.00".
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), format!("{:0<2}", frac_part)),
        None => (text, "00".to_string()),
    };

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// HTML link to an account's Subscan page
pub fn subscan_link(account: &Account) -> String {
    format!(
        "<a href='{}{}'>{}</a>",
        SUBSCAN_ACCOUNT_URL,
        account.address,
        account.label()
    )
}

/// HTML link to a dapp's page on the Astar portal
pub fn portal_link(dapp: &Dapp) -> String {
    format!(
        "<a href='{}{}'>{}</a>",
        PORTAL_DAPP_URL, dapp.account_address, dapp.name
    )
}

fn tonviewer_link(address: &str, name: &str) -> String {
    let label = if name.is_empty() { address } else { name };
    format!("<a href='{}{}'>{}</a>", TONVIEWER_URL, address, label)
}

fn ranked_party(role: &str, link: &str, rank: i64) -> String {
    if rank < TOP_RANK_CUTOFF {
        format!("{}(Top {}): {}", role, rank, link)
    } else {
        format!("{}: {}", role, link)
    }
}

/// Message for a qualifying peer-to-peer transfer
pub fn transfer_message(
    from: &Account,
    from_rank: i64,
    to: &Account,
    to_rank: i64,
    amount: Decimal,
    usd_amount: Decimal,
    asset_symbol: &str,
) -> String {
    let sender = ranked_party("Sender", &subscan_link(from), from_rank);
    let receiver = ranked_party("Receiver", &subscan_link(to), to_rank);
    format!(
        "{}\n{}\nAmount: {} {}({} USD)\n",
        sender,
        receiver,
        format_amount(amount),
        asset_symbol,
        format_amount(usd_amount),
    )
}

/// Message for a bond/unbond staking call. The dapp line is omitted when the
/// staked contract is not in the local listing.
pub fn staking_message(
    account: &Account,
    rank: i64,
    dapp: Option<&Dapp>,
    action: &str,
    amount: Decimal,
    asset_symbol: &str,
) -> String {
    let acc = ranked_party("Account", &subscan_link(account), rank);
    let mut message = format!("{}\nAction: {}\n", acc, action);
    if let Some(dapp) = dapp {
        message.push_str(&format!("Dapp: {}\n", portal_link(dapp)));
    }
    message.push_str(&format!("Amount: {} {}\n", format_amount(amount), asset_symbol));
    message
}

/// Message for a newly listed dapp
pub fn new_dapp_message(dapp: &Dapp) -> String {
    format!("New dapp has been added: {}\n", portal_link(dapp))
}

/// Message for a qualifying TON transfer. Parties without a resolved name
/// fall back to the raw address.
pub fn ton_transfer_message(
    source_address: &str,
    source_name: &str,
    destination_address: &str,
    destination_name: &str,
    amount: Decimal,
) -> String {
    let sender = tonviewer_link(source_address, source_name);
    let receiver = tonviewer_link(destination_address, destination_name);
    format!(
        "Sender: {}\nReceiver: {}\nAmount: {} TON\n",
        sender,
        receiver,
        format_amount(amount),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn account(address: &str, display: &str, balance: i64) -> Account {
        Account {
            address: address.to_string(),
            name: String::new(),
            display: display.to_string(),
            balance: Decimal::from(balance),
            balance_lock: Decimal::ZERO,
            updated_at: String::new(),
        }
    }

    #[test]
    fn amounts_get_separators_and_two_decimals() {
        assert_eq!(format_amount(Decimal::from(2_000_000)), "2,000,000.00");
        assert_eq!(format_amount(Decimal::from_str("1234.5").unwrap()), "1,234.50");
        assert_eq!(format_amount(Decimal::from_str("0.125").unwrap()), "0.12");
        assert_eq!(format_amount(Decimal::from(999)), "999.00");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn transfer_message_carries_rank_and_amounts() {
        let from = account("0xA", "alice", 100);
        let to = account("0xB", "", 1);

        let text = transfer_message(
            &from,
            3,
            &to,
            250,
            Decimal::from(2_000_000),
            Decimal::from(120_000),
            "ASTR",
        );

        assert!(text.contains("Sender(Top 3): <a href='https://astar.subscan.io/account/0xA'>alice</a>"));
        // rank 250 gets no Top annotation and the bare address as label
        assert!(text.contains("Receiver: <a href='https://astar.subscan.io/account/0xB'>0xB</a>"));
        assert!(text.contains("Amount: 2,000,000.00 ASTR(120,000.00 USD)"));
    }

    #[test]
    fn staking_message_omits_missing_dapp() {
        let staker = account("0xA", "whale", 10);
        let dapp = Dapp {
            name: "AstridDEX".to_string(),
            account_address: "0xd1".to_string(),
        };

        let with_dapp = staking_message(
            &staker,
            1,
            Some(&dapp),
            "bond_and_stake",
            Decimal::from(1_500_000),
            "ASTR",
        );
        assert!(with_dapp.contains("Account(Top 1)"));
        assert!(with_dapp.contains("Action: bond_and_stake"));
        assert!(with_dapp.contains("Dapp: <a href='https://portal.astar.network/astar/dapp-staking/dapp?dapp=0xd1'>AstridDEX</a>"));
        assert!(with_dapp.contains("Amount: 1,500,000.00 ASTR"));

        let without_dapp = staking_message(
            &staker,
            1,
            None,
            "unbond_and_unstake",
            Decimal::from(1_500_000),
            "ASTR",
        );
        assert!(!without_dapp.contains("Dapp:"));
    }

    #[test]
    fn ton_message_falls_back_to_raw_address() {
        let text = ton_transfer_message("EQsrc", "bridge", "EQdst", "", Decimal::from(15_000));
        assert!(text.contains("Sender: <a href='https://tonviewer.com/EQsrc'>bridge</a>"));
        assert!(text.contains("Receiver: <a href='https://tonviewer.com/EQdst'>EQdst</a>"));
        assert!(text.contains("Amount: 15,000.00 TON"));
    }
}
