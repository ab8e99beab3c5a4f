//! TON transfer ingestion over the watched-address list.

use eyre::Result;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use super::Ctx;
use crate::models::TonAccount;
use crate::tonapi::TonParty;
use crate::{db, message, policy};

/// TON amounts come in nanotons
const TON_DECIMALS: u32 = 9;

pub async fn run(ctx: &Ctx) -> Result<()> {
    let watched = {
        let conn = ctx.conn.lock().unwrap();
        db::ton_accounts(&conn)?
    };
    if watched.is_empty() {
        info!("ton: watch-list is empty");
        return Ok(());
    }

    let mut recorded = 0;
    for (i, account) in watched.iter().enumerate() {
        if i > 0 {
            // tonapi rate limit
            sleep(Duration::from_millis(ctx.cfg.ton_request_delay_ms)).await;
        }

        let transactions = match ctx.ton.account_transactions(&account.address).await {
            Ok(transactions) => transactions,
            Err(e) => {
                warn!("ton: fetch failed for {}: {}", account.address, e);
                continue;
            }
        };

        for tx in transactions {
            let Some(in_msg) = tx.in_msg else { continue };
            let (Some(value), Some(source), Some(destination)) =
                (in_msg.value, in_msg.source, in_msg.destination)
            else {
                continue;
            };

            let Some(amount) = policy::from_base_units(u128::from(value), TON_DECIMALS) else {
                continue;
            };
            if !policy::qualifies(amount, ctx.cfg.ton_lower_limit) {
                continue;
            }

            let created = {
                let conn = ctx.conn.lock().unwrap();
                db::insert_ton_transfer_if_absent(
                    &conn,
                    &tx.hash,
                    &source.address,
                    &destination.address,
                    amount,
                )?
            };

            if created {
                recorded += 1;
                let text = message::ton_transfer_message(
                    &source.address,
                    &party_name(account, &source),
                    &destination.address,
                    &party_name(account, &destination),
                    amount,
                );
                ctx.notifier.send(&ctx.cfg.ton_chat_id, &text).await;
            }
        }
    }

    info!("ton: watch-list processed, {} new", recorded);
    Ok(())
}

/// Watch-list name first, then whatever name the source supplies; an empty
/// result makes the formatter fall back to the raw address.
fn party_name(watched: &TonAccount, party: &TonParty) -> String {
    if party.address == watched.address {
        watched.name.clone()
    } else {
        party.name.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watched_address_takes_the_local_name() {
        let watched = TonAccount {
            address: "EQwatched".to_string(),
            name: "treasury".to_string(),
        };

        let own = TonParty {
            address: "EQwatched".to_string(),
            name: Some("api label".to_string()),
        };
        assert_eq!(party_name(&watched, &own), "treasury");

        let counterpart = TonParty {
            address: "EQother".to_string(),
            name: Some("bridge".to_string()),
        };
        assert_eq!(party_name(&watched, &counterpart), "bridge");

        let anonymous = TonParty {
            address: "EQanon".to_string(),
            name: None,
        };
        assert_eq!(party_name(&watched, &anonymous), "");
    }
}
