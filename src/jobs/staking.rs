//! Dapp-staking ingestion: bond/unbond calls above the limit. A staking
//! call is recorded as a self-referential transfer of the staking account.

use eyre::Result;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::Ctx;
use crate::models::NewTransfer;
use crate::{db, message, parser};

const STAKING_MODULE: &str = "dappsstaking";
const STAKING_CALLS: [&str; 2] = ["bond_and_stake", "unbond_and_unstake"];
const STAKING_ASSET: &str = "ASTR";

pub async fn run(ctx: &Ctx) -> Result<()> {
    let extrinsics = ctx
        .subscan
        .extrinsics(ctx.cfg.page_size, 0, STAKING_MODULE)
        .await?;
    if extrinsics.is_empty() {
        info!("staking: empty page, nothing to do");
        return Ok(());
    }

    let mut recorded = 0;
    for row in extrinsics.iter().rev() {
        let Some(call) = row.call_module_function.as_deref() else {
            continue;
        };
        if !row.success || !STAKING_CALLS.contains(&call) {
            continue;
        }
        let (Some(raw_params), Some(account_id)) = (row.params.as_deref(), row.account_id.as_deref())
        else {
            continue;
        };

        let params = match parser::decode_staking_params(raw_params) {
            Ok(params) => params,
            Err(e) => {
                warn!("staking: skipping extrinsic {}: {}", row.extrinsic_index, e);
                continue;
            }
        };
        let Some(dapp_address) = params.dapp_address else {
            continue;
        };
        let (amount, qualified) =
            parser::select_staked_amount(&params.balances, ctx.cfg.transfer_lower_limit);
        if !qualified {
            continue;
        }

        let (account, dapp, created) = {
            let conn = ctx.conn.lock().unwrap();
            let account = db::get_or_create_account(&conn, account_id, "")?;
            let created = db::insert_transfer_if_absent(
                &conn,
                &NewTransfer {
                    extrinsic_index: row.extrinsic_index.clone(),
                    from_address: account.address.clone(),
                    to_address: account.address.clone(),
                    asset_symbol: STAKING_ASSET.to_string(),
                    module: call.to_string(),
                    amount,
                    usd_amount: Decimal::ZERO,
                },
            )?;
            // unlisted dapps still record; the message just has no dapp link
            let dapp_account = db::get_or_create_account(&conn, &dapp_address, "")?;
            let dapp = db::dapp_for_account(&conn, &dapp_account.address)?;
            (account, dapp, created)
        };

        if created {
            recorded += 1;
            let rank = {
                let conn = ctx.conn.lock().unwrap();
                db::account_rank(&conn, account.balance)?
            };
            let text =
                message::staking_message(&account, rank, dapp.as_ref(), call, amount, STAKING_ASSET);
            ctx.notifier.send(&ctx.cfg.astar_chat_id, &text).await;
        }
    }

    info!("staking: page processed, {} new", recorded);
    Ok(())
}
