//! Transfer ingestion: record and announce Astar transfers above the limit.

use eyre::Result;
use tracing::info;

use super::Ctx;
use crate::models::NewTransfer;
use crate::{db, message, policy};

pub async fn run(ctx: &Ctx) -> Result<()> {
    let transfers = ctx.subscan.transfers(ctx.cfg.page_size, 0).await?;
    if transfers.is_empty() {
        info!("transfers: empty page, nothing to do");
        return Ok(());
    }

    let mut recorded = 0;
    // the page comes newest-first; walk it oldest-first so notifications
    // stay chronological
    for row in transfers.iter().rev() {
        if !row.success || !policy::qualifies(row.amount, ctx.cfg.transfer_lower_limit) {
            continue;
        }
        let usd_amount = row.usd_amount.unwrap_or_default();

        let (from, to, created) = {
            let conn = ctx.conn.lock().unwrap();
            let from = db::get_or_create_account(&conn, &row.from, row.from_display())?;
            let to = db::get_or_create_account(&conn, &row.to, row.to_display())?;
            let created = db::insert_transfer_if_absent(
                &conn,
                &NewTransfer {
                    extrinsic_index: row.extrinsic_index.clone(),
                    from_address: from.address.clone(),
                    to_address: to.address.clone(),
                    asset_symbol: row.asset_symbol.clone(),
                    module: row.module.clone(),
                    amount: row.amount,
                    usd_amount,
                },
            )?;
            (from, to, created)
        };

        if created {
            recorded += 1;
            let (from_rank, to_rank) = {
                let conn = ctx.conn.lock().unwrap();
                (
                    db::account_rank(&conn, from.balance)?,
                    db::account_rank(&conn, to.balance)?,
                )
            };
            let text = message::transfer_message(
                &from,
                from_rank,
                &to,
                to_rank,
                row.amount,
                usd_amount,
                &row.asset_symbol,
            );
            ctx.notifier.send(&ctx.cfg.astar_chat_id, &text).await;
        }
    }

    info!("transfers: page processed, {} new", recorded);
    Ok(())
}
