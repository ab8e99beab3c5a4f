//! Balance sync for tracked accounts. Pure state refresh, no notifications.

use eyre::Result;
use tracing::{info, warn};

use super::Ctx;
use crate::db;

pub async fn run(ctx: &Ctx) -> Result<()> {
    let addresses = {
        let conn = ctx.conn.lock().unwrap();
        db::tracked_addresses(&conn)?
    };
    if addresses.is_empty() {
        info!("balances: no tracked accounts");
        return Ok(());
    }

    // the source API caps the number of addresses per request
    for batch in addresses.chunks(ctx.cfg.balance_batch_size) {
        let rows = match ctx.subscan.accounts(batch).await {
            Ok(rows) => rows,
            Err(e) => {
                // the next scheduled run re-fetches the whole set anyway
                warn!("balances: batch fetch failed, aborting run: {}", e);
                return Ok(());
            }
        };

        let conn = ctx.conn.lock().unwrap();
        for row in rows {
            db::update_account_balance(&conn, row.effective_address(), row.balance, row.balance_lock)?;
        }
    }

    info!("balances: {} tracked accounts refreshed", addresses.len());
    Ok(())
}
