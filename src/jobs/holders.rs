//! Top-holders sync: keep the largest balances present locally so ranks
//! mean something. No notifications.

use eyre::Result;
use tracing::info;

use super::Ctx;
use crate::db;

pub async fn run(ctx: &Ctx) -> Result<()> {
    let rows = ctx.subscan.top_holders(ctx.cfg.page_size).await?;
    if rows.is_empty() {
        info!("holders: empty page, nothing to do");
        return Ok(());
    }

    let count = rows.len();
    {
        let conn = ctx.conn.lock().unwrap();
        for row in &rows {
            db::upsert_account(
                &conn,
                row.effective_address(),
                row.display(),
                row.balance,
                row.balance_lock,
            )?;
        }
    }

    info!("holders: {} accounts upserted", count);
    Ok(())
}
