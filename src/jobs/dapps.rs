//! Dapp discovery: pick up newly listed dapps from the portal directory
//! and announce them.

use eyre::Result;
use tracing::info;

use super::Ctx;
use crate::models::Dapp;
use crate::{db, directory, message};

pub async fn run(ctx: &Ctx) -> Result<()> {
    let listing = directory::fetch_dapps(&ctx.cfg.dapps_url).await?;

    let known = {
        let conn = ctx.conn.lock().unwrap();
        db::dapp_addresses(&conn)?
    };

    let mut added = 0;
    for row in listing {
        let address = row.address.to_lowercase();
        if address.is_empty() || known.contains(&address) {
            continue;
        }

        let created = {
            let conn = ctx.conn.lock().unwrap();
            db::get_or_create_account(&conn, &address, "")?;
            db::insert_dapp_if_absent(&conn, &row.name, &address)?
        };

        if created {
            added += 1;
            let dapp = Dapp {
                name: row.name.clone(),
                account_address: address,
            };
            ctx.notifier
                .send(&ctx.cfg.astar_chat_id, &message::new_dapp_message(&dapp))
                .await;
        }
    }

    info!("dapps: listing processed, {} new", added);
    Ok(())
}
