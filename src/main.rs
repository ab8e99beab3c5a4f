mod config;
mod db;
mod directory;
mod jobs;
mod message;
mod models;
mod parser;
mod policy;
mod subscan;
mod telegram;
mod tonapi;

use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing::{error, info};

use crate::jobs::Ctx;

// Poll periods per job. The loops below are the only scheduling in the
// process; each job is a plain run() call.
const TRANSFERS_PERIOD: Duration = Duration::from_secs(60);
const STAKING_PERIOD: Duration = Duration::from_secs(60);
const DAPPS_PERIOD: Duration = Duration::from_secs(600);
const BALANCES_PERIOD: Duration = Duration::from_secs(3600);
const HOLDERS_PERIOD: Duration = Duration::from_secs(3600);
const TON_PERIOD: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    info!("Astar monitor starting...");

    // Load configuration
    let cfg = config::load()?;
    info!("Loaded config:");
    info!("  DB Path: {}", cfg.db_path);
    info!("  Subscan URL: {}", cfg.subscan_url);
    info!("  Transfer lower limit: {}", cfg.transfer_lower_limit);
    info!("  TON lower limit: {}", cfg.ton_lower_limit);
    info!("  Page size: {}", cfg.page_size);
    info!("  Balance batch size: {}", cfg.balance_batch_size);

    // Run DB migrations once at startup
    {
        let conn = db::connect(&cfg.db_path)?;
        db::run_migrations(&conn)?;
    }

    // Shared DB connection; every job goes through it, so conflict-target
    // inserts stay atomic across overlapping runs
    let conn = Arc::new(Mutex::new(db::connect(&cfg.db_path)?));

    let ctx = Arc::new(Ctx {
        subscan: subscan::SubscanClient::new(&cfg.subscan_url, &cfg.subscan_api_key)?,
        ton: tonapi::TonClient::new(&cfg.tonapi_url, &cfg.tonapi_key)?,
        notifier: telegram::TelegramNotifier::new(&cfg.telegram_token)?,
        conn,
        cfg,
    });

    let tasks = vec![
        spawn_job("transfers", Arc::clone(&ctx), TRANSFERS_PERIOD, |ctx| async move {
            jobs::transfers::run(&ctx).await
        }),
        spawn_job("staking", Arc::clone(&ctx), STAKING_PERIOD, |ctx| async move {
            jobs::staking::run(&ctx).await
        }),
        spawn_job("dapps", Arc::clone(&ctx), DAPPS_PERIOD, |ctx| async move {
            jobs::dapps::run(&ctx).await
        }),
        spawn_job("balances", Arc::clone(&ctx), BALANCES_PERIOD, |ctx| async move {
            jobs::balances::run(&ctx).await
        }),
        spawn_job("holders", Arc::clone(&ctx), HOLDERS_PERIOD, |ctx| async move {
            jobs::holders::run(&ctx).await
        }),
        spawn_job("ton", Arc::clone(&ctx), TON_PERIOD, |ctx| async move {
            jobs::ton::run(&ctx).await
        }),
    ];

    signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping...");
    for task in tasks {
        task.abort();
    }

    info!("Astar monitor stopped.");
    Ok(())
}

/// Tick a job forever. A failed run is logged and retried on the next tick;
/// nothing a job hits is fatal to the process.
fn spawn_job<F, Fut>(
    name: &'static str,
    ctx: Arc<Ctx>,
    period: Duration,
    job: F,
) -> tokio::task::JoinHandle<()>
where
    F: Fn(Arc<Ctx>) -> Fut + Send + 'static,
    Fut: Future<Output = eyre::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = job(Arc::clone(&ctx)).await {
                error!("{}: run failed: {:?}", name, e);
            }
        }
    })
}
