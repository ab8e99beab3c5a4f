use dotenvy::dotenv;
use eyre::Result;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub subscan_url: String,
    pub subscan_api_key: String,
    pub dapps_url: String,
    pub tonapi_url: String,
    pub tonapi_key: String,
    pub telegram_token: String,
    pub astar_chat_id: String,
    pub ton_chat_id: String,
    pub transfer_lower_limit: Decimal,
    pub ton_lower_limit: Decimal,
    pub page_size: u32,
    pub balance_batch_size: usize,
    pub ton_request_delay_ms: u64,
}

pub fn load() -> Result<Config> {
    dotenv().ok(); // Load from .env file

    // SQLite DB path (default: monitor.db)
    let db_path = env::var("DATABASE_URL").unwrap_or_else(|_| "monitor.db".to_string());

    let subscan_url = env::var("SUBSCAN_API_URL")
        .unwrap_or_else(|_| "https://astar.api.subscan.io".to_string());
    let subscan_api_key = env::var("SUBSCAN_API_KEY").unwrap_or_default();

    let dapps_url = env::var("DAPPS_URL").unwrap_or_else(|_| {
        "https://api.astar.network/api/v1/astar/dapps-staking/dapps".to_string()
    });

    let tonapi_url = env::var("TON_API_URL").unwrap_or_else(|_| "https://tonapi.io".to_string());
    let tonapi_key = env::var("TON_API_KEY").unwrap_or_default();

    let telegram_token = env::var("TELEGRAM_TOKEN").unwrap_or_default();
    let astar_chat_id = env::var("TELEGRAM_CHAT_ID").unwrap_or_default();
    let ton_chat_id = env::var("TON_TELEGRAM_CHAT_ID").unwrap_or_default();

    // lower limits in token units, one per chain
    let transfer_lower_limit = decimal_var("TRANSFER_LOWER_LIMIT", Decimal::from(1_000_000));
    let ton_lower_limit = decimal_var("TON_TRANSFER_LOWER_LIMIT", Decimal::from(10_000));

    // page size for transfer/extrinsic/holder fetches (default: 100)
    let page_size = env::var("PAGE_SIZE")
        .unwrap_or_else(|_| "100".to_string())
        .parse()
        .unwrap_or(100);

    // max addresses per balance request (default: 100)
    let balance_batch_size = env::var("BALANCE_BATCH_SIZE")
        .unwrap_or_else(|_| "100".to_string())
        .parse()
        .unwrap_or(100);

    // pause between watched-address fetches (default: 1000ms)
    let ton_request_delay_ms = env::var("TON_REQUEST_DELAY_MS")
        .unwrap_or_else(|_| "1000".to_string())
        .parse()
        .unwrap_or(1000);

    Ok(Config {
        db_path,
        subscan_url,
        subscan_api_key,
        dapps_url,
        tonapi_url,
        tonapi_key,
        telegram_token,
        astar_chat_id,
        ton_chat_id,
        transfer_lower_limit,
        ton_lower_limit,
        page_size,
        balance_batch_size,
        ton_request_delay_ms,
    })
}

fn decimal_var(key: &str, default: Decimal) -> Decimal {
    env::var(key)
        .ok()
        .and_then(|v| Decimal::from_str(&v).ok())
        .unwrap_or(default)
}
