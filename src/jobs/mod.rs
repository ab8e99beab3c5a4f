//! Poller jobs. Each one is a single straight-line invocation over
//! fetch → filter → resolve → record → notify, driven by the interval
//! loops in main. Jobs keep no state between invocations; replayed pages
//! are absorbed by the conflict-target inserts in `db`.

pub mod balances;
pub mod dapps;
pub mod holders;
pub mod staking;
pub mod ton;
pub mod transfers;

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::subscan::SubscanClient;
use crate::telegram::TelegramNotifier;
use crate::tonapi::TonClient;

/// Everything a job invocation needs, built once at startup
pub struct Ctx {
    pub cfg: Config,
    pub conn: Arc<Mutex<Connection>>,
    pub subscan: SubscanClient,
    pub ton: TonClient,
    pub notifier: TelegramNotifier,
}
