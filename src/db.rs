use chrono::Utc;
use eyre::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

use crate::models::{Account, Dapp, NewTransfer, TonAccount};

const INIT_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
  id           INTEGER PRIMARY KEY AUTOINCREMENT,
  address      TEXT UNIQUE NOT NULL,
  name         TEXT NOT NULL DEFAULT '',
  display      TEXT NOT NULL DEFAULT '',
  balance      TEXT NOT NULL DEFAULT '0', -- Decimal stored as string
  balance_lock TEXT NOT NULL DEFAULT '0',
  created_at   TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS dapps (
  id              INTEGER PRIMARY KEY AUTOINCREMENT,
  name            TEXT NOT NULL,
  account_address TEXT UNIQUE NOT NULL REFERENCES accounts(address),
  created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS transfers (
  id              INTEGER PRIMARY KEY AUTOINCREMENT,
  extrinsic_index TEXT UNIQUE NOT NULL,
  from_address    TEXT NOT NULL,
  to_address      TEXT NOT NULL,
  asset_symbol    TEXT NOT NULL DEFAULT '',
  module          TEXT NOT NULL DEFAULT '',
  amount          TEXT NOT NULL DEFAULT '0',
  usd_amount      TEXT NOT NULL DEFAULT '0',
  created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS ton_accounts (
  id      INTEGER PRIMARY KEY AUTOINCREMENT,
  address TEXT UNIQUE NOT NULL,
  name    TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS ton_transfers (
  id                  INTEGER PRIMARY KEY AUTOINCREMENT,
  hash                TEXT UNIQUE NOT NULL,
  source_address      TEXT NOT NULL,
  destination_address TEXT NOT NULL,
  amount              TEXT NOT NULL DEFAULT '0',
  created_at          TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Connect to SQLite (with WAL mode for performance)
pub fn connect(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    Ok(conn)
}

/// Run schema migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(INIT_SQL)?;
    Ok(())
}

fn account_from_row(row: &Row) -> rusqlite::Result<Account> {
    let balance: String = row.get(3)?;
    let balance_lock: String = row.get(4)?;
    Ok(Account {
        address: row.get(0)?,
        name: row.get(1)?,
        display: row.get(2)?,
        balance: Decimal::from_str(&balance).unwrap_or(Decimal::ZERO),
        balance_lock: Decimal::from_str(&balance_lock).unwrap_or(Decimal::ZERO),
        updated_at: row.get(5)?,
    })
}

/// Look an account up by address
pub fn account_by_address(conn: &Connection, address: &str) -> Result<Option<Account>> {
    let account = conn
        .query_row(
            "SELECT address, name, display, balance, balance_lock, updated_at
             FROM accounts WHERE address = ?1",
            [address],
            account_from_row,
        )
        .optional()?;
    Ok(account)
}

/// Resolve an address to a stored account, creating it on first sight.
/// Existing rows come back untouched whatever display is supplied; balances
/// are only ever populated by the sync jobs.
pub fn get_or_create_account(conn: &Connection, address: &str, display: &str) -> Result<Account> {
    conn.execute(
        "INSERT INTO accounts (address, display) VALUES (?1, ?2)
         ON CONFLICT(address) DO NOTHING",
        params![address, display],
    )?;
    account_by_address(conn, address)?
        .ok_or_else(|| eyre::eyre!("account {} missing after insert", address))
}

/// Create or refresh an account from a top-holders row
pub fn upsert_account(
    conn: &Connection,
    address: &str,
    display: &str,
    balance: Decimal,
    balance_lock: Decimal,
) -> Result<()> {
    conn.execute(
        "INSERT INTO accounts (address, display, balance, balance_lock)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(address) DO UPDATE SET
             display      = excluded.display,
             balance      = excluded.balance,
             balance_lock = excluded.balance_lock,
             updated_at   = ?5",
        params![
            address,
            display,
            balance.to_string(),
            balance_lock.to_string(),
            Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Refresh balances in place, leaving name and display alone
pub fn update_account_balance(
    conn: &Connection,
    address: &str,
    balance: Decimal,
    balance_lock: Decimal,
) -> Result<()> {
    conn.execute(
        "UPDATE accounts SET balance = ?2, balance_lock = ?3, updated_at = ?4
         WHERE address = ?1",
        params![
            address,
            balance.to_string(),
            balance_lock.to_string(),
            Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Addresses of accounts with a locally assigned name, the balance-sync
/// input set
pub fn tracked_addresses(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT address FROM accounts WHERE name != '' ORDER BY id")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Count of accounts holding at least the given balance. Tied balances all
/// share the same value.
pub fn account_rank(conn: &Connection, balance: Decimal) -> Result<i64> {
    let rank = conn.query_row(
        "SELECT COUNT(*) FROM accounts
         WHERE CAST(balance AS REAL) >= CAST(?1 AS REAL)",
        [balance.to_string()],
        |row| row.get(0),
    )?;
    Ok(rank)
}

/// Record a transfer once. Returns true iff this call created the row; a
/// replay of the same extrinsic index leaves the stored row untouched.
pub fn insert_transfer_if_absent(conn: &Connection, transfer: &NewTransfer) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO transfers (
            extrinsic_index, from_address, to_address,
            asset_symbol, module, amount, usd_amount
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(extrinsic_index) DO NOTHING",
        params![
            transfer.extrinsic_index,
            transfer.from_address,
            transfer.to_address,
            transfer.asset_symbol,
            transfer.module,
            transfer.amount.to_string(),
            transfer.usd_amount.to_string()
        ],
    )?;
    Ok(inserted > 0)
}

/// Backing addresses of every known dapp
pub fn dapp_addresses(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT account_address FROM dapps")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<rusqlite::Result<HashSet<_>>>()?)
}

/// Register a dapp once. Returns true iff this call created the row.
pub fn insert_dapp_if_absent(conn: &Connection, name: &str, account_address: &str) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO dapps (name, account_address) VALUES (?1, ?2)
         ON CONFLICT(account_address) DO NOTHING",
        params![name, account_address],
    )?;
    Ok(inserted > 0)
}

/// The dapp backed by the given account, when listed
pub fn dapp_for_account(conn: &Connection, account_address: &str) -> Result<Option<Dapp>> {
    let dapp = conn
        .query_row(
            "SELECT name, account_address FROM dapps WHERE account_address = ?1",
            [account_address],
            |row| {
                Ok(Dapp {
                    name: row.get(0)?,
                    account_address: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(dapp)
}

/// The TON watch-list. Seeded out of band; read-only here.
pub fn ton_accounts(conn: &Connection) -> Result<Vec<TonAccount>> {
    let mut stmt = conn.prepare("SELECT address, name FROM ton_accounts ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(TonAccount {
            address: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Record a TON transfer once, keyed on the transaction hash
pub fn insert_ton_transfer_if_absent(
    conn: &Connection,
    hash: &str,
    source_address: &str,
    destination_address: &str,
    amount: Decimal,
) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO ton_transfers (hash, source_address, destination_address, amount)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(hash) DO NOTHING",
        params![hash, source_address, destination_address, amount.to_string()],
    )?;
    Ok(inserted > 0)
}
