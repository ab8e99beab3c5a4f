// src/subscan.rs
use eyre::{eyre, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

/// One row from the `transfers` resource
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRow {
    #[serde(default)]
    pub success: bool,
    pub amount: Decimal,
    #[serde(default)]
    pub usd_amount: Option<Decimal>,
    #[serde(default)]
    pub asset_symbol: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub from_account_display: Option<DisplayInfo>,
    #[serde(default)]
    pub to_address_display: Option<DisplayInfo>,
    pub extrinsic_index: String,
    #[serde(default)]
    pub module: String,
}

impl TransferRow {
    pub fn from_display(&self) -> &str {
        display_of(&self.from_account_display)
    }

    pub fn to_display(&self) -> &str {
        display_of(&self.to_address_display)
    }
}

/// One row from the `extrinsics` resource
#[derive(Debug, Clone, Deserialize)]
pub struct ExtrinsicRow {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub call_module_function: Option<String>,
    pub extrinsic_index: String,
    /// JSON-encoded array of `{type_name, value}`
    #[serde(default)]
    pub params: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

/// One row from the `accounts` resource
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRow {
    pub address: String,
    #[serde(default)]
    pub substrate_account: Option<SubstrateAccount>,
    pub balance: Decimal,
    #[serde(default)]
    pub balance_lock: Decimal,
    #[serde(default)]
    pub account_display: Option<DisplayInfo>,
}

impl AccountRow {
    /// EVM-mapped rows carry the canonical address in `substrate_account`
    pub fn effective_address(&self) -> &str {
        self.substrate_account
            .as_ref()
            .map(|a| a.address.as_str())
            .unwrap_or(&self.address)
    }

    pub fn display(&self) -> &str {
        display_of(&self.account_display)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubstrateAccount {
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayInfo {
    #[serde(default)]
    pub display: Option<String>,
}

fn display_of(info: &Option<DisplayInfo>) -> &str {
    info.as_ref()
        .and_then(|d| d.display.as_deref())
        .unwrap_or("")
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Subscan API client for the Astar network
pub struct SubscanClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SubscanClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn request(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        info!("subscan request: {}", url);

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(eyre!("subscan error: HTTP {}", resp.status()));
        }

        let parsed: ApiResponse = resp.json().await?;
        parsed.data.ok_or_else(|| eyre!("subscan response has no data"))
    }

    /// Most recent page of transfers, newest first
    pub async fn transfers(&self, row: u32, page: u32) -> Result<Vec<TransferRow>> {
        let data = self
            .request("/api/v2/scan/transfers", json!({ "row": row, "page": page }))
            .await?;
        Ok(decode_rows(data.get("transfers"), "transfer"))
    }

    /// Most recent page of extrinsics for one module, newest first
    pub async fn extrinsics(&self, row: u32, page: u32, module: &str) -> Result<Vec<ExtrinsicRow>> {
        // extrinsics is still a v1 resource
        let data = self
            .request(
                "/api/scan/extrinsics",
                json!({ "row": row, "page": page, "module": module }),
            )
            .await?;
        Ok(decode_rows(data.get("extrinsics"), "extrinsic"))
    }

    /// Balances for a batch of addresses
    pub async fn accounts(&self, addresses: &[String]) -> Result<Vec<AccountRow>> {
        let data = self
            .request("/api/v2/scan/accounts", json!({ "address": addresses }))
            .await?;
        Ok(decode_rows(data.get("list"), "account"))
    }

    /// Top accounts by balance, descending
    pub async fn top_holders(&self, row: u32) -> Result<Vec<AccountRow>> {
        let data = self
            .request(
                "/api/v2/scan/accounts",
                json!({ "row": row, "page": 0, "order_field": "balance", "order": "desc" }),
            )
            .await?;
        Ok(decode_rows(data.get("list"), "account"))
    }
}

/// Decode rows one by one so a single malformed row is skipped instead of
/// dropping the whole page.
pub(crate) fn decode_rows<T: serde::de::DeserializeOwned>(
    rows: Option<&serde_json::Value>,
    what: &str,
) -> Vec<T> {
    let Some(rows) = rows.and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| match serde_json::from_value(row.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("skipping malformed {} row: {}", what, e);
                None
            }
        })
        .collect()
}
