// src/tonapi.rs
use eyre::{eyre, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::subscan::decode_rows;

/// One transaction of a watched account
#[derive(Debug, Clone, Deserialize)]
pub struct TonTransaction {
    pub hash: String,
    #[serde(default)]
    pub in_msg: Option<TonMessage>,
}

/// The incoming message of a transaction, when it carries value
#[derive(Debug, Clone, Deserialize)]
pub struct TonMessage {
    /// Amount in nanotons
    #[serde(default)]
    pub value: Option<u64>,
    #[serde(default)]
    pub source: Option<TonParty>,
    #[serde(default)]
    pub destination: Option<TonParty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TonParty {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// tonapi.io client for the TON network
pub struct TonClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TonClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Recent transactions of one account
    pub async fn account_transactions(&self, address: &str) -> Result<Vec<TonTransaction>> {
        let url = format!("{}/v2/blockchain/accounts/{}/transactions", self.base_url, address);
        info!("tonapi request: {}", url);

        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(eyre!("tonapi error: HTTP {}", resp.status()));
        }

        let body: serde_json::Value = resp.json().await?;
        Ok(decode_rows(body.get("transactions"), "ton transaction"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transactions_decode_with_optional_in_msg() {
        let page = json!([
            {
                "hash": "abc123",
                "in_msg": {
                    "value": 15_000_000_000u64,
                    "source": {"address": "EQsrc", "name": "bridge"},
                    "destination": {"address": "EQdst"}
                }
            },
            {"hash": "def456"},
            // required hash missing, skipped
            {"in_msg": {"value": 1}}
        ]);

        let rows: Vec<TonTransaction> = decode_rows(Some(&page), "ton transaction");
        assert_eq!(rows.len(), 2);

        let msg = rows[0].in_msg.as_ref().unwrap();
        assert_eq!(msg.value, Some(15_000_000_000));
        assert_eq!(msg.source.as_ref().unwrap().name.as_deref(), Some("bridge"));
        assert!(msg.destination.as_ref().unwrap().name.is_none());
        assert!(rows[1].in_msg.is_none());
    }
}
