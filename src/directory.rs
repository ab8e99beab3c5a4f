// src/directory.rs
use eyre::{eyre, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// One entry of the dapp-staking directory listing
#[derive(Debug, Clone, Deserialize)]
pub struct DappRow {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
}

/// Fetch the full current dapp listing from the portal API.
pub async fn fetch_dapps(url: &str) -> Result<Vec<DappRow>> {
    let client = Client::builder().timeout(Duration::from_secs(15)).build()?;

    info!("directory request: {}", url);
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(eyre!("directory error: HTTP {}", resp.status()));
    }

    Ok(resp.json().await?)
}
