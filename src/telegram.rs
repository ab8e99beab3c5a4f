// src/telegram.rs
use eyre::Result;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

/// Telegram notifier. Delivery is at-most-once: failures are logged and
/// swallowed so a failed send never disturbs an already recorded event.
pub struct TelegramNotifier {
    client: Client,
    token: String,
}

impl TelegramNotifier {
    pub fn new(token: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            token: token.to_string(),
        })
    }

    /// Deliver an HTML message to a chat
    pub async fn send(&self, chat_id: &str, text: &str) {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        match self.client.post(&url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("sent notification to chat {}", chat_id);
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                warn!("telegram send failed: HTTP {} {}", status, body);
            }
            Err(e) => warn!("telegram send failed: {}", e),
        }
    }
}
