use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Something that can tell a chat about a listing.
///
/// Delivery is best effort by contract: callers log a failed send and move on,
/// so implementations should not retry internally.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, chat_id: &str, url: &str) -> Result<()>;
}

/// Notifier backed by the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    token: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            token: token.into(),
        })
    }

    fn send_message_endpoint(&self) -> String {
        format!("{TELEGRAM_API_BASE}/bot{}/sendMessage", self.token)
    }

    fn message_for(url: &str) -> String {
        format!("I found a new house on Funda for you: {url}")
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, chat_id: &str, url: &str) -> Result<()> {
        let payload = json!({
            "chat_id": chat_id,
            "text": Self::message_for(url),
        });

        let response = self
            .client
            .post(self.send_message_endpoint())
            .json(&payload)
            .send()
            .await
            .context("Failed to reach the Telegram API")?;

        if !response.status().is_success() {
            anyhow::bail!("Telegram API answered with status {}", response.status());
        }

        debug!("Message sent to chat {}", chat_id);
        Ok(())
    }
}
