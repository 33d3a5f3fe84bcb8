//! Telegram Bot API notifier

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use super::Notifier;
use crate::config::TelegramConfig;
use crate::error::AlertError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

pub struct TelegramNotifier {
    endpoint: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self, AlertError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &TelegramConfig, client: reqwest::Client) -> Self {
        Self {
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.base_url.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text: message,
            parse_mode: "HTML",
        };

        // The endpoint embeds the bot token, keep it out of error messages.
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AlertError::from(e.without_url()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "telegram rejected message");
            return Err(AlertError::Notification(format!(
                "telegram returned {}: {}",
                status, body
            )));
        }

        debug!(chars = message.len(), "telegram message delivered");
        Ok(())
    }
}
