//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::TelegramConfig;
use crate::io::HttpClient;
use crate::notifier::Notifier;
use crate::BotError;

/// Envelope every Bot API response is wrapped in
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to a single chat through the Telegram Bot API
///
/// ```no_run
/// use std::sync::Arc;
/// use homework_bot::config::TelegramConfig;
/// use homework_bot::io::ReqwestHttpClient;
/// use homework_bot::notifier::Notifier;
/// use homework_bot::telegram::TelegramNotifier;
///
/// let config = TelegramConfig {
///     token: "123:abc".to_string(),
///     chat_id: "42".to_string(),
///     ..TelegramConfig::default()
/// };
/// let notifier = TelegramNotifier::new(&config, Arc::new(ReqwestHttpClient::new()));
/// tokio_test::block_on(async {
///     notifier.send_message("hello").await.unwrap();
/// });
/// ```
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, http: Arc<dyn HttpClient>) -> Self {
        let send_url = format!(
            "{}/bot{}/sendMessage",
            config.api_url.trim_end_matches('/'),
            config.token
        );

        tracing::debug!("Created TelegramNotifier for chat {}", config.chat_id);

        Self {
            send_url,
            chat_id: config.chat_id.clone(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, text: &str) -> crate::Result<()> {
        let params = [("chat_id", self.chat_id.as_str()), ("text", text)];

        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        let response = self
            .http
            .post_form(&self.send_url, &params)
            .await
            .map_err(|e| BotError::MessageSend(e.to_string()))?;

        if response.status != 200 {
            return Err(BotError::MessageSend(format!(
                "Telegram API returned status {}: {}",
                response.status, response.body
            )));
        }

        match serde_json::from_str::<ApiEnvelope>(&response.body) {
            Ok(envelope) if !envelope.ok => {
                return Err(BotError::MessageSend(format!(
                    "Telegram API rejected the message: {}",
                    envelope.description.unwrap_or_default()
                )));
            }
            Ok(_) => {}
            Err(e) => {
                return Err(BotError::MessageSend(format!(
                    "Unparseable Telegram response body: {}",
                    e
                )));
            }
        }

        tracing::info!("Message sent to Telegram chat {}", self.chat_id);
        Ok(())
    }
}
