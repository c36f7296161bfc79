//! Homework bot - review status watcher
//!
//! Polls the homework review API, detects status changes for the latest
//! submission, and relays them to a Telegram chat.

pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod notifier;
pub mod poller;
pub mod response;
pub mod telegram;

pub use config::{load_config, Config};
pub use error::{BotError, Result};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::PracticumClient;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::poller::Poller;
use crate::telegram::TelegramNotifier;

/// Assembles a [`Bot`] from configuration, with optional injected collaborators
pub struct BotBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    notifier: Option<Arc<dyn Notifier>>,
    cancel: Option<CancellationToken>,
}

impl BotBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            notifier: None,
            cancel: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Replace the Telegram notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Check credentials and wire up the poller. Performs no network calls.
    pub fn build(self) -> Result<Bot> {
        if let Err(e) = self.config.credentials().check_tokens() {
            tracing::error!("Credential check failed: {}", e);
            return Err(e);
        }

        let http = self
            .http
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let notifier = self.notifier.unwrap_or_else(|| {
            Arc::new(TelegramNotifier::new(
                &self.config.telegram,
                Arc::clone(&http),
            ))
        });

        let api = PracticumClient::new(&self.config.practicum, http);
        let initial_cursor = self
            .config
            .polling
            .initial_from_date
            .unwrap_or_else(poller::current_epoch_secs);
        let retry_period = Duration::from_secs(self.config.polling.retry_period_seconds);

        let startup_message = self
            .config
            .startup_message
            .filter(|message| !message.trim().is_empty());

        Ok(Bot {
            poller: Poller::new(api, Arc::clone(&notifier), retry_period, initial_cursor),
            notifier,
            startup_message,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// A configured bot, ready to start
#[derive(Debug)]
pub struct Bot {
    poller: Poller,
    notifier: Arc<dyn Notifier>,
    startup_message: Option<String>,
    cancel: CancellationToken,
}

impl Bot {
    /// Send the greeting, then poll until cancelled.
    pub async fn start(mut self) -> Result<()> {
        if let Some(message) = &self.startup_message {
            match self.notifier.send_message(message).await {
                Ok(()) => tracing::debug!("Startup greeting sent"),
                Err(e) => tracing::warn!("Failed to send startup greeting: {}", e),
            }
        }

        tracing::info!("Homework bot started, cursor={}", self.poller.cursor());
        self.poller.run(&self.cancel).await;
        tracing::info!("Homework bot stopped");

        Ok(())
    }
}
