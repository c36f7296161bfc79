//! Poller: fetches review statuses, deduplicates, and dispatches notifications
//!
//! Each iteration runs fetch → validate → extract and then reports either the
//! new status or the failure through the notifier. The iteration itself never
//! fails, so the fixed sleep between iterations always happens.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::api::PracticumClient;
use crate::notifier::Notifier;
use crate::response::{check_response, parse_status};

/// A detected status change, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub message: String,
    /// Cursor to continue from once the update is handled
    pub current_date: Option<i64>,
}

/// What a single iteration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No homework changed since the cursor
    Idle,
    StatusSent(String),
    /// Same text as the last status notification, not sent again
    StatusSuppressed(String),
    ErrorSent(String),
    /// Same text as the last error notification, not sent again
    ErrorSuppressed(String),
    /// The notifier failed; nothing was cached
    NotifyFailed(String),
}

/// Owns the cursor and both dedup caches for the lifetime of the process
#[derive(Debug)]
pub struct Poller {
    api: PracticumClient,
    notifier: Arc<dyn Notifier>,
    retry_period: Duration,
    cursor: i64,
    last_status: String,
    last_error: String,
}

impl Poller {
    pub fn new(
        api: PracticumClient,
        notifier: Arc<dyn Notifier>,
        retry_period: Duration,
        initial_cursor: i64,
    ) -> Self {
        Self {
            api,
            notifier,
            retry_period,
            cursor: initial_cursor,
            last_status: String::new(),
            last_error: String::new(),
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_status(&self) -> &str {
        &self.last_status
    }

    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// Fetch, validate, and extract. `None` means nothing changed.
    pub async fn check_once(&self) -> crate::Result<Option<StatusUpdate>> {
        let response = self.api.get_api_answer(self.cursor).await?;
        let checked = check_response(&response)?;

        let Some(homework) = checked.homeworks.first() else {
            return Ok(None);
        };

        let message = parse_status(homework)?;
        Ok(Some(StatusUpdate {
            message,
            current_date: checked.current_date,
        }))
    }

    /// Run one iteration and report its outcome through the notifier.
    pub async fn tick(&mut self) -> TickOutcome {
        match self.check_once().await {
            Ok(None) => {
                tracing::info!(
                    "Homework status unchanged, next request in {} min",
                    self.retry_period.as_secs() / 60
                );
                TickOutcome::Idle
            }
            Ok(Some(update)) => self.report_status(update).await,
            Err(e) => {
                let message = format!("Ошибка во время работы бота {}", e);
                tracing::error!("{}", message);
                self.report_error(message).await
            }
        }
    }

    async fn report_status(&mut self, update: StatusUpdate) -> TickOutcome {
        tracing::info!("Homework status changed: {}", update.message);

        if update.message == self.last_status {
            tracing::debug!("Status message already sent, skipping");
            self.advance_cursor(update.current_date);
            return TickOutcome::StatusSuppressed(update.message);
        }

        match self.notifier.send_message(&update.message).await {
            Ok(()) => {
                self.advance_cursor(update.current_date);
                self.last_status = update.message.clone();
                TickOutcome::StatusSent(update.message)
            }
            Err(e) => {
                tracing::error!(
                    "Status notification via '{}' failed: {}",
                    self.notifier.type_name(),
                    e
                );
                TickOutcome::NotifyFailed(update.message)
            }
        }
    }

    async fn report_error(&mut self, message: String) -> TickOutcome {
        if message == self.last_error {
            tracing::debug!("Error message already sent, skipping");
            return TickOutcome::ErrorSuppressed(message);
        }

        // a failure here is logged only; re-reporting it would loop
        match self.notifier.send_message(&message).await {
            Ok(()) => {
                self.last_error = message.clone();
                TickOutcome::ErrorSent(message)
            }
            Err(e) => {
                tracing::warn!(
                    "Error notification via '{}' failed: {}",
                    self.notifier.type_name(),
                    e
                );
                TickOutcome::NotifyFailed(message)
            }
        }
    }

    fn advance_cursor(&mut self, current_date: Option<i64>) {
        if let Some(date) = current_date {
            tracing::debug!("Advancing cursor {} -> {}", self.cursor, date);
            self.cursor = date;
        }
    }

    /// Poll until the cancellation token is triggered, sleeping the retry
    /// period after every iteration.
    pub async fn run(&mut self, cancel: &CancellationToken) {
        tracing::debug!(
            "Polling {} every {:?}",
            self.api.endpoint(),
            self.retry_period
        );

        loop {
            let outcome = self.tick().await;
            tracing::debug!("Iteration finished: {:?}", outcome);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Polling loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(self.retry_period) => {}
            }
        }
    }
}

pub fn current_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
