//! Notifier trait for relaying messages to the student

use async_trait::async_trait;

/// Trait for sending notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Send a message to the configured destination
    async fn send_message(&self, text: &str) -> crate::Result<()>;
}
