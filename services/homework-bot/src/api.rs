//! Client for the homework review status API

use std::sync::Arc;

use serde_json::Value;

use crate::config::PracticumConfig;
use crate::io::HttpClient;
use crate::BotError;

/// Fetches homework statuses changed since a given point in time
pub struct PracticumClient {
    endpoint: String,
    auth_header: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &PracticumConfig, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            auth_header: format!("OAuth {}", config.token),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request statuses changed since `from_date` (epoch seconds) and decode
    /// the body as JSON.
    pub async fn get_api_answer(&self, from_date: i64) -> crate::Result<Value> {
        let from_date = from_date.to_string();
        tracing::debug!("Requesting homework statuses from_date={}", from_date);

        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.auth_header.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await
            .map_err(|e| match e {
                BotError::Connection(msg) => BotError::ApiConnection(msg),
                BotError::Http(msg) => BotError::GetApiAnswer(msg),
                other => BotError::Unexpected(other.to_string()),
            })?;

        if response.status != 200 {
            tracing::debug!(
                "Non-200 response from review API: status={}",
                response.status
            );
            return Err(BotError::WrongStatusCode(response.status));
        }

        serde_json::from_str(&response.body).map_err(|e| BotError::ApiJson(e.to_string()))
    }
}
