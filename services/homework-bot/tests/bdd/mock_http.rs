//! Scripted HTTP client shared by the BDD steps

use std::collections::VecDeque;

use homework_bot::io::{HttpClient, HttpResponse};
use homework_bot::BotError;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// What the next GET should produce
#[derive(Debug, Clone)]
pub enum ScriptedGet {
    Response(HttpResponse),
    ConnectionRefused,
    Timeout,
}

/// A recorded GET request
#[derive(Debug, Clone)]
pub struct RecordedGet {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

/// A recorded POST request
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedPost {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// GETs are answered from a script (the last entry repeats once the script
/// runs out); POSTs succeed unless `post_failure` is set.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    pub script: RwLock<VecDeque<ScriptedGet>>,
    pub post_failure: Option<HttpResponse>,
    pub post_unreachable: bool,
    /// Cancel this token once the given number of GETs has been served
    pub cancel_after: Option<(usize, CancellationToken)>,
    pub gets: RwLock<Vec<RecordedGet>>,
    pub posts: RwLock<Vec<RecordedPost>>,
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl ScriptedHttpClient {
    pub async fn push(&self, entry: ScriptedGet) {
        self.script.write().await.push_back(entry);
    }

    /// Texts of every message posted to the bot API, in order
    pub async fn sent_texts(&self) -> Vec<String> {
        self.posts
            .read()
            .await
            .iter()
            .filter_map(|p| p.param("text").map(str::to_string))
            .collect()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        let served = {
            let mut gets = self.gets.write().await;
            gets.push(RecordedGet {
                url: url.to_string(),
                headers: owned(headers),
                query: owned(query),
            });
            gets.len()
        };

        if let Some((limit, cancel)) = &self.cancel_after {
            if served >= *limit {
                cancel.cancel();
            }
        }

        let next = {
            let mut script = self.script.write().await;
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        match next {
            Some(ScriptedGet::Response(response)) => Ok(response),
            Some(ScriptedGet::ConnectionRefused) => Err(BotError::Connection(
                "connection refused".to_string(),
            )),
            Some(ScriptedGet::Timeout) => Err(BotError::Http("operation timed out".to_string())),
            None => Ok(HttpResponse {
                status: 200,
                body: r#"{"homeworks": [], "current_date": 0}"#.to_string(),
            }),
        }
    }

    async fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        if self.post_unreachable {
            return Err(BotError::Connection("connection refused".to_string()));
        }
        if let Some(failure) = &self.post_failure {
            return Ok(failure.clone());
        }

        self.posts.write().await.push(RecordedPost {
            url: url.to_string(),
            params: owned(params),
        });
        Ok(HttpResponse {
            status: 200,
            body: r#"{"ok":true,"result":{"message_id":1}}"#.to_string(),
        })
    }
}
