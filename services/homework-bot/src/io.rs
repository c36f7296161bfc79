//! HTTP client abstraction for testability

use async_trait::async_trait;

use crate::BotError;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with extra headers and query parameters
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse>;

    /// Send a POST request with form-encoded body
    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Split transport failures into "never reached the host" and everything else.
fn transport_error(method: &str, url: &str, e: reqwest::Error) -> BotError {
    if e.is_connect() {
        BotError::Connection(format!("{} {} failed: {}", method, url, e))
    } else {
        BotError::Http(format!("{} {} failed: {}", method, url, e))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {} {:?}", url, query);
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error("GET", url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }

    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        // url may embed a bot token, so only the path tail is logged
        let shown = url.rsplit('/').next().unwrap_or_default();
        tracing::debug!("POST .../{}", shown);
        let response = self
            .client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| transport_error("POST", shown, e.without_url()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::Http(format!("Reading response body: {}", e.without_url())))?;

        tracing::debug!("POST .../{} -> {} ({} bytes)", shown, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
