//! HTTP transport for the upstream API.
//!
//! One GET, fixed headers, no retry of its own. Retry and proxy fallback
//! are layered on top.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

/// Seam between the fetch stack and the network, so tests can substitute
/// a scripted implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET and return the parsed JSON body.
    async fn get(&self, url: &str) -> Result<Value, FetchError>;
}

/// Production transport over a pooled `reqwest` client.
pub struct HttpTransport {
    client: Client,
    headers: HeaderMap,
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // The upstream rejects requests without a browser-ish agent.
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));

        Self {
            client: Client::new(),
            headers,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url = %url, "issuing GET");

        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network {
                status: Some(status.as_u16()),
                message: format!("upstream returned {status}"),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::MalformedBody(e.to_string()))
    }
}
