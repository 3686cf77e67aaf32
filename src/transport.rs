//! Transport seam and the shipped HTTP implementation.
//!
//! The dispatch client only needs a round trip: hand a serialized envelope
//! to a port, get the raw response tree back. Implement [`Transport`] to
//! swap in a different carrier, e.g. an in-process fake for tests.

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::error::{JservLinkError, Result};
use crate::message::Port;

/// Carrier collaborator for serialized envelopes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a serialized envelope to `port` and return the raw response
    /// tree. Timeout enforcement lives here; it surfaces as a
    /// transport-class error.
    async fn round_trip(&self, port: Port, payload: JsonValue) -> Result<JsonValue>;
}

/// HTTP transport posting JSON envelopes to `{base_url}/{port}`.
///
/// # Examples
///
/// ```rust,no_run
/// use jserv_link::HttpTransport;
/// use std::time::Duration;
///
/// # fn main() -> jserv_link::Result<()> {
/// let transport = HttpTransport::builder()
///     .base_url("http://localhost:8080/jserv-sample")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct HttpTransport {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, port: Port, payload: JsonValue) -> Result<JsonValue> {
        let url = format!("{}/{}", self.base_url, port.url());
        debug!("[HTTP] POST {}", url);

        let response = self.http_client.post(&url).json(&payload).send().await?;
        let status = response.status();
        debug!("[HTTP] response status={}", status);

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable response body".to_string());
            warn!("[HTTP] server refused request: status={} body={}", status, text);
            return Err(JservLinkError::Transport(format!("{}: {}", status, text)));
        }

        Ok(response.json().await?)
    }
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    base_url: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
}

impl HttpTransportBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Service root, e.g. `http://localhost:8080/jserv-sample`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// TCP connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpTransport> {
        let base_url = self
            .base_url
            .ok_or_else(|| JservLinkError::Configuration("base_url is required".into()))?;

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| JservLinkError::Configuration(e.to_string()))?;

        Ok(HttpTransport {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }
}
