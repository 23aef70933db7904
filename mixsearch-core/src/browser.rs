//! Browser rendering via a Browserless-compatible `/content` endpoint.
//!
//! JavaScript-heavy and bot-walled pages need a real browser. Rather
//! than driving a local browser process, rendering is delegated to a
//! Browserless-style service: each `/content` call runs in an isolated
//! browser session that the service creates and tears down per request,
//! so acquisition and release are scoped to the HTTP call on every exit
//! path, including errors.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http;

/// Client for a Browserless-compatible rendering service.
#[derive(Debug, Clone)]
pub struct BrowserClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    /// Navigation timeout forwarded to the browser, in milliseconds.
    goto_timeout_ms: u64,
    /// Extra delay after network idle for dynamic content to settle.
    settle_delay_ms: u64,
}

impl BrowserClient {
    /// Build a rendering client from the service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        // The outer HTTP timeout must cover navigation plus the settle
        // delay, with headroom for service queueing.
        let outer_timeout =
            Duration::from_secs(config.browser_timeout_seconds + 10);
        let client = http::build_client(outer_timeout)?;

        Ok(Self {
            client,
            base_url: config.browser_endpoint.trim_end_matches('/').to_owned(),
            token: config.browser_token.clone(),
            goto_timeout_ms: config.browser_timeout_seconds * 1000,
            settle_delay_ms: config.settle_delay_ms,
        })
    }

    /// Render `url` in an isolated browser session and return the
    /// resulting HTML.
    ///
    /// The session navigates, waits for network idle, then waits the
    /// configured settle delay before serialising the DOM. The session
    /// is torn down by the service when the request completes,
    /// regardless of outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Browser`] on transport failure, a non-2xx
    /// service response, or an empty render.
    pub async fn render(&self, url: &str) -> Result<String> {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let body = serde_json::json!({
            "url": url,
            "gotoOptions": {
                "waitUntil": "networkidle0",
                "timeout": self.goto_timeout_ms,
            },
            "waitForTimeout": self.settle_delay_ms,
        });

        tracing::trace!(url, "browser render request");

        let response = self
            .client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Browser(format!("render request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Browser(format!(
                "render service returned {status}: {message}"
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Browser(format!("render response read failed: {e}")))?;

        // An empty render must not masquerade as a successful fetch.
        if html.trim().is_empty() {
            return Err(SearchError::Browser("render returned empty HTML".into()));
        }

        tracing::trace!(bytes = html.len(), "browser render complete");
        Ok(html)
    }
}
