//! Two-tier page content extraction.
//!
//! The fast path is a plain HTTP fetch parsed with CSS selectors; it is
//! cheap but blind to JavaScript-rendered content and easily served a
//! bot wall. Its output is truncated to the caller's cap and then
//! checked for *meaningfulness*: too-short text or text containing a
//! bot-detection phrase forces the slow path, which renders the page in
//! an isolated browser session and probes common content containers.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::browser::BrowserClient;
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http;

/// Phrases that indicate a bot wall rather than page content. Tunable
/// heuristics, matched case-insensitively against extracted text.
const BOT_INDICATORS: &[&str] = &[
    "captcha",
    "blocked",
    "access denied",
    "robot",
    "verification",
    "403",
    "forbidden",
];

/// Fast-path text shorter than this is assumed to be a placeholder or
/// an error page rather than real content.
const MIN_MEANINGFUL_CHARS: usize = 100;

/// Boilerplate fragments at or under this length are dropped.
const MIN_FRAGMENT_CHARS: usize = 20;

/// Content containers probed by the slow path, in priority order.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    ".content",
    ".post",
    ".entry",
    "#content",
    "#main",
];

/// Where page HTML comes from: a plain fetch or a browser render.
///
/// The seam between tier selection and the network, so the fallback
/// decision can be exercised without either.
#[async_trait]
pub(crate) trait PageSource: Send + Sync {
    /// Raw HTML from a plain HTTP GET.
    async fn fetch(&self, url: &str) -> Result<String>;
    /// HTML after rendering in an isolated browser session.
    async fn render(&self, url: &str) -> Result<String>;
}

struct LivePageSource {
    client: reqwest::Client,
    user_agent: Option<String>,
    browser: BrowserClient,
}

#[async_trait]
impl PageSource for LivePageSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::USER_AGENT,
                http::user_agent_for_request(self.user_agent.as_deref()),
            )
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("page fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("page HTTP error: {e}")))?;

        response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("page read failed: {e}")))
    }

    async fn render(&self, url: &str) -> Result<String> {
        self.browser.render(url).await
    }
}

/// Extracts readable text from web pages.
pub struct ContentExtractor {
    source: Box<dyn PageSource>,
}

impl ContentExtractor {
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP or browser client
    /// cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            source: Box::new(LivePageSource {
                client: http::build_client(Duration::from_secs(config.fetch_timeout_seconds))?,
                user_agent: config.user_agent.clone(),
                browser: BrowserClient::new(config)?,
            }),
        })
    }

    #[cfg(test)]
    fn with_source(source: Box<dyn PageSource>) -> Self {
        Self { source }
    }

    /// Extract the readable text of `url`, truncated to `max_length`
    /// characters if set.
    ///
    /// Tries the fast HTTP path first. Its output is truncated and then
    /// judged: if the truncated text is not meaningful (see
    /// [`is_meaningful`]), the slow browser path takes over. A fast
    /// path transport failure also falls back rather than failing the
    /// extraction outright.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail.
    pub async fn extract(&self, url: &str, max_length: Option<usize>) -> Result<String> {
        match self.source.fetch(url).await {
            Ok(html) => {
                let text = truncate_chars(fast_path_text(&html), max_length);
                if is_meaningful(&text) {
                    tracing::debug!(url, chars = text.chars().count(), "fast path succeeded");
                    return Ok(text);
                }
                tracing::debug!(
                    url,
                    chars = text.chars().count(),
                    "fast path output not meaningful, falling back to browser"
                );
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "fast path failed, falling back to browser");
            }
        }

        let html = self.source.render(url).await?;
        let text = truncate_chars(rendered_text(&html), max_length);
        tracing::debug!(url, chars = text.chars().count(), "slow path succeeded");
        Ok(text)
    }
}

/// Whether fast-path output looks like real page content.
///
/// Rejects text under 100 characters and text containing any
/// bot-detection phrase, forcing the browser fallback.
pub fn is_meaningful(text: &str) -> bool {
    if text.chars().count() < MIN_MEANINGFUL_CHARS {
        return false;
    }
    let lowered = text.to_lowercase();
    !BOT_INDICATORS.iter().any(|phrase| lowered.contains(phrase))
}

/// Truncate to at most `max` characters, on a char boundary.
fn truncate_chars(text: String, max: Option<usize>) -> String {
    match max {
        Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
        _ => text,
    }
}

/// Harvest readable text from raw HTML: paragraph, heading, and
/// list-item elements outside navigation chrome, with boilerplate
/// fragments (20 chars or fewer) dropped, joined by blank lines.
pub(crate) fn fast_path_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("p, h1, h2, h3, h4, h5, h6, li") else {
        return String::new();
    };

    let mut fragments = Vec::new();
    for element in document.select(&selector) {
        if in_non_content_region(element) {
            continue;
        }
        let text = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if text.chars().count() > MIN_FRAGMENT_CHARS {
            fragments.push(text);
        }
    }

    fragments.join("\n\n")
}

/// Whether an element sits inside chrome that never carries article
/// content: nav/header/footer/aside or an ad container.
fn in_non_content_region(element: ElementRef<'_>) -> bool {
    for ancestor in element.ancestors().filter_map(ElementRef::wrap) {
        let name = ancestor.value().name();
        if matches!(name, "nav" | "header" | "footer" | "aside" | "script" | "style") {
            return true;
        }
        if let Some(class) = ancestor.value().attr("class") {
            if class
                .split_whitespace()
                .any(|c| c == "ad" || c == "ads" || c.starts_with("advert"))
            {
                return true;
            }
        }
    }
    false
}

/// Pull content from rendered HTML by probing common content
/// containers, falling back to the whole body text.
pub(crate) fn rendered_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = collect_block_text(element);
            if !text.is_empty() {
                return text;
            }
        }
    }

    if let Ok(body_sel) = Selector::parse("body") {
        if let Some(body) = document.select(&body_sel).next() {
            return collect_block_text(body);
        }
    }
    String::new()
}

fn collect_block_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
