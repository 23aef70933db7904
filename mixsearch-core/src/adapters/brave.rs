//! Browser-rendered Brave Search adapter.
//!
//! Brave's results page is JavaScript-rendered, so this adapter renders
//! the SERP in an isolated browser session (one per call, torn down
//! unconditionally by the rendering service) and scrapes result blocks
//! from the settled DOM with structural selectors.

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::browser::BrowserClient;
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::types::{AdapterKind, SearchFilters, SearchResult};

use super::{now_timestamp, SearchAdapter};

/// Browser-rendered Brave SERP scraper.
///
/// Maps country, language, and recency filters to Brave's own query
/// encoding. The source filter is not supported by this adapter and is
/// ignored.
pub struct BraveBrowserAdapter {
    browser: BrowserClient,
}

impl BraveBrowserAdapter {
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the browser client cannot be
    /// constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            browser: BrowserClient::new(config)?,
        })
    }

    fn build_search_url(query: &str, filters: &SearchFilters) -> String {
        build_serp_url("search", query, filters, /* country_supported */ true)
    }
}

/// Construct a Brave SERP URL for the given vertical path.
///
/// Shared with the metasearch primary sub-backend, which queries the
/// same engine without a browser. `country_supported` is false for that
/// sub-backend, which cannot target regions.
pub(crate) fn build_serp_url(
    vertical: &str,
    query: &str,
    filters: &SearchFilters,
    country_supported: bool,
) -> String {
    let mut url = Url::parse("https://search.brave.com/")
        .expect("static URL is valid")
        .join(vertical)
        .expect("vertical path is valid");
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("q", query);
        pairs.append_pair("spellcheck", "1");
        if country_supported {
            if let Some(ref country) = filters.country {
                pairs.append_pair("country", &country.to_uppercase());
            }
        }
        if let Some(ref language) = filters.language {
            pairs.append_pair("lang", language);
        }
        if let Some(range) = filters.time_range() {
            pairs.append_pair("tf", range.short_code());
        }
    }
    url.into()
}

/// Parse a Brave SERP (rendered or raw) into search results.
///
/// Result blocks are `.snippet` elements: the first anchor supplies
/// title and href, an adjacent `.snippet-description`/`.snippet-content`
/// block supplies the description. News snippets may carry a
/// `<time datetime=...>` element, used as the result timestamp.
pub(crate) fn parse_brave_serp(html: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(".snippet")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse("a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let desc_sel = Selector::parse(".snippet-description, .snippet-content")
        .map_err(|e| SearchError::Parse(format!("invalid description selector: {e:?}")))?;
    let date_sel = Selector::parse("time[datetime]")
        .map_err(|e| SearchError::Parse(format!("invalid date selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = title_el.text().collect::<String>().trim().to_owned();
        if title.is_empty() {
            continue;
        }

        let Some(href) = title_el.value().attr("href") else {
            continue;
        };

        let Some(description) = element
            .select(&desc_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_owned())
        else {
            continue;
        };

        let timestamp = element
            .select(&date_sel)
            .next()
            .and_then(|el| el.value().attr("datetime"))
            .map(str::to_owned)
            .unwrap_or_else(now_timestamp);

        results.push(SearchResult::new(
            title,
            href.to_owned(),
            description,
            timestamp,
        ));

        if results.len() >= limit {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Brave results parsed");
    Ok(results)
}

#[async_trait]
impl SearchAdapter for BraveBrowserAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::BraveBrowser
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>> {
        if let Some(source) = filters.source {
            tracing::debug!(?source, "source filter not supported by browser adapter, ignoring");
        }

        let url = Self::build_search_url(query, filters);
        tracing::trace!(query, %url, "Brave browser search");

        let html = self.browser.render(&url).await?;
        parse_brave_serp(&html, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_BRAVE_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="snippet">
    <a href="https://www.rust-lang.org/">Rust Programming Language</a>
    <div class="snippet-description">
        A language empowering everyone to build reliable and efficient software.
    </div>
</div>
<div class="snippet">
    <a href="https://blog.rust-lang.org/2025/01/01/release.html">Rust 1.99 released</a>
    <time datetime="2025-01-01T12:00:00Z">Jan 1</time>
    <div class="snippet-content">
        Announcing the newest stable release of Rust.
    </div>
</div>
<div class="snippet">
    <a href="https://crates.io/">crates.io</a>
    <div class="snippet-description">The Rust community's crate registry.</div>
</div>
<div class="snippet">
    <a href="https://no-description.example.com/">No description here</a>
</div>
</body>
</html>"#;

    #[test]
    fn parse_mock_serp_returns_results() {
        let results = parse_brave_serp(MOCK_BRAVE_HTML, 10).expect("should parse");
        // The block without a description element is skipped.
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].url, "https://www.rust-lang.org/");
        assert!(results[0].description.contains("reliable"));
    }

    #[test]
    fn parse_uses_datetime_when_present() {
        let results = parse_brave_serp(MOCK_BRAVE_HTML, 10).expect("should parse");
        assert_eq!(results[1].timestamp, "2025-01-01T12:00:00Z");
        // Non-news results get a current timestamp.
        assert_ne!(results[0].timestamp, results[1].timestamp);
    }

    #[test]
    fn parse_respects_limit() {
        let results = parse_brave_serp(MOCK_BRAVE_HTML, 1).expect("should parse");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn parse_empty_html_returns_empty() {
        let results = parse_brave_serp("<html><body></body></html>", 10);
        assert!(results.expect("should parse").is_empty());
    }

    #[test]
    fn search_url_includes_all_supported_filters() {
        let filters = SearchFilters {
            recency_days: Some(5),
            language: Some("fr".into()),
            country: Some("fr".into()),
            ..Default::default()
        };
        let url = BraveBrowserAdapter::build_search_url("tour de france", &filters);
        assert!(url.starts_with("https://search.brave.com/search?"));
        assert!(url.contains("q=tour+de+france"));
        assert!(url.contains("country=FR"));
        assert!(url.contains("lang=fr"));
        assert!(url.contains("tf=w"));
    }

    #[test]
    fn search_url_without_filters_has_only_query() {
        let url = BraveBrowserAdapter::build_search_url("rust", &SearchFilters::default());
        assert!(url.contains("q=rust"));
        assert!(!url.contains("country="));
        assert!(!url.contains("lang="));
        assert!(!url.contains("tf="));
    }

    #[test]
    fn serp_url_vertical_paths() {
        let filters = SearchFilters::default();
        assert!(build_serp_url("news", "x", &filters, false)
            .starts_with("https://search.brave.com/news?"));
        assert!(build_serp_url("images", "x", &filters, false)
            .starts_with("https://search.brave.com/images?"));
    }

    #[test]
    fn serp_url_country_suppressed_when_unsupported() {
        let filters = SearchFilters {
            country: Some("us".into()),
            ..Default::default()
        };
        let url = build_serp_url("search", "x", &filters, false);
        assert!(!url.contains("country="));
    }

    #[test]
    fn adapter_kind_is_brave_browser() {
        let adapter = BraveBrowserAdapter::new(&SearchConfig::default()).expect("adapter");
        assert_eq!(adapter.kind(), AdapterKind::BraveBrowser);
    }
}
