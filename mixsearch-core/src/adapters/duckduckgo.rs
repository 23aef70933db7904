//! HTTP-only DuckDuckGo adapter — last-resort backend.
//!
//! Issues a direct GET against the JavaScript-free results page at
//! `https://duckduckgo.com/html/` and parses result blocks with CSS
//! selectors. DuckDuckGo wraps outbound links in a redirect; the unwrap
//! logic is isolated in [`unwrap_redirect`] so a format change degrades
//! to returning the wrapped URL instead of breaking the adapter.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http;
use crate::types::{AdapterKind, SearchFilters, SearchResult};

use super::{now_timestamp, SearchAdapter};

/// DuckDuckGo HTML results page scraper.
///
/// Honours the country filter by folding country and language into
/// DuckDuckGo's combined region code (`kl=us-en`). Recency and source
/// filters are not supported by this backend and are ignored.
pub struct DuckDuckGoHttpAdapter {
    client: reqwest::Client,
    user_agent: Option<String>,
}

impl DuckDuckGoHttpAdapter {
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(Duration::from_secs(config.search_timeout_seconds))?,
            user_agent: config.user_agent.clone(),
        })
    }

    fn build_search_url(query: &str, filters: &SearchFilters) -> String {
        let mut url = Url::parse("https://duckduckgo.com/html/")
            .expect("static URL is valid");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(region) = region_code(filters) {
                pairs.append_pair("kl", &region);
            }
        }
        url.into()
    }
}

/// DuckDuckGo's combined region-language code, e.g. `us-en`.
///
/// Only produced when a country filter is present; the language half
/// defaults to `en` because the code requires both parts.
fn region_code(filters: &SearchFilters) -> Option<String> {
    filters.country.as_ref().map(|country| {
        let language = filters.language.as_deref().unwrap_or("en");
        format!("{}-{}", country.to_lowercase(), language.to_lowercase())
    })
}

#[async_trait]
impl SearchAdapter for DuckDuckGoHttpAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::DuckDuckGoHttp
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>> {
        tracing::trace!(query, "DuckDuckGo HTTP search");

        let url = Self::build_search_url(query, filters);

        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::USER_AGENT,
                http::user_agent_for_request(self.user_agent.as_deref()),
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("DuckDuckGo HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_duckduckgo_html(&html, limit)
    }
}

/// Extract the actual target from DuckDuckGo's redirect wrapper.
///
/// DDG wraps URLs like
/// `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`; the
/// real target is the `uddg` query parameter. Any failure to recognise
/// or parse the wrapper falls back to the raw href.
pub(crate) fn unwrap_redirect(href: &str) -> String {
    // Protocol-relative hrefs need a scheme before Url::parse accepts them.
    let full = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_owned()
    };

    let Ok(parsed) = Url::parse(&full) else {
        return href.to_owned();
    };

    if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| href.to_owned())
    } else {
        full
    }
}

/// Parse a DuckDuckGo HTML results page into search results.
///
/// Shared with the metasearch secondary sub-backend, which queries the
/// same engine through a different endpoint. Separated from the fetch
/// for testability with mock HTML.
pub(crate) fn parse_duckduckgo_html(html: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(".result:not(.result--ad)")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

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

        let description = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_owned())
            .unwrap_or_default();

        results.push(SearchResult::new(
            title,
            unwrap_redirect(href),
            description,
            now_timestamp(),
        ));

        if results.len() >= limit {
            break;
        }
    }

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_DDG_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc123">
        Rust Programming Language
    </a>
    <div class="result__snippet">
        A language empowering everyone to build reliable and efficient software.
    </div>
</div>
<div class="result">
    <a class="result__a" href="https://doc.rust-lang.org/book/">
        The Rust Programming Language Book
    </a>
    <div class="result__snippet">
        An introductory book about Rust.
    </div>
</div>
<div class="result result--ad">
    <a class="result__a" href="https://ads.example.com/">Sponsored thing</a>
    <div class="result__snippet">Buy now.</div>
</div>
<div class="result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FRust&amp;rut=def456">
        Rust - Wikipedia
    </a>
    <div class="result__snippet">
        Rust is a multi-paradigm, general-purpose programming language.
    </div>
</div>
</body>
</html>"#;

    #[test]
    fn unwrap_redirect_extracts_target() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc";
        assert_eq!(unwrap_redirect(href), "https://example.com/page");
    }

    #[test]
    fn unwrap_redirect_passes_direct_links_through() {
        assert_eq!(
            unwrap_redirect("https://example.com/direct"),
            "https://example.com/direct"
        );
    }

    #[test]
    fn unwrap_redirect_falls_back_on_unparseable_href() {
        assert_eq!(unwrap_redirect("not a url"), "not a url");
    }

    #[test]
    fn unwrap_redirect_falls_back_when_uddg_missing() {
        let href = "//duckduckgo.com/l/?rut=onlytracking";
        assert_eq!(unwrap_redirect(href), href);
    }

    #[test]
    fn parse_mock_html_returns_results() {
        let results = parse_duckduckgo_html(MOCK_DDG_HTML, 10).expect("should parse");
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].url, "https://www.rust-lang.org/");
        assert!(results[0].description.contains("reliable and efficient"));
        assert!(results[0].full_content.is_empty());
        assert!(!results[0].timestamp.is_empty());

        assert_eq!(results[1].url, "https://doc.rust-lang.org/book/");
        assert!(results[2].url.contains("wikipedia.org"));
    }

    #[test]
    fn parse_excludes_ads() {
        let results = parse_duckduckgo_html(MOCK_DDG_HTML, 10).expect("should parse");
        for r in &results {
            assert!(!r.url.contains("ads.example.com"));
        }
    }

    #[test]
    fn parse_respects_limit() {
        let results = parse_duckduckgo_html(MOCK_DDG_HTML, 2).expect("should parse");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn parse_empty_html_returns_empty() {
        let results = parse_duckduckgo_html("<html><body></body></html>", 10);
        assert!(results.expect("should parse").is_empty());
    }

    #[test]
    fn region_code_requires_country() {
        let filters = SearchFilters {
            language: Some("fr".into()),
            ..Default::default()
        };
        assert!(region_code(&filters).is_none());
    }

    #[test]
    fn region_code_folds_country_and_language() {
        let filters = SearchFilters {
            country: Some("DE".into()),
            language: Some("de".into()),
            ..Default::default()
        };
        assert_eq!(region_code(&filters).as_deref(), Some("de-de"));
    }

    #[test]
    fn region_code_defaults_language_to_en() {
        let filters = SearchFilters {
            country: Some("us".into()),
            ..Default::default()
        };
        assert_eq!(region_code(&filters).as_deref(), Some("us-en"));
    }

    #[test]
    fn search_url_carries_region_code() {
        let filters = SearchFilters {
            country: Some("uk".into()),
            ..Default::default()
        };
        let url = DuckDuckGoHttpAdapter::build_search_url("rust async", &filters);
        assert!(url.starts_with("https://duckduckgo.com/html/?"));
        assert!(url.contains("q=rust+async"));
        assert!(url.contains("kl=uk-en"));
    }

    #[test]
    fn search_url_omits_region_without_country() {
        let url =
            DuckDuckGoHttpAdapter::build_search_url("rust", &SearchFilters::default());
        assert!(!url.contains("kl="));
    }

    #[tokio::test]
    #[ignore] // Live test — run with `cargo test -- --ignored`
    async fn live_duckduckgo_search() {
        let adapter = DuckDuckGoHttpAdapter::new(&SearchConfig::default()).expect("adapter");
        let results = adapter
            .search("rust programming", 5, &SearchFilters::default())
            .await
            .expect("live search should work");
        assert!(!results.is_empty());
        for r in &results {
            assert!(!r.title.is_empty());
            assert!(!r.url.is_empty());
        }
    }
}
