//! Metasearch adapter — the preferred backend.
//!
//! Aggregates two plain-HTTP sub-backends behind one [`SearchAdapter`]:
//! a Brave SERP scrape as the primary and a DuckDuckGo HTML POST as the
//! secondary. The primary cannot target regions, so a country filter
//! disables it and the query goes straight to the secondary. Within the
//! adapter a failed or empty primary falls through to the secondary;
//! only when both fail does the adapter report an error to the
//! selector.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http;
use crate::types::{AdapterKind, SearchFilters, SearchResult, SourceKind};

use super::brave::{build_serp_url, parse_brave_serp};
use super::duckduckgo::parse_duckduckgo_html;
use super::SearchAdapter;

/// Plain-HTTP metasearch over Brave and DuckDuckGo.
pub struct MetasearchAdapter {
    client: reqwest::Client,
    user_agent: Option<String>,
}

impl MetasearchAdapter {
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

    /// Whether the Brave sub-backend can honour these filters. It has
    /// no region targeting, so a country filter rules it out.
    fn primary_compatible(filters: &SearchFilters) -> bool {
        filters.country.is_none()
    }

    /// Brave's vertical path for a source filter.
    fn brave_vertical(source: Option<SourceKind>) -> &'static str {
        match source {
            Some(SourceKind::News) => "news",
            Some(SourceKind::Images) => "images",
            Some(SourceKind::Videos) => "videos",
            None => "search",
        }
    }

    async fn search_brave(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>> {
        let url = build_serp_url(
            Self::brave_vertical(filters.source),
            query,
            filters,
            /* country_supported */ false,
        );
        tracing::trace!(query, %url, "metasearch primary (Brave)");

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
            .map_err(|e| SearchError::Http(format!("Brave request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Brave HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("Brave response read failed: {e}")))?;

        parse_brave_serp(&html, limit)
    }

    async fn search_duckduckgo(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>> {
        tracing::trace!(query, "metasearch secondary (DuckDuckGo)");

        let response = self
            .client
            .post("https://html.duckduckgo.com/html/")
            .header(
                reqwest::header::USER_AGENT,
                http::user_agent_for_request(self.user_agent.as_deref()),
            )
            .form(&secondary_form(query, filters))
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("DuckDuckGo HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        parse_duckduckgo_html(&html, limit)
    }
}

/// Form body for the secondary (DuckDuckGo HTML) sub-backend.
///
/// This sub-backend carries the full filter set: `df` for the recency
/// bucket, `kl` for the region (falling back to the wildcard region
/// `wt-{lang}` when only a language is given), and the `ia`/`iax`
/// vertical markers for a source filter.
fn secondary_form(query: &str, filters: &SearchFilters) -> Vec<(&'static str, String)> {
    let mut form = vec![("q", query.to_owned())];
    if let Some(range) = filters.time_range() {
        form.push(("df", range.short_code().to_owned()));
    }
    if let Some(region) = secondary_region(filters) {
        form.push(("kl", region));
    }
    if let Some(source) = filters.source {
        let vertical = match source {
            SourceKind::News => "news",
            SourceKind::Images => "images",
            SourceKind::Videos => "videos",
        };
        form.push(("ia", vertical.to_owned()));
        if source != SourceKind::News {
            form.push(("iax", vertical.to_owned()));
        }
    }
    form
}

/// DuckDuckGo region code for the secondary sub-backend.
///
/// Country plus language fold into the usual combined code; a language
/// on its own maps to DuckDuckGo's "no region" wildcard, `wt-{lang}`,
/// so the language filter survives without a country.
fn secondary_region(filters: &SearchFilters) -> Option<String> {
    match (&filters.country, &filters.language) {
        (Some(country), language) => Some(format!(
            "{}-{}",
            country.to_lowercase(),
            language.as_deref().unwrap_or("en").to_lowercase()
        )),
        (None, Some(language)) => Some(format!("wt-{}", language.to_lowercase())),
        (None, None) => None,
    }
}

/// Try the primary sub-backend, fall through to the secondary.
///
/// The primary is skipped outright when `use_primary` is false. A
/// failed or empty primary falls through; a secondary failure reports
/// the primary's error when there was one. Separated from the request
/// plumbing so the dispatch order is testable without a network.
async fn sub_backend_fallback<PFut, SFut>(
    use_primary: bool,
    primary: impl FnOnce() -> PFut,
    secondary: impl FnOnce() -> SFut,
) -> Result<Vec<SearchResult>>
where
    PFut: Future<Output = Result<Vec<SearchResult>>>,
    SFut: Future<Output = Result<Vec<SearchResult>>>,
{
    let primary_error = if !use_primary {
        None
    } else {
        match primary().await {
            Ok(results) if !results.is_empty() => return Ok(results),
            Ok(_) => {
                tracing::debug!("primary sub-backend returned no results");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "primary sub-backend failed");
                Some(e)
            }
        }
    };

    match secondary().await {
        Ok(results) => Ok(results),
        Err(secondary_error) => Err(primary_error.unwrap_or(secondary_error)),
    }
}

#[async_trait]
impl SearchAdapter for MetasearchAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Metasearch
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>> {
        // Ignoring an unsupported filter would silently return results
        // from the wrong region, so the sub-backend is skipped instead.
        let use_primary = Self::primary_compatible(filters);
        if !use_primary {
            tracing::debug!("country filter set, skipping Brave sub-backend");
        }

        sub_backend_fallback(
            use_primary,
            || self.search_brave(query, limit, filters),
            || self.search_duckduckgo(query, limit, filters),
        )
        .await
    }
}
