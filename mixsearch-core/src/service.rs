//! The search orchestrator — the crate's public entry point.
//!
//! [`SearchService`] wires the engine selector and extraction pipeline
//! together and exposes the three public operations. Zero results are a
//! valid success state: the `status` field is `"success"` even for an
//! empty result set, and only boundary-level failures (an unparseable
//! URL, a page no tier can extract) surface as errors.

use serde::Serialize;
use url::Url;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::pipeline::ExtractionPipeline;
use crate::selector::EngineSelector;
use crate::types::{SearchFilters, SearchResult};

const STATUS_SUCCESS: &str = "success";

/// Envelope for the full search operation.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    pub status: String,
}

/// One result in a summaries response — search metadata only.
#[derive(Debug, Serialize)]
pub struct SummaryItem {
    pub title: String,
    pub url: String,
    pub description: String,
    pub timestamp: String,
}

/// Envelope for the summaries operation.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub query: String,
    pub results: Vec<SummaryItem>,
    pub total_results: usize,
    pub status: String,
}

/// Search, select, and extract — the full machine.
pub struct SearchService {
    selector: EngineSelector,
    pipeline: ExtractionPipeline,
}

impl SearchService {
    /// Build a service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a component
    /// cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            selector: EngineSelector::from_config(config)?,
            pipeline: ExtractionPipeline::new(config)?,
        })
    }

    /// Build a service from pre-constructed components. Mainly useful
    /// for tests with mock adapters.
    pub fn with_parts(selector: EngineSelector, pipeline: ExtractionPipeline) -> Self {
        Self { selector, pipeline }
    }

    /// Search and, when `include_content` is set, extract the readable
    /// text of every result page under the concurrency cap.
    ///
    /// Never fails: engine exhaustion yields an empty result list, and
    /// per-page extraction failures are recorded on the individual
    /// results.
    pub async fn search_and_extract(
        &self,
        query: &str,
        limit: usize,
        include_content: bool,
        max_content_length: Option<usize>,
        filters: &SearchFilters,
    ) -> SearchResponse {
        tracing::trace!(query, limit, include_content, "search_and_extract");

        let selection = self.selector.select(query, limit, filters).await;
        let results = if include_content {
            self.pipeline.run(selection.results, max_content_length).await
        } else {
            selection.results
        };

        tracing::debug!(query, count = results.len(), "search complete");

        SearchResponse {
            query: query.to_owned(),
            total_results: results.len(),
            results,
            status: STATUS_SUCCESS.to_owned(),
        }
    }

    /// Search without extraction — titles, URLs, descriptions, and
    /// timestamps only.
    pub async fn search_summaries(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> SummaryResponse {
        tracing::trace!(query, limit, "search_summaries");

        let selection = self.selector.select(query, limit, filters).await;
        let results: Vec<SummaryItem> = selection
            .results
            .into_iter()
            .map(|r| SummaryItem {
                title: r.title,
                url: r.url,
                description: r.description,
                timestamp: r.timestamp,
            })
            .collect();

        SummaryResponse {
            query: query.to_owned(),
            total_results: results.len(),
            results,
            status: STATUS_SUCCESS.to_owned(),
        }
    }

    /// Extract the readable text of a single page, no search involved.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidUrl`] for a malformed or
    /// non-HTTP(S) URL, or the extraction error when both tiers fail.
    pub async fn extract_single_page(
        &self,
        url: &str,
        max_content_length: Option<usize>,
    ) -> Result<String> {
        let parsed = Url::parse(url)
            .map_err(|e| SearchError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SearchError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        tracing::trace!(url, "extract_single_page");
        self.pipeline.extract_one(url, max_content_length).await
    }
}
