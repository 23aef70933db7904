//! REST boundary over the search service.
//!
//! Three GET endpoints under `/search` plus a liveness probe. The
//! boundary owns input repair: `limit` (or its compatibility alias
//! `top_n`) is clamped to `[1, 10]`, `max_content_length` to
//! `[0, 2_000_000]`, and unrecognized `source` values degrade to the
//! default text search. Core failures surface as a 500 with a generic
//! message; zero results are a 200 with `status: "success"`.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use mixsearch_core::{
    SearchFilters, SearchResult, SearchService, SourceKind, SummaryItem,
};

const LIMIT_RANGE: std::ops::RangeInclusive<usize> = 1..=10;
const MAX_CONTENT_LENGTH_CAP: usize = 2_000_000;

/// Serve the REST API until the process is stopped.
pub async fn serve(service: SearchService, host: &str, port: u16) -> Result<()> {
    let app = router(Arc::new(service));

    let addr = format!("{host}:{port}");
    info!("mixsearch REST server starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/search/full_web_search", get(full_web_search))
        .route("/search/get_web_search_summaries", get(get_web_search_summaries))
        .route("/search/get_single_web_page_content", get(get_single_web_page_content))
        .route("/health", get(health))
        .with_state(service)
}

fn default_limit() -> usize {
    10
}

fn default_include_content() -> bool {
    true
}

fn default_max_content_length() -> usize {
    500_000
}

// Filter fields are spelled out on each params struct rather than
// shared via `#[serde(flatten)]`: query-string deserialization cannot
// parse non-string fields through a flatten.

#[derive(Debug, Deserialize)]
struct FullSearchParams {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
    /// Compatibility alias for `limit`; wins when both are present.
    top_n: Option<usize>,
    #[serde(default = "default_include_content")]
    include_content: bool,
    #[serde(default = "default_max_content_length")]
    max_content_length: usize,
    recency_days: Option<i64>,
    source: Option<String>,
    language: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummariesParams {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
    top_n: Option<usize>,
    recency_days: Option<i64>,
    source: Option<String>,
    language: Option<String>,
    country: Option<String>,
}

/// Build core filters from loose query parameters. Unrecognized
/// `source` strings degrade to the default text search instead of
/// failing the request.
fn build_filters(
    recency_days: Option<i64>,
    source: Option<String>,
    language: Option<String>,
    country: Option<String>,
) -> SearchFilters {
    SearchFilters {
        recency_days,
        source: source.as_deref().and_then(SourceKind::parse),
        language,
        country,
    }
}

#[derive(Debug, Deserialize)]
struct SinglePageParams {
    url: String,
    #[serde(default = "default_max_content_length")]
    max_content_length: usize,
}

fn clamp_limit(limit: usize, top_n: Option<usize>) -> usize {
    top_n.unwrap_or(limit).clamp(*LIMIT_RANGE.start(), *LIMIT_RANGE.end())
}

fn clamp_content_length(len: usize) -> usize {
    len.min(MAX_CONTENT_LENGTH_CAP)
}

async fn full_web_search(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<FullSearchParams>,
) -> Json<Vec<SearchResult>> {
    let limit = clamp_limit(params.limit, params.top_n);
    let max_content_length = clamp_content_length(params.max_content_length);
    info!(query = %params.query, limit, "REST full search");

    let filters = build_filters(
        params.recency_days,
        params.source,
        params.language,
        params.country,
    );
    let response = service
        .search_and_extract(
            &params.query,
            limit,
            params.include_content,
            Some(max_content_length),
            &filters,
        )
        .await;
    Json(response.results)
}

async fn get_web_search_summaries(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SummariesParams>,
) -> Json<Vec<SummaryItem>> {
    let limit = clamp_limit(params.limit, params.top_n);
    info!(query = %params.query, limit, "REST summaries search");

    let filters = build_filters(
        params.recency_days,
        params.source,
        params.language,
        params.country,
    );
    let response = service
        .search_summaries(&params.query, limit, &filters)
        .await;
    Json(response.results)
}

async fn get_single_web_page_content(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SinglePageParams>,
) -> Result<Json<String>, (StatusCode, String)> {
    let max_content_length = clamp_content_length(params.max_content_length);
    info!(url = %params.url, "REST page extraction");

    match service
        .extract_single_page(&params.url, Some(max_content_length))
        .await
    {
        Ok(content) => Ok(Json(content)),
        Err(e) => {
            warn!(url = %params.url, error = %e, "page extraction failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Content extraction failed".to_owned(),
            ))
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
