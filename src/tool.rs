//! MCP tool boundary over the search service.
//!
//! Serves three tools on stdin/stdout for agent clients:
//! `full_web_search`, `get_web_search_summaries`, and
//! `get_single_web_page_content`. Service outputs are rendered as
//! markdown-ish text content blocks. Limits are capped at 10 here, the
//! same repair the REST boundary applies.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    handler::server::router::tool::ToolRouter as RmcpToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use mixsearch_core::{SearchFilters, SearchService, SourceKind};

const MAX_LIMIT: usize = 10;
const DEFAULT_LIMIT: usize = 5;

/// Serve the MCP tools over stdio until the client disconnects.
pub async fn serve_stdio(service: SearchService) -> Result<()> {
    let svc = MixsearchTools::new(service);
    let running = svc.serve(stdio()).await?;
    // Keep the stdio server alive until the client closes.
    running.waiting().await?;
    Ok(())
}

#[derive(Clone)]
struct MixsearchTools {
    tool_router: RmcpToolRouter<Self>,
    service: Arc<SearchService>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
struct FullWebSearchArgs {
    /// Search query.
    query: String,
    /// Maximum number of results (capped at 10).
    #[serde(default)]
    limit: Option<usize>,
    /// Alternative name for limit, kept for compatibility.
    #[serde(default)]
    top_n: Option<usize>,
    /// Include extracted page content in the response.
    #[serde(default)]
    include_content: Option<bool>,
    /// Maximum content length per page, in characters.
    #[serde(default)]
    max_content_length: Option<usize>,
    /// Only results from the last N days.
    #[serde(default)]
    recency_days: Option<i64>,
    /// Source vertical: news, images, or videos.
    #[serde(default)]
    source: Option<String>,
    /// Two-letter language code.
    #[serde(default)]
    language: Option<String>,
    /// Two-letter country code.
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
struct SearchSummariesArgs {
    /// Search query.
    query: String,
    /// Maximum number of results (capped at 10).
    #[serde(default)]
    limit: Option<usize>,
    /// Alternative name for limit, kept for compatibility.
    #[serde(default)]
    top_n: Option<usize>,
    /// Only results from the last N days.
    #[serde(default)]
    recency_days: Option<i64>,
    /// Source vertical: news, images, or videos.
    #[serde(default)]
    source: Option<String>,
    /// Two-letter language code.
    #[serde(default)]
    language: Option<String>,
    /// Two-letter country code.
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
struct SinglePageArgs {
    /// URL to extract content from.
    url: String,
    /// Maximum content length, in characters.
    #[serde(default)]
    max_content_length: Option<usize>,
}

fn effective_limit(limit: Option<usize>, top_n: Option<usize>) -> usize {
    top_n.or(limit).unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

fn filters_from(
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

#[tool_router]
impl MixsearchTools {
    fn new(service: SearchService) -> Self {
        Self {
            tool_router: Self::tool_router(),
            service: Arc::new(service),
        }
    }

    #[tool(
        description = "Comprehensive web search with full page content extraction. \
                       Falls back across engines and fetches the readable text of \
                       each result page."
    )]
    async fn full_web_search(
        &self,
        params: Parameters<FullWebSearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        let limit = effective_limit(args.limit, args.top_n);
        info!(query = %args.query, limit, "MCP full_web_search");

        let filters = filters_from(args.recency_days, args.source, args.language, args.country);
        let response = self
            .service
            .search_and_extract(
                &args.query,
                limit,
                args.include_content.unwrap_or(true),
                args.max_content_length,
                &filters,
            )
            .await;

        let mut text = format!(
            "Search completed for '{}' with {} results:\n\n",
            response.query, response.total_results
        );
        for (i, result) in response.results.iter().enumerate() {
            let _ = write!(text, "**{}. {}**\nURL: {}\n", i + 1, result.title, result.url);
            let _ = writeln!(text, "Description: {}", result.description);
            if !result.full_content.is_empty() {
                let _ = write!(text, "\n**Full Content:**\n{}\n", result.full_content);
            } else if !result.content_preview.is_empty() {
                let _ = write!(text, "\n**Content Preview:**\n{}\n", result.content_preview);
            } else if let Some(ref error) = result.error {
                let _ = write!(text, "\n**Content Extraction Failed:** {error}\n");
            }
            text.push_str("\n---\n\n");
        }

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Lightweight web search returning titles, URLs, and \
                       descriptions only — no content extraction."
    )]
    async fn get_web_search_summaries(
        &self,
        params: Parameters<SearchSummariesArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        let limit = effective_limit(args.limit, args.top_n);
        info!(query = %args.query, limit, "MCP get_web_search_summaries");

        let filters = filters_from(args.recency_days, args.source, args.language, args.country);
        let response = self
            .service
            .search_summaries(&args.query, limit, &filters)
            .await;

        let mut text = format!(
            "Search summaries for '{}' with {} results:\n\n",
            response.query, response.total_results
        );
        for (i, summary) in response.results.iter().enumerate() {
            let _ = write!(
                text,
                "**{}. {}**\nURL: {}\nDescription: {}\n\n---\n\n",
                i + 1,
                summary.title,
                summary.url,
                summary.description
            );
        }

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Extract the readable text content of a single web page.")]
    async fn get_single_web_page_content(
        &self,
        params: Parameters<SinglePageArgs>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0;
        info!(url = %args.url, "MCP get_single_web_page_content");

        let content = self
            .service
            .extract_single_page(&args.url, args.max_content_length)
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let word_count = content.split_whitespace().count();
        let text = format!(
            "**Page Content from: {}**\n\n{}\n\n**Word count:** {}\n",
            args.url, content, word_count
        );

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for MixsearchTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Multi-engine web search with content extraction. Search tools \
                 return markdown text; zero results is a valid outcome, not an error."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_limit_defaults_and_caps() {
        assert_eq!(effective_limit(None, None), 5);
        assert_eq!(effective_limit(Some(3), None), 3);
        assert_eq!(effective_limit(Some(50), None), 10);
        assert_eq!(effective_limit(None, Some(0)), 1);
    }

    #[test]
    fn top_n_wins_over_limit() {
        assert_eq!(effective_limit(Some(5), Some(2)), 2);
    }

    #[test]
    fn filters_parse_source() {
        let f = filters_from(Some(7), Some("news".into()), None, Some("us".into()));
        assert_eq!(f.recency_days, Some(7));
        assert_eq!(f.source, Some(SourceKind::News));
        assert_eq!(f.country.as_deref(), Some("us"));
    }

    #[test]
    fn unknown_source_ignored() {
        let f = filters_from(None, Some("blogs".into()), None, None);
        assert!(f.source.is_none());
    }
}
