//! # mixsearch-core
//!
//! Multi-engine web search with fallback and readable-text extraction.
//!
//! This crate scrapes public search engines directly — no API keys, no
//! search-provider accounts — and turns result pages into clean text.
//! It is a library: the REST and agent-tool servers live in the
//! `mixsearch` binary crate on top of it.
//!
//! ## Design
//!
//! - Backend adapters behind one trait: a plain-HTTP metasearch over
//!   Brave and DuckDuckGo, a browser-rendered Brave SERP, and an
//!   HTTP-only DuckDuckGo fallback
//! - Sequential priority fallback with a lexical-overlap quality gate:
//!   the first backend whose results look relevant wins
//! - Two-tier content extraction: fast HTTP parse first, browser
//!   render only when the fast path returns too little or hits a bot
//!   wall
//! - Semaphore-bounded concurrent extraction with per-page error
//!   capture — one dead link never fails a batch
//! - User-Agent rotation for reliability
//!
//! ## Error posture
//!
//! "No results" is a success state, not an error. Failures are
//! recovered as close to their source as possible: adapter failures
//! fall through to the next adapter, extraction failures mark only
//! their own result. Only boundary failures (a malformed URL, a page
//! no tier can extract) reach the caller as errors.
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> mixsearch_core::Result<()> {
//! use mixsearch_core::{SearchConfig, SearchFilters, SearchService};
//!
//! let service = SearchService::new(&SearchConfig::default())?;
//! let response = service
//!     .search_summaries("rust programming", 5, &SearchFilters::default())
//!     .await;
//! for result in &response.results {
//!     println!("{}: {}", result.title, result.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod pipeline;
pub mod quality;
pub mod selector;
pub mod service;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use selector::{EngineSelector, Selection};
pub use service::{SearchResponse, SearchService, SummaryItem, SummaryResponse};
pub use types::{
    AdapterKind, FetchStatus, SearchFilters, SearchResult, SourceKind, TimeRange,
};
