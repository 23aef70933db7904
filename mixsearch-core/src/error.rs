//! Error types for the mixsearch-core crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Adapter failures are recovered by the
//! engine selector; extraction failures are recovered per-result by the
//! pipeline — only boundary-level failures reach the caller.

/// Errors that can occur during search and extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to a search engine or page failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse an HTML response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The browser rendering service failed or returned an error.
    #[error("browser error: {0}")]
    Browser(String),

    /// A caller-supplied URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid service configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for mixsearch-core results.
pub type Result<T> = std::result::Result<T, SearchError>;
