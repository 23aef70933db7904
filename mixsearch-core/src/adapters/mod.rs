//! Backend search adapters.
//!
//! Each adapter implements [`SearchAdapter`] against one specific
//! backend/transport. Adapters fail by returning an error on
//! transport/parse problems — recovery (fallback to the next adapter)
//! is owned by [`crate::selector::EngineSelector`], never by the
//! adapter itself.

pub mod brave;
pub mod duckduckgo;
pub mod metasearch;

pub use brave::BraveBrowserAdapter;
pub use duckduckgo::DuckDuckGoHttpAdapter;
pub use metasearch::MetasearchAdapter;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AdapterKind, SearchFilters, SearchResult};

/// A pluggable search backend.
///
/// Implementors handle their own URL construction and query encoding,
/// transport (plain HTTP or browser render), HTML parsing via CSS
/// selectors, and error reporting for rate limiting, bot detection, or
/// parse failures. All implementations must be `Send + Sync` so the
/// selector can hold them behind trait objects.
#[async_trait]
pub trait SearchAdapter: Send + Sync {
    /// Which adapter this implementation represents.
    fn kind(&self) -> AdapterKind;

    /// Perform a search and return parsed results, newest attempt wins.
    ///
    /// Results carry only search metadata — content fields stay empty
    /// until the extraction pipeline runs. Filters the backend does not
    /// support are ignored, never substituted with a default.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SearchError`] if the request fails, the
    /// response cannot be parsed, or the backend is blocking requests.
    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>>;
}

/// Current time in the ISO-8601 form adapters stamp on results.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
