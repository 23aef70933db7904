//! Engine selection with quality-gated sequential fallback.
//!
//! The selector owns the fallback policy: adapters are tried strictly
//! in priority order, and the first non-empty result set that clears
//! the quality gate wins. Adapter failures never escape — on total
//! failure the selection degrades to an empty list, which callers must
//! treat as a valid "no results" outcome rather than an error.

use crate::adapters::{
    BraveBrowserAdapter, DuckDuckGoHttpAdapter, MetasearchAdapter, SearchAdapter,
};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::quality;
use crate::types::{AdapterKind, SearchFilters, SearchResult};

/// Progress through the adapter priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectorState {
    /// Currently trying the adapter at this index.
    Trying(usize),
    /// An adapter's results cleared the quality gate.
    Accepted,
    /// Every adapter failed, returned nothing, or scored too low.
    Exhausted,
}

/// Outcome of one selection run.
#[derive(Debug)]
pub struct Selection {
    /// Accepted results, truncated to the requested limit. Empty when
    /// every adapter was exhausted.
    pub results: Vec<SearchResult>,
    /// Adapters invoked, in order. Ends with the accepting adapter on
    /// success, or covers the full priority list on exhaustion.
    pub attempted: Vec<AdapterKind>,
}

/// Sequential priority fallback over the configured adapters.
pub struct EngineSelector {
    adapters: Vec<Box<dyn SearchAdapter>>,
    quality_threshold: f64,
}

impl EngineSelector {
    /// Build a selector with the adapters named in `config`, in the
    /// configured priority order.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or an adapter
    /// cannot be constructed.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        config.validate()?;

        let mut adapters: Vec<Box<dyn SearchAdapter>> = Vec::with_capacity(config.adapters.len());
        for kind in &config.adapters {
            adapters.push(match kind {
                AdapterKind::Metasearch => Box::new(MetasearchAdapter::new(config)?),
                AdapterKind::BraveBrowser => Box::new(BraveBrowserAdapter::new(config)?),
                AdapterKind::DuckDuckGoHttp => Box::new(DuckDuckGoHttpAdapter::new(config)?),
            });
        }

        Ok(Self {
            adapters,
            quality_threshold: config.quality_threshold,
        })
    }

    /// Build a selector over explicit adapter instances. Mainly useful
    /// for tests and custom backends.
    pub fn with_adapters(adapters: Vec<Box<dyn SearchAdapter>>, quality_threshold: f64) -> Self {
        Self {
            adapters,
            quality_threshold,
        }
    }

    /// Run the fallback chain for `query` and return the first
    /// quality-accepted result set, truncated to `limit`.
    ///
    /// Never fails: adapter errors are logged and consumed by falling
    /// through to the next adapter.
    pub async fn select(&self, query: &str, limit: usize, filters: &SearchFilters) -> Selection {
        let mut attempted = Vec::new();
        let mut accepted = Vec::new();
        let mut state = SelectorState::Trying(0);

        while let SelectorState::Trying(index) = state {
            let Some(adapter) = self.adapters.get(index) else {
                state = SelectorState::Exhausted;
                break;
            };

            let kind = adapter.kind();
            attempted.push(kind);
            tracing::debug!(adapter = %kind, query, "trying adapter");

            state = match adapter.search(query, limit, filters).await {
                Err(e) => {
                    tracing::warn!(adapter = %kind, error = %e, "adapter failed");
                    SelectorState::Trying(index + 1)
                }
                Ok(results) if results.is_empty() => {
                    tracing::debug!(adapter = %kind, "adapter returned no results");
                    SelectorState::Trying(index + 1)
                }
                Ok(mut results) => match quality::score(&results, query) {
                    Some(score) if score >= self.quality_threshold => {
                        tracing::debug!(
                            adapter = %kind,
                            score,
                            count = results.len(),
                            "results accepted"
                        );
                        results.truncate(limit);
                        accepted = results;
                        SelectorState::Accepted
                    }
                    score => {
                        tracing::debug!(
                            adapter = %kind,
                            ?score,
                            "results below quality threshold"
                        );
                        SelectorState::Trying(index + 1)
                    }
                },
            };
        }

        if state == SelectorState::Exhausted {
            tracing::warn!(query, "all adapters exhausted, returning no results");
        }

        Selection {
            results: accepted,
            attempted,
        }
    }
}
