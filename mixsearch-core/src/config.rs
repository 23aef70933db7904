//! Service configuration with sensible defaults.
//!
//! [`SearchConfig`] is an explicitly constructed object passed to
//! component constructors — there is no ambient process-wide state.
//! Use [`Default::default()`] for sensible defaults, or construct with
//! field overrides for custom behaviour.

use crate::error::SearchError;
use crate::types::AdapterKind;

/// Configuration for the search and extraction service.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Backend adapters in priority order. Tried strictly sequentially;
    /// the first whose results clear the quality gate wins.
    pub adapters: Vec<AdapterKind>,
    /// Minimum quality score a result set must reach before the
    /// selector accepts it instead of falling through to the next
    /// adapter. A tunable heuristic, not a correctness guarantee.
    pub quality_threshold: f64,
    /// HTTP timeout in seconds for search-engine requests.
    pub search_timeout_seconds: u64,
    /// HTTP timeout in seconds for the fast extraction path.
    pub fetch_timeout_seconds: u64,
    /// Timeout in seconds for a browser render, excluding queueing.
    pub browser_timeout_seconds: u64,
    /// Extra settle delay in milliseconds after network idle, giving
    /// dynamic content time to appear in the rendered DOM.
    pub settle_delay_ms: u64,
    /// Maximum simultaneous in-flight content extractions.
    pub max_concurrent_extractions: usize,
    /// Default cap on extracted content length per page, in characters.
    pub max_content_length: usize,
    /// Base URL of the Browserless-compatible rendering service.
    pub browser_endpoint: String,
    /// Optional API token for the rendering service.
    pub browser_token: Option<String>,
    /// Custom User-Agent. If `None`, rotates through a built-in list of
    /// realistic browser User-Agents per request.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            adapters: vec![
                AdapterKind::Metasearch,
                AdapterKind::BraveBrowser,
                AdapterKind::DuckDuckGoHttp,
            ],
            quality_threshold: 0.3,
            search_timeout_seconds: 30,
            fetch_timeout_seconds: 10,
            browser_timeout_seconds: 30,
            settle_delay_ms: 2000,
            max_concurrent_extractions: 5,
            max_content_length: 500_000,
            browser_endpoint: "http://localhost:3000".into(),
            browser_token: None,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is
    /// invalid.
    ///
    /// Checks:
    /// - `adapters` must not be empty
    /// - `quality_threshold` must be within `[0.0, 1.0]`
    /// - all timeouts must be greater than 0
    /// - `max_concurrent_extractions` must be greater than 0
    /// - `browser_endpoint` must not be empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.adapters.is_empty() {
            return Err(SearchError::Config(
                "at least one adapter must be enabled".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.quality_threshold) {
            return Err(SearchError::Config(
                "quality_threshold must be within [0.0, 1.0]".into(),
            ));
        }
        if self.search_timeout_seconds == 0
            || self.fetch_timeout_seconds == 0
            || self.browser_timeout_seconds == 0
        {
            return Err(SearchError::Config(
                "timeouts must be greater than 0".into(),
            ));
        }
        if self.max_concurrent_extractions == 0 {
            return Err(SearchError::Config(
                "max_concurrent_extractions must be greater than 0".into(),
            ));
        }
        if self.browser_endpoint.trim().is_empty() {
            return Err(SearchError::Config(
                "browser_endpoint must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert!((config.quality_threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.search_timeout_seconds, 30);
        assert_eq!(config.fetch_timeout_seconds, 10);
        assert_eq!(config.browser_timeout_seconds, 30);
        assert_eq!(config.settle_delay_ms, 2000);
        assert_eq!(config.max_concurrent_extractions, 5);
        assert_eq!(config.max_content_length, 500_000);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn default_adapter_priority_order() {
        let config = SearchConfig::default();
        assert_eq!(
            config.adapters,
            vec![
                AdapterKind::Metasearch,
                AdapterKind::BraveBrowser,
                AdapterKind::DuckDuckGoHttp,
            ]
        );
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_adapters_rejected() {
        let config = SearchConfig {
            adapters: vec![],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("adapter"));
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let config = SearchConfig {
            quality_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            quality_threshold: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            fetch_timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = SearchConfig {
            max_concurrent_extractions: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrent_extractions"));
    }

    #[test]
    fn empty_browser_endpoint_rejected() {
        let config = SearchConfig {
            browser_endpoint: "  ".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("browser_endpoint"));
    }

    #[test]
    fn single_adapter_valid() {
        let config = SearchConfig {
            adapters: vec![AdapterKind::DuckDuckGoHttp],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn threshold_boundaries_valid() {
        for threshold in [0.0, 1.0] {
            let config = SearchConfig {
                quality_threshold: threshold,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }
}
