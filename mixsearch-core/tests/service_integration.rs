//! Integration tests for the search-to-extraction flow.
//!
//! These exercise the selector fallback chain, the quality gate, and
//! the bounded extraction pipeline end to end using mock adapters and
//! fetches — no network calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use mixsearch_core::adapters::SearchAdapter;
use mixsearch_core::pipeline::extract_all;
use mixsearch_core::{
    AdapterKind, EngineSelector, FetchStatus, Result, SearchError, SearchFilters, SearchResult,
};

/// Adapter scripted to fail, return fixed results, or return junk.
struct ScriptedAdapter {
    kind: AdapterKind,
    outcome: Outcome,
    calls: Arc<AtomicUsize>,
}

enum Outcome {
    Fail,
    Results(Vec<SearchResult>),
}

impl ScriptedAdapter {
    fn new(kind: AdapterKind, outcome: Outcome) -> (Box<dyn SearchAdapter>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let adapter = Box::new(Self {
            kind,
            outcome,
            calls: Arc::clone(&calls),
        });
        (adapter, calls)
    }
}

#[async_trait]
impl SearchAdapter for ScriptedAdapter {
    fn kind(&self) -> AdapterKind {
        self.kind
    }

    async fn search(
        &self,
        _query: &str,
        _limit: usize,
        _filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Fail => Err(SearchError::Http("scripted failure".into())),
            Outcome::Results(results) => Ok(results.clone()),
        }
    }
}

fn results_about(topic: &str, count: usize) -> Vec<SearchResult> {
    (0..count)
        .map(|i| {
            SearchResult::new(
                format!("{topic} article {i}"),
                format!("https://example.com/{topic}/{i}"),
                format!("everything about {topic}"),
                "2025-01-01T00:00:00Z".into(),
            )
        })
        .collect()
}

#[tokio::test]
async fn fallback_chain_skips_failing_and_irrelevant_adapters() {
    let (first, first_calls) = ScriptedAdapter::new(AdapterKind::Metasearch, Outcome::Fail);
    let (second, second_calls) = ScriptedAdapter::new(
        AdapterKind::BraveBrowser,
        Outcome::Results(results_about("gardening", 3)),
    );
    let (third, third_calls) = ScriptedAdapter::new(
        AdapterKind::DuckDuckGoHttp,
        Outcome::Results(results_about("rust", 3)),
    );

    let selector = EngineSelector::with_adapters(vec![first, second, third], 0.3);
    let selection = selector.select("rust", 10, &SearchFilters::default()).await;

    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    assert_eq!(third_calls.load(Ordering::SeqCst), 1);
    assert_eq!(selection.results.len(), 3);
    assert!(selection.results[0].title.starts_with("rust"));
    assert_eq!(
        selection.attempted,
        vec![
            AdapterKind::Metasearch,
            AdapterKind::BraveBrowser,
            AdapterKind::DuckDuckGoHttp,
        ]
    );
}

#[tokio::test]
async fn accepting_adapter_halts_the_chain() {
    let (first, _) = ScriptedAdapter::new(
        AdapterKind::Metasearch,
        Outcome::Results(results_about("rust", 2)),
    );
    let (second, second_calls) = ScriptedAdapter::new(AdapterKind::BraveBrowser, Outcome::Fail);

    let selector = EngineSelector::with_adapters(vec![first, second], 0.3);
    let selection = selector.select("rust", 10, &SearchFilters::default()).await;

    assert_eq!(selection.results.len(), 2);
    // The later adapter is never invoked once an earlier one is accepted.
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn total_exhaustion_degrades_to_empty_selection() {
    let (first, _) = ScriptedAdapter::new(AdapterKind::Metasearch, Outcome::Fail);
    let (second, _) = ScriptedAdapter::new(AdapterKind::DuckDuckGoHttp, Outcome::Fail);

    let selector = EngineSelector::with_adapters(vec![first, second], 0.3);
    let selection = selector.select("rust", 10, &SearchFilters::default()).await;

    assert!(selection.results.is_empty());
    assert_eq!(selection.attempted.len(), 2);
}

#[tokio::test]
async fn selection_flows_into_bounded_extraction() {
    let (adapter, _) = ScriptedAdapter::new(
        AdapterKind::Metasearch,
        Outcome::Results(results_about("rust", 6)),
    );
    let selector = EngineSelector::with_adapters(vec![adapter], 0.3);
    let selection = selector.select("rust", 6, &SearchFilters::default()).await;

    static IN_FLIGHT: AtomicUsize = AtomicUsize::new(0);
    static PEAK: AtomicUsize = AtomicUsize::new(0);

    let cap = 2;
    let extracted = extract_all(selection.results, cap, |url| async move {
        let now = IN_FLIGHT.fetch_add(1, Ordering::SeqCst) + 1;
        PEAK.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(15)).await;
        IN_FLIGHT.fetch_sub(1, Ordering::SeqCst);
        if url.ends_with("/3") {
            Err(SearchError::Http("dead link".into()))
        } else {
            Ok(format!("extracted text for {url}"))
        }
    })
    .await;

    // Exactly N records, each with a definite status.
    assert_eq!(extracted.len(), 6);
    assert!(PEAK.load(Ordering::SeqCst) <= cap);

    let errors: Vec<_> = extracted
        .iter()
        .filter(|r| r.fetch_status == FetchStatus::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].url.ends_with("/3"));
    assert!(errors[0].error.is_some());

    for r in extracted.iter().filter(|r| r.fetch_status == FetchStatus::Success) {
        assert!(r.full_content.starts_with("extracted text"));
        assert!(r.word_count > 0);
        assert!(!r.content_preview.is_empty());
    }
}

#[tokio::test]
async fn preview_capped_for_long_content() {
    let (adapter, _) = ScriptedAdapter::new(
        AdapterKind::Metasearch,
        Outcome::Results(results_about("rust", 1)),
    );
    let selector = EngineSelector::with_adapters(vec![adapter], 0.3);
    let selection = selector.select("rust", 1, &SearchFilters::default()).await;

    let long_content = "word ".repeat(500);
    let extracted = extract_all(selection.results, 5, move |_url| {
        let content = long_content.clone();
        async move { Ok(content) }
    })
    .await;

    let preview = &extracted[0].content_preview;
    assert!(preview.chars().count() <= 503);
    assert!(preview.ends_with("..."));
    assert!(extracted[0].full_content.len() > preview.len());
}
