//! Heuristic relevance scoring for a result set against its query.
//!
//! Scraping-based backends occasionally return empty templates or
//! mismatched content (bot walls, layout changes). The selector uses
//! this cheap lexical-overlap proxy to decide whether a backend's
//! results are worth keeping before falling through to the next, more
//! expensive backend. Pure function — no side effects, no network.

use std::collections::HashSet;

use crate::types::SearchResult;

/// Score a result set's relevance to `query`, in `[0.0, 1.0]`.
///
/// For each result, the fraction of query tokens (lower-cased,
/// whitespace-split, as a set) that appear in the union of its title
/// and description token sets; averaged across results and clamped to
/// 1.0.
///
/// Returns `None` when the query has no tokens — the score is undefined
/// and callers must treat it as a gate failure rather than divide by
/// zero. An empty result set scores 0.0.
pub fn score(results: &[SearchResult], query: &str) -> Option<f64> {
    let query_tokens: HashSet<String> = tokenize(query);
    if query_tokens.is_empty() {
        return None;
    }
    if results.is_empty() {
        return Some(0.0);
    }

    let mut total = 0.0;
    for result in results {
        let mut result_tokens = tokenize(&result.title);
        result_tokens.extend(tokenize(&result.description));

        let overlap = query_tokens
            .iter()
            .filter(|t| result_tokens.contains(*t))
            .count();
        total += overlap as f64 / query_tokens.len() as f64;
    }

    Some((total / results.len() as f64).min(1.0))
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}
