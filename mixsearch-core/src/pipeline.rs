//! Bounded-concurrency content extraction over a result set.
//!
//! All extractions for a batch are spawned together but admitted
//! through a counting semaphore, so at most `max_concurrent` fetches
//! are in flight at once. Failures are captured per result — one dead
//! page marks its own record with an error status and never fails the
//! batch. Result order is preserved.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::extract::ContentExtractor;
use crate::types::SearchResult;

/// Coordinates concurrent extractions against a [`ContentExtractor`].
pub struct ExtractionPipeline {
    extractor: Arc<ContentExtractor>,
    max_concurrent: usize,
}

impl ExtractionPipeline {
    /// # Errors
    ///
    /// Returns an error if the extractor cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            extractor: Arc::new(ContentExtractor::new(config)?),
            max_concurrent: config.max_concurrent_extractions,
        })
    }

    /// Extract a single page directly, bypassing the admission gate.
    ///
    /// # Errors
    ///
    /// Returns the extraction error when both tiers fail.
    pub async fn extract_one(&self, url: &str, max_length: Option<usize>) -> Result<String> {
        self.extractor.extract(url, max_length).await
    }

    /// Extract content for every result, mutating each in place with
    /// either its extracted text or a per-result error.
    pub async fn run(
        &self,
        results: Vec<SearchResult>,
        max_length: Option<usize>,
    ) -> Vec<SearchResult> {
        let extractor = Arc::clone(&self.extractor);
        extract_all(results, self.max_concurrent, move |url| {
            let extractor = Arc::clone(&extractor);
            async move { extractor.extract(&url, max_length).await }
        })
        .await
    }
}

/// Run `fetch` for every result under a concurrency cap, recording
/// success or failure on each record. Generic over the fetch so the
/// admission behaviour is testable without a network.
pub async fn extract_all<F, Fut>(
    results: Vec<SearchResult>,
    max_concurrent: usize,
    fetch: F,
) -> Vec<SearchResult>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let fetch = Arc::new(fetch);

    let tasks: Vec<_> = results
        .into_iter()
        .map(|mut result| {
            let semaphore = Arc::clone(&semaphore);
            let fetch = Arc::clone(&fetch);
            tokio::spawn(async move {
                // A closed semaphore cannot happen here; treat it as a
                // plain extraction failure rather than panicking.
                let permit = semaphore.acquire_owned().await;
                match permit {
                    Ok(_permit) => match fetch(result.url.clone()).await {
                        Ok(content) => result.set_content(content),
                        Err(e) => {
                            tracing::warn!(url = %result.url, error = %e, "extraction failed");
                            result.set_error(e.to_string());
                        }
                    },
                    Err(e) => result.set_error(e.to_string()),
                }
                result
            })
        })
        .collect();

    let mut extracted = Vec::with_capacity(tasks.len());
    for task in join_all(tasks).await {
        match task {
            Ok(result) => extracted.push(result),
            Err(e) => {
                // A panicked extraction task loses its record; there is
                // nothing to attach the error to, so log and move on.
                tracing::error!(error = %e, "extraction task panicked");
            }
        }
    }
    extracted
}
