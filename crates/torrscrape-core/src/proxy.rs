//! Concurrent mirror validation
//!
//! Every candidate gets its own task that fetches the mirror's landing page
//! and applies a site-specific predicate. Verdicts come back over a single
//! channel tagged with the candidate's position, so the surviving mirrors can
//! be returned in their original order no matter which task finishes first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::DocumentFetcher;
use crate::parser::ParsedDocument;

/// Site-specific check that a fetched page really is the expected site
///
/// Receives the landing page and the candidate base URL it was fetched from.
pub type MirrorPredicate = Arc<dyn Fn(&ParsedDocument, &str) -> bool + Send + Sync>;

/// Checks mirror candidates in parallel under a shared timeout
#[derive(Debug, Clone)]
pub struct ProxyValidator {
    fetcher: DocumentFetcher,
    timeout: Duration,
}

impl ProxyValidator {
    /// Create a validator whose checks each give up after `timeout`
    pub fn new(fetcher: DocumentFetcher, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Returns the candidates that answered and satisfied `predicate`
    ///
    /// Resolves once every check has finished or timed out. The result keeps
    /// the relative order of `candidates`; an empty result means no usable
    /// mirror.
    pub async fn validate(&self, candidates: &[String], predicate: MirrorPredicate) -> Vec<String> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, bool)>();
        let mut workers = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            let tx = tx.clone();
            let fetcher = self.fetcher.clone();
            let predicate = Arc::clone(&predicate);
            let url = candidate.clone();
            let timeout = self.timeout;

            workers.push(tokio::spawn(async move {
                let valid = match fetcher.fetch(&url, timeout).await {
                    Ok(document) => predicate(&document, &url),
                    Err(failure) => {
                        warn!(mirror = %url, error = %failure, "mirror check failed");
                        false
                    }
                };
                debug!(mirror = %url, valid, "mirror checked");
                // Receiver outlives all workers, a send cannot fail here
                let _ = tx.send((index, valid));
            }));
        }
        drop(tx);

        for worker in workers {
            if let Err(e) = worker.await {
                warn!(error = %e, "mirror check task aborted");
            }
        }

        let mut verdicts = vec![false; candidates.len()];
        while let Some((index, valid)) = rx.recv().await {
            verdicts[index] = valid;
        }

        let valid: Vec<String> = candidates
            .iter()
            .zip(verdicts)
            .filter_map(|(candidate, ok)| ok.then(|| candidate.clone()))
            .collect();

        info!(
            candidates = candidates.len(),
            valid = valid.len(),
            "mirror validation finished"
        );
        valid
    }
}
