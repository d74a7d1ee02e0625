use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use podium_common::{QueryResult, SearchError};
use tracing::debug;

use crate::fetcher::SpeechFetcher;
use crate::traits::ContentGenerator;

/// Generation number handed out when a search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Latest-keyword-wins wrapper around a fetcher.
///
/// Searches run concurrently and are never cancelled, but a search that
/// finishes after a newer one has started resolves to `Ok(None)`.
pub struct SearchSession<G> {
    fetcher: Arc<SpeechFetcher<G>>,
    latest: AtomicU64,
}

impl<G: ContentGenerator> SearchSession<G> {
    pub fn new(fetcher: Arc<SpeechFetcher<G>>) -> Self {
        Self {
            fetcher,
            latest: AtomicU64::new(0),
        }
    }

    /// Start a new generation, making every earlier ticket stale.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Fetch `keyword`; `Ok(None)` when a newer search superseded this one.
    ///
    /// Stale failures are suppressed the same way as stale results.
    pub async fn search(&self, keyword: &str) -> Result<Option<QueryResult>, SearchError> {
        let ticket = self.begin();
        let outcome = self.fetcher.fetch(keyword).await;

        if !self.is_current(ticket) {
            debug!(
                keyword,
                generation = ticket.generation(),
                "Discarding superseded search"
            );
            return Ok(None);
        }

        outcome.map(Some)
    }
}
