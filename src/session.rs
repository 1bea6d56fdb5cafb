//! Refresh coordination between a rate fetcher and a rate store.

use crate::core::{CurrencyCode, RateFetcher, RateStore};
use crate::providers::fallback_snapshot;
use chrono::{DateTime, Local};
use std::fmt::Display;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Live,
    Fallback,
}

impl Display for SnapshotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SnapshotSource::Live => "live",
                SnapshotSource::Fallback => "fallback",
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub source: SnapshotSource,
    pub updated_at: DateTime<Local>,
    /// Why the live fetch failed, when the fallback was used.
    pub error: Option<String>,
}

/// Owns the store for one session and refreshes it from `fetcher`.
///
/// `refresh` borrows the session mutably, so at most one fetch is in flight.
pub struct RateSession<'a> {
    fetcher: &'a dyn RateFetcher,
    store: RateStore,
    last_refresh: Option<RefreshOutcome>,
}

impl<'a> RateSession<'a> {
    pub fn new(fetcher: &'a dyn RateFetcher) -> Self {
        RateSession {
            fetcher,
            store: RateStore::new(),
            last_refresh: None,
        }
    }

    pub async fn refresh(&mut self) -> &RefreshOutcome {
        let ticket = self.store.begin_refresh();

        let (snapshot, source, error) = match self.fetcher.fetch_rates(CurrencyCode::BASE).await {
            Ok(snapshot) => (snapshot, SnapshotSource::Live, None),
            Err(e) => {
                warn!(error = %e, "Failed to fetch rates, using fallback data");
                (fallback_snapshot(), SnapshotSource::Fallback, Some(e.to_string()))
            }
        };

        if !self.store.replace_snapshot_if_latest(ticket, &snapshot) {
            debug!("Refresh superseded by a newer one");
        }

        self.last_refresh.insert(RefreshOutcome {
            source,
            updated_at: Local::now(),
            error,
        })
    }

    pub fn store(&self) -> &RateStore {
        &self.store
    }

    pub fn last_refresh(&self) -> Option<&RefreshOutcome> {
        self.last_refresh.as_ref()
    }
}
