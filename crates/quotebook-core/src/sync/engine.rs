//! Sync engine
//!
//! Runs one sync pass: fetch, merge under the store lock, persist.
//! The fetch happens without holding the lock so adds and imports are not
//! blocked by network I/O. The merge and persist then run as one critical
//! section against the collection as currently stored, including changes
//! other processes wrote since this one started.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::QuoteError;
use crate::remote::RemoteSource;
use crate::store::QuoteStore;

/// Store shared between the presentation layer and the sync engine
pub type SharedStore = Arc<Mutex<QuoteStore>>;

/// Outcome of a sync pass
#[derive(Debug)]
pub enum SyncOutcome {
    /// Merge applied and persisted
    Succeeded {
        /// Number of remote quotes appended
        added: usize,
        /// Collection size after the merge
        total: usize,
        /// Recomputed category index
        categories: Vec<String>,
    },
    /// Remote fetch failed; the collection is unchanged
    Failed(QuoteError),
    /// Another sync was still running
    AlreadyRunning,
    /// No remote source is configured
    Disabled,
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Succeeded { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Succeeded { added: 0, .. } => write!(f, "Already up to date"),
            SyncOutcome::Succeeded { added, total, .. } => {
                write!(f, "Synced {} new quote(s), {} total", added, total)
            }
            SyncOutcome::Failed(e) => write!(f, "Sync failed: {}", e),
            SyncOutcome::AlreadyRunning => write!(f, "Sync already in progress"),
            SyncOutcome::Disabled => write!(f, "Sync is disabled"),
        }
    }
}

/// Serializes sync passes
#[derive(Debug, Default)]
pub struct SyncEngine {
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a pass ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sync pass is currently running
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one sync pass against `source`
    ///
    /// Returns `AlreadyRunning` without fetching if another pass is
    /// outstanding. A failed fetch leaves the collection untouched.
    pub async fn sync(&self, store: &SharedStore, source: &dyn RemoteSource) -> SyncOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync skipped, previous pass still running");
            return SyncOutcome::AlreadyRunning;
        }
        let _guard = InFlightGuard(&self.in_flight);

        info!("Starting sync from {}", source.describe());

        let remote = match source.fetch_quotes().await {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("Sync failed: {}", e);
                return SyncOutcome::Failed(e.into());
            }
        };

        let mut store = store.lock().await;
        let report = store.merge_synced(&remote, Utc::now());
        let added = report.added.len();

        info!(
            "Sync complete, added={} skipped={} total={}",
            added,
            report.skipped,
            store.len()
        );

        SyncOutcome::Succeeded {
            added,
            total: store.len(),
            categories: store.categories(),
        }
    }
}
