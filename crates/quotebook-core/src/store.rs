//! Quote store
//!
//! The `QuoteStore` owns the in-memory quote collection and keeps it
//! persisted:
//! - persistent key-value store: the collection, the selected filter and
//!   the last sync time
//! - session key-value store: the last viewed quote
//!
//! ## Lifecycle
//!
//! `open` loads the stored collection, falling back to the built-in
//! defaults when nothing valid is stored. Every mutation (add, import,
//! sync merge) persists the whole collection immediately.
//!
//! Other processes may write the same `data_dir` (a long-running `watch`
//! next to one-shot commands), so add and sync merge re-read the stored
//! collection before changing it.
//!
//! ## Degraded mode
//!
//! If a persistent write fails, the store switches to an in-memory backend
//! for the rest of the process. The collection keeps working; it just no
//! longer survives a restart.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::open()?;
//!
//! store.add("Simplicity is prerequisite for reliability.", "software")?;
//! let quotes = store.filtered("software");
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::category::{self, ALL_CATEGORIES};
use crate::config::Config;
use crate::error::QuoteError;
use crate::models::{default_quotes, Quote};
use crate::sync::{merge_remote, MergeReport};
use crate::storage::{
    keys, read_json, write_json, FileStore, KeyValueStore, MemoryStore, StorageResult,
};

/// Quote collection backed by key-value storage
pub struct QuoteStore {
    /// The collection, in insertion order
    quotes: Vec<Quote>,
    /// Store that survives restarts
    persistent: Box<dyn KeyValueStore>,
    /// Store cleared with the session
    session: Box<dyn KeyValueStore>,
    /// Set once a persistent write has failed
    degraded: bool,
}

impl QuoteStore {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(&config))
    }

    /// Open the store with file-backed storage from a configuration
    pub fn open_with_config(config: &Config) -> Self {
        Self::with_stores(
            Box::new(FileStore::new(&config.data_dir)),
            Box::new(FileStore::new(&config.session_dir)),
        )
    }

    /// Open the store over arbitrary key-value backends
    pub fn with_stores(
        persistent: Box<dyn KeyValueStore>,
        session: Box<dyn KeyValueStore>,
    ) -> Self {
        let mut store = Self {
            quotes: Vec::new(),
            persistent,
            session,
            degraded: false,
        };
        store.quotes = store.load();
        store
    }

    /// Open an in-memory store seeded with the default quotes
    pub fn in_memory() -> Self {
        Self::with_stores(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()))
    }

    // ==================== Collection ====================

    /// Read the stored collection
    ///
    /// Missing or invalid stored values yield the default collection;
    /// this never fails.
    pub fn load(&self) -> Vec<Quote> {
        match read_json::<Vec<Quote>>(self.persistent.as_ref(), keys::QUOTES) {
            Ok(Some(quotes)) if quotes.iter().all(Quote::is_well_formed) => {
                debug!("Loaded {} quotes", quotes.len());
                quotes
            }
            Ok(Some(_)) => {
                warn!("Stored quotes contain malformed records, using defaults");
                default_quotes()
            }
            Ok(None) => {
                debug!("No stored quotes, using defaults");
                default_quotes()
            }
            Err(e) => {
                warn!("Failed to load stored quotes, using defaults: {}", e);
                default_quotes()
            }
        }
    }

    /// Write a full collection to persistent storage
    ///
    /// Replaces any previously stored collection.
    pub fn save(&mut self, quotes: &[Quote]) -> StorageResult<()> {
        write_json(self.persistent.as_mut(), keys::QUOTES, quotes)
    }

    /// Add a quote from user input
    ///
    /// Both fields are trimmed; an empty field is rejected with
    /// `ValidationFailed` and nothing changes.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote, QuoteError> {
        let quote = Quote::parse(text, category)?;
        self.reload();
        self.quotes.push(quote.clone());
        self.persist_quotes();
        debug!("Added quote in category {:?}", quote.category);
        Ok(quote)
    }

    /// Replace the entire collection
    ///
    /// Every record must be well-formed; otherwise `MalformedImport` is
    /// returned and the current collection is kept.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> Result<(), QuoteError> {
        if let Some(index) = quotes.iter().position(|q| !q.is_well_formed()) {
            return Err(QuoteError::malformed(format!(
                "item {} must have a non-empty text and category",
                index
            )));
        }

        self.quotes = quotes;
        self.persist_quotes();
        debug!("Replaced collection with {} quotes", self.quotes.len());
        Ok(())
    }

    /// Merge remote quotes into the stored collection and record the sync time
    ///
    /// The merge runs against the collection as currently stored, and the
    /// collection is only rewritten when something was added.
    pub(crate) fn merge_synced(
        &mut self,
        remote: &[Quote],
        synced_at: DateTime<Utc>,
    ) -> MergeReport {
        self.reload();

        let report = merge_remote(&self.quotes, remote);
        if !report.is_empty() {
            self.quotes.extend(report.added.iter().cloned());
            self.persist_quotes();
        }

        let stamp = synced_at.to_rfc3339();
        self.write_persistent(|store| store.set(keys::LAST_SYNCED_AT, &stamp));
        report
    }

    /// Pick up a collection persisted by another process
    ///
    /// Keeps the in-memory collection when nothing valid is stored or the
    /// store has degraded to memory.
    pub fn reload(&mut self) {
        if self.degraded {
            return;
        }
        match read_json::<Vec<Quote>>(self.persistent.as_ref(), keys::QUOTES) {
            Ok(Some(quotes)) if quotes.iter().all(Quote::is_well_formed) => self.quotes = quotes,
            Ok(_) => {}
            Err(e) => debug!("Keeping in-memory quotes, stored value unreadable: {}", e),
        }
    }

    /// All quotes in insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    // ==================== Categories ====================

    /// Current category list, `"all"` first
    pub fn categories(&self) -> Vec<String> {
        category::categories(&self.quotes)
    }

    /// Quotes matching a filter; an unknown filter matches everything
    pub fn filtered(&self, filter: &str) -> Vec<&Quote> {
        let resolved = category::resolve_filter(filter, &self.categories());
        category::filter_quotes(&self.quotes, &resolved)
    }

    /// Pick a random quote matching a filter
    pub fn random_quote(&self, filter: &str) -> Option<&Quote> {
        self.filtered(filter)
            .choose(&mut rand::thread_rng())
            .copied()
    }

    /// The persisted filter, resolved against the current categories
    ///
    /// A filter naming a category that no longer exists resolves to `"all"`.
    pub fn selected_filter(&self) -> String {
        let stored = match self.persistent.get(keys::LAST_SELECTED_CATEGORY) {
            Ok(value) => value,
            Err(e) => {
                debug!("Failed to read selected filter: {}", e);
                None
            }
        };

        match stored {
            Some(filter) => category::resolve_filter(&filter, &self.categories()),
            None => ALL_CATEGORIES.to_string(),
        }
    }

    /// Persist a filter selection
    ///
    /// Returns the filter actually applied, which is `"all"` when the
    /// requested category does not exist.
    pub fn set_selected_filter(&mut self, requested: &str) -> String {
        let resolved = category::resolve_filter(requested.trim(), &self.categories());
        self.write_persistent(|store| store.set(keys::LAST_SELECTED_CATEGORY, &resolved));
        resolved
    }

    // ==================== Session ====================

    /// Last quote shown in this session, if any
    pub fn last_viewed(&self) -> Option<Quote> {
        match read_json(self.session.as_ref(), keys::LAST_VIEWED_QUOTE) {
            Ok(quote) => quote,
            Err(e) => {
                debug!("Ignoring unreadable last viewed quote: {}", e);
                None
            }
        }
    }

    /// Remember a quote as the last one shown
    pub fn set_last_viewed(&mut self, quote: &Quote) {
        if let Err(e) = write_json(self.session.as_mut(), keys::LAST_VIEWED_QUOTE, quote) {
            warn!("Failed to store last viewed quote: {}", e);
        }
    }

    /// Remove the session keys, leaving anything else in the directory
    pub fn clear_session(&mut self) -> StorageResult<()> {
        for key in keys::SESSION {
            self.session.remove(key)?;
        }
        Ok(())
    }

    // ==================== Sync metadata ====================

    /// Time of the last successful sync
    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.persistent.get(keys::LAST_SYNCED_AT).ok().flatten()?;
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }

    /// Whether persistent storage has failed and the store is memory-only
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    // ==================== Internals ====================

    fn persist_quotes(&mut self) {
        let json = match serde_json::to_string(&self.quotes) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize quotes: {}", e);
                return;
            }
        };
        self.write_persistent(|store| store.set(keys::QUOTES, &json));
    }

    /// Run a persistent write, degrading to memory on failure
    fn write_persistent<F>(&mut self, write: F)
    where
        F: Fn(&mut dyn KeyValueStore) -> StorageResult<()>,
    {
        let Err(e) = write(self.persistent.as_mut()) else {
            return;
        };

        warn!(
            "Storage unavailable, continuing in memory-only mode: {}",
            QuoteError::StorageUnavailable(e)
        );

        let mut memory = MemoryStore::new();
        if let Err(e) = write_json(&mut memory, keys::QUOTES, &self.quotes) {
            debug!("Failed to copy quotes into memory store: {}", e);
        }
        for key in [keys::LAST_SELECTED_CATEGORY, keys::LAST_SYNCED_AT] {
            if let Ok(Some(value)) = self.persistent.get(key) {
                let _ = memory.set(key, &value);
            }
        }
        let _ = write(&mut memory);

        self.persistent = Box::new(memory);
        self.degraded = true;
    }
}
