//! Storage layer
//!
//! Key-value persistence for the quote collection and its companions.
//!
//! ## Stores
//!
//! - **Persistent** (`FileStore` under `data_dir`): survives restarts.
//!   Holds `quotes`, `lastSelectedCategory` and `lastSyncedAt`.
//! - **Session** (`FileStore` under `session_dir`): holds
//!   `lastViewedQuote`. Clearing the session removes only its own keys, so
//!   the two stores may share a directory.
//!
//! `MemoryStore` backs tests and the degraded in-memory mode used when
//! the persistent store becomes unavailable.

pub mod error;
pub mod kv;

pub use error::{IoOp, StorageError, StorageResult};
pub use kv::{read_json, write_json, FileStore, KeyValueStore, MemoryStore};

/// Keys used in the key-value stores
pub mod keys {
    pub const QUOTES: &str = "quotes";
    pub const LAST_SELECTED_CATEGORY: &str = "lastSelectedCategory";
    pub const LAST_SYNCED_AT: &str = "lastSyncedAt";
    pub const LAST_VIEWED_QUOTE: &str = "lastViewedQuote";

    /// Keys owned by session storage
    pub const SESSION: &[&str] = &[LAST_VIEWED_QUOTE];
}
