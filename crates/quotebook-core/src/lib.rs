//! Quotebook Core Library
//!
//! This crate provides the core functionality for Quotebook, a local-first
//! random quote collection with background sync against a remote source.
//!
//! # Architecture
//!
//! - **Local storage**: Source of truth; quotes, the selected filter and sync
//!   metadata are kept as JSON values in a key-value store
//! - **Remote sync**: Periodic pull from an HTTP endpoint, merged so that
//!   local quotes always win on text collisions
//!
//! # Quick Start
//!
//! ```text
//! let app = QuoteApp::from_config(&Config::load()?)?;
//!
//! // Add a quote
//! app.dispatch(Intent::AddQuote { text, category }).await?;
//!
//! // Show one from the current filter
//! let response = app.dispatch(Intent::ShowRandom { category: None }).await?;
//! ```
//!
//! # Modules
//!
//! - `app`: Intent dispatch (main entry point)
//! - `store`: Quote collection backed by persistent and session storage
//! - `models`: The `Quote` type and the default collection
//! - `category`: Category index and filtering
//! - `interchange`: JSON export and import
//! - `storage`: Key-value persistence
//! - `remote`: Remote quote source
//! - `sync`: Merge, sync engine and periodic poller
//! - `config`: Application configuration

pub mod app;
pub mod category;
pub mod config;
pub mod error;
pub mod interchange;
pub mod models;
pub mod remote;
pub mod storage;
pub mod store;
pub mod sync;

pub use app::{Intent, Notification, NotificationLevel, QuoteApp, Response};
pub use config::Config;
pub use error::QuoteError;
pub use models::Quote;
pub use remote::{HttpRemoteSource, RemoteError, RemoteSource, StaticRemoteSource};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::QuoteStore;
pub use sync::{spawn_sync_poller, SyncEngine, SyncHandle, SyncOutcome};
