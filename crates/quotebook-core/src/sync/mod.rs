//! Sync with a remote quote source
//!
//! Merges remotely fetched quotes into the local collection.
//!
//! ## Policy
//!
//! Local wins on text collision: a remote quote whose text already exists
//! locally is dropped, whatever its category. New remote quotes are appended
//! after all local quotes, in remote order, at most once per text.
//!
//! ## Usage
//!
//! ```ignore
//! let engine = SyncEngine::new();
//! match engine.sync(&store, &source).await {
//!     SyncOutcome::Succeeded { added, .. } => println!("{} new quotes", added),
//!     outcome => println!("{}", outcome),
//! }
//! ```

mod engine;
mod merge;
mod poller;

pub use engine::{SharedStore, SyncEngine, SyncOutcome};
pub use merge::{merge_remote, MergeReport};
pub use poller::{spawn_sync_poller, PollerEvent, SyncCommand, SyncHandle};
