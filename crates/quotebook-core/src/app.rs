//! Intent dispatch
//!
//! `QuoteApp` bundles the shared store, the sync engine and the optional
//! remote source, and maps each user intent to store operations. A
//! presentation layer (the CLI, or anything else) only builds `Intent`s and
//! renders the `Response` and its `Notification`.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::category::ALL_CATEGORIES;
use crate::config::Config;
use crate::error::QuoteError;
use crate::interchange::{export_quotes, parse_import};
use crate::models::Quote;
use crate::remote::{HttpRemoteSource, RemoteSource};
use crate::store::QuoteStore;
use crate::sync::{SharedStore, SyncEngine, SyncOutcome};

/// A discrete user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Show a random quote, using the persisted filter unless one is given
    ShowRandom { category: Option<String> },
    /// Show the last quote viewed in this session
    ShowLast,
    /// Show the session's last viewed quote, or a random one when there is none
    Resume,
    /// Add a quote
    AddQuote { text: String, category: String },
    /// Replace the collection with the contents of an import file
    Import { contents: String },
    /// Serialize the collection for export
    Export,
    /// Select and persist a category filter
    Filter { category: String },
    /// List categories and the current selection
    ListCategories,
    /// Sync with the remote source now
    ManualSync,
}

/// Result of dispatching an intent
#[derive(Debug)]
pub enum Response {
    /// Quote to display; `None` when nothing matches
    Quote(Option<Quote>),
    /// Quote that was added
    Added(Quote),
    /// Collection replaced by an import
    Imported { count: usize },
    /// Exported file contents
    Exported(String),
    /// Filter applied (may differ from the request when it was stale)
    FilterApplied { requested: String, applied: String },
    /// Category index and current selection
    Categories {
        categories: Vec<String>,
        selected: String,
    },
    /// Outcome of a manual sync
    Synced(SyncOutcome),
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient message for the presentation layer to surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Notification for a failed intent
    pub fn from_error(error: &QuoteError) -> Self {
        let message = match error {
            QuoteError::MalformedImport { .. } => format!("Error importing quotes: {}", error),
            _ => error.to_string(),
        };
        Self::new(NotificationLevel::Error, message)
    }
}

impl Response {
    /// Notification to show alongside this response, if any
    pub fn notification(&self) -> Option<Notification> {
        use NotificationLevel::*;

        match self {
            Response::Quote(None) => Some(Notification::new(Info, "No quotes available")),
            Response::Quote(Some(_)) | Response::Exported(_) | Response::Categories { .. } => None,
            Response::Added(quote) => Some(Notification::new(
                Success,
                format!("Added quote to '{}'", quote.category),
            )),
            Response::Imported { count } => Some(Notification::new(
                Success,
                format!("Quotes imported successfully! ({} quotes)", count),
            )),
            Response::FilterApplied { requested, applied } if requested != applied => {
                Some(Notification::new(
                    Warning,
                    format!("Unknown category '{}', showing {}", requested, applied),
                ))
            }
            Response::FilterApplied { .. } => None,
            Response::Synced(outcome) => {
                let level = match outcome {
                    SyncOutcome::Succeeded { .. } => Success,
                    SyncOutcome::Failed(_) => Error,
                    SyncOutcome::AlreadyRunning | SyncOutcome::Disabled => Warning,
                };
                Some(Notification::new(level, outcome.to_string()))
            }
        }
    }
}

/// Shared store, sync engine and remote source
#[derive(Clone)]
pub struct QuoteApp {
    store: SharedStore,
    engine: Arc<SyncEngine>,
    source: Option<Arc<dyn RemoteSource>>,
}

impl QuoteApp {
    /// Wrap a store; sync stays disabled until a source is attached
    pub fn new(store: QuoteStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            engine: Arc::new(SyncEngine::new()),
            source: None,
        }
    }

    /// Open file-backed storage and the HTTP source described by `config`
    pub fn from_config(config: &Config) -> Result<Self, QuoteError> {
        let app = Self::new(QuoteStore::open_with_config(config));

        match HttpRemoteSource::from_config(config)? {
            Some(source) => Ok(app.with_remote(Arc::new(source))),
            None => Ok(app),
        }
    }

    /// Attach a remote source
    pub fn with_remote(mut self, source: Arc<dyn RemoteSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn remote(&self) -> Option<&Arc<dyn RemoteSource>> {
        self.source.as_ref()
    }

    /// Run one sync pass
    pub async fn sync(&self) -> SyncOutcome {
        match &self.source {
            Some(source) => self.engine.sync(&self.store, source.as_ref()).await,
            None => SyncOutcome::Disabled,
        }
    }

    /// Pick a random quote and remember it as the last viewed one
    async fn show_random(&self, category: Option<String>) -> Option<Quote> {
        let mut store = self.store.lock().await;
        store.reload();
        let filter = category.unwrap_or_else(|| store.selected_filter());
        let quote = store.random_quote(&filter).cloned();
        if let Some(ref quote) = quote {
            store.set_last_viewed(quote);
        }
        quote
    }

    /// Carry out an intent
    pub async fn dispatch(&self, intent: Intent) -> Result<Response, QuoteError> {
        debug!("Dispatching {:?}", intent);

        match intent {
            Intent::ManualSync => Ok(Response::Synced(self.sync().await)),
            Intent::ShowRandom { category } => Ok(Response::Quote(self.show_random(category).await)),
            Intent::ShowLast => Ok(Response::Quote(self.store.lock().await.last_viewed())),
            Intent::Resume => {
                let last = self.store.lock().await.last_viewed();
                match last {
                    Some(quote) => Ok(Response::Quote(Some(quote))),
                    None => Ok(Response::Quote(self.show_random(None).await)),
                }
            }
            Intent::AddQuote { text, category } => {
                let quote = self.store.lock().await.add(&text, &category)?;
                Ok(Response::Added(quote))
            }
            Intent::Import { contents } => {
                let quotes = parse_import(&contents)?;
                let count = quotes.len();
                self.store.lock().await.replace_all(quotes)?;
                Ok(Response::Imported { count })
            }
            Intent::Export => {
                let mut store = self.store.lock().await;
                store.reload();
                Ok(Response::Exported(export_quotes(store.quotes())?))
            }
            Intent::Filter { category } => {
                let requested = if category.trim().is_empty() {
                    ALL_CATEGORIES.to_string()
                } else {
                    category.trim().to_string()
                };
                let mut store = self.store.lock().await;
                store.reload();
                let applied = store.set_selected_filter(&requested);
                Ok(Response::FilterApplied { requested, applied })
            }
            Intent::ListCategories => {
                let mut store = self.store.lock().await;
                store.reload();
                Ok(Response::Categories {
                    categories: store.categories(),
                    selected: store.selected_filter(),
                })
            }
        }
    }
}
