//! Command handlers

pub mod category;
pub mod config;
pub mod quote;
pub mod session;
pub mod status;
pub mod sync;
pub mod transfer;

use anyhow::{bail, Result};

use quotebook_core::{Intent, Notification, QuoteApp, QuoteError, Response};

use crate::output::Output;

/// Dispatch an intent, turning a core error into a user-facing one
pub(crate) async fn dispatch(app: &QuoteApp, intent: Intent) -> Result<Response> {
    match app.dispatch(intent).await {
        Ok(response) => Ok(response),
        Err(e) => {
            let notification = Notification::from_error(&e);
            match &e {
                QuoteError::StorageUnavailable(storage) => match storage.recovery_suggestion() {
                    Some(hint) => bail!("{}\n  {}", notification.message, hint),
                    None => bail!("{}", notification.message),
                },
                _ => bail!("{}", notification.message),
            }
        }
    }
}

/// Warn when writes are no longer reaching disk
pub(crate) async fn warn_if_degraded(app: &QuoteApp, output: &Output) {
    if app.store().lock().await.is_degraded() {
        output.warning("Storage unavailable, changes will be lost when quotebook exits");
    }
}
