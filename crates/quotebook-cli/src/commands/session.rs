//! Session command handlers

use anyhow::{Context, Result};

use quotebook_core::QuoteApp;

use crate::output::Output;

/// Forget session state (the last viewed quote)
pub async fn clear(app: &QuoteApp, output: &Output) -> Result<()> {
    app.store()
        .lock()
        .await
        .clear_session()
        .context("Failed to clear session")?;

    output.success("Session cleared");
    Ok(())
}
