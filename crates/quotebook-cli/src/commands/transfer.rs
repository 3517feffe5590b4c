//! Export and import command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use quotebook_core::interchange::EXPORT_FILE_NAME;
use quotebook_core::{Intent, QuoteApp, Response};

use super::{dispatch, warn_if_degraded};
use crate::output::Output;

/// Write the collection to a JSON file (`-` for stdout)
pub async fn export(app: &QuoteApp, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let Response::Exported(contents) = dispatch(app, Intent::Export).await? else {
        return Ok(());
    };

    let path = path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
    if path.as_os_str() == "-" {
        println!("{}", contents);
        return Ok(());
    }

    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write export file: {:?}", path))?;

    let count = app.store().lock().await.len();
    output.success(&format!("Exported {} quotes to {}", count, path.display()));
    Ok(())
}

/// Replace the collection with the contents of a JSON file
pub async fn import(app: &QuoteApp, path: PathBuf, output: &Output) -> Result<()> {
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read import file: {:?}", path))?;

    let response = dispatch(app, Intent::Import { contents }).await?;
    if let Some(notification) = response.notification() {
        output.notify(&notification);
    }

    warn_if_degraded(app, output).await;
    Ok(())
}
