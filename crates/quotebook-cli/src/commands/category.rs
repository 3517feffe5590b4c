//! Category command handlers

use anyhow::Result;

use quotebook_core::category::category_counts;
use quotebook_core::{Intent, QuoteApp, Response};

use super::{dispatch, warn_if_degraded};
use crate::output::Output;

/// List categories with quote counts
pub async fn list(app: &QuoteApp, output: &Output) -> Result<()> {
    let store = app.store().lock().await;
    let counts = category_counts(store.quotes());
    output.print_categories(&counts, store.len(), &store.selected_filter());
    Ok(())
}

/// Select the category filter, or print the current one
pub async fn filter(app: &QuoteApp, category: Option<String>, output: &Output) -> Result<()> {
    let Some(category) = category else {
        let selected = app.store().lock().await.selected_filter();
        if output.is_json() {
            println!("{}", serde_json::json!({ "filter": selected }));
        } else if output.is_quiet() {
            println!("{}", selected);
        } else {
            println!("Current filter: {}", selected);
        }
        return Ok(());
    };

    let response = dispatch(app, Intent::Filter { category }).await?;
    if let Response::FilterApplied { applied, .. } = &response {
        match response.notification() {
            Some(notification) => output.notify(&notification),
            None => output.success(&format!("Filter set to '{}'", applied)),
        }
    }

    warn_if_degraded(app, output).await;
    Ok(())
}
