//! Quote command handlers

use anyhow::Result;

use quotebook_core::{Intent, QuoteApp, Response};

use super::{dispatch, warn_if_degraded};
use crate::output::Output;

/// Show a random quote from the selected (or given) category
pub async fn show(app: &QuoteApp, category: Option<String>, output: &Output) -> Result<()> {
    let response = dispatch(app, Intent::ShowRandom { category }).await?;
    print_quote_response(&response, output);
    Ok(())
}

/// Pick up where the session left off, or show a random quote
pub async fn resume(app: &QuoteApp, output: &Output) -> Result<()> {
    let response = dispatch(app, Intent::Resume).await?;
    print_quote_response(&response, output);
    Ok(())
}

/// Show the last quote viewed in this session
pub async fn last(app: &QuoteApp, output: &Output) -> Result<()> {
    match dispatch(app, Intent::ShowLast).await? {
        Response::Quote(Some(quote)) => output.print_quote(&quote),
        _ => output.message("No quote viewed in this session yet."),
    }
    Ok(())
}

/// Add a new quote
pub async fn add(app: &QuoteApp, text: String, category: String, output: &Output) -> Result<()> {
    let response = dispatch(app, Intent::AddQuote { text, category }).await?;

    if let Some(notification) = response.notification() {
        output.notify(&notification);
    }
    if let Response::Added(quote) = &response {
        if output.is_quiet() {
            output.print_quote(quote);
        }
    }

    warn_if_degraded(app, output).await;
    Ok(())
}

/// List quotes, filtered by category (defaults to the selected filter)
pub async fn list(app: &QuoteApp, category: Option<String>, output: &Output) -> Result<()> {
    let mut store = app.store().lock().await;
    store.reload();
    let filter = category.unwrap_or_else(|| store.selected_filter());
    output.print_quotes(&store.filtered(&filter));
    Ok(())
}

fn print_quote_response(response: &Response, output: &Output) {
    match response {
        Response::Quote(Some(quote)) => output.print_quote(quote),
        other => {
            if let Some(notification) = other.notification() {
                output.notify(&notification);
            }
        }
    }
}
