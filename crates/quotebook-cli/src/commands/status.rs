//! Status command handler

use anyhow::Result;

use quotebook_core::{Config, QuoteApp};

use crate::output::{Output, OutputFormat};

/// Show status information
pub async fn show(app: &QuoteApp, config: &Config, output: &Output) -> Result<()> {
    let store = app.store().lock().await;
    let categories = store.categories();
    let selected = store.selected_filter();
    let last_synced = store.last_synced_at();
    let remote = app.remote().map(|r| r.describe());

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "quotes": store.len(),
                    // Excludes the "all" entry
                    "categories": categories.len().saturating_sub(1),
                    "filter": selected,
                    "sync_enabled": remote.is_some(),
                    "remote_url": remote,
                    "last_synced_at": last_synced.map(|t| t.to_rfc3339()),
                    "storage": {
                        "data_dir": config.data_dir,
                        "session_dir": config.session_dir,
                        "degraded": store.is_degraded()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("Quotebook Status");
            println!("================");
            println!();
            println!("Collection:");
            println!("  Quotes:     {}", store.len());
            println!("  Categories: {}", categories.len().saturating_sub(1));
            println!("  Filter:     {}", selected);
            println!();
            println!("Sync:");
            match remote {
                Some(ref url) => {
                    println!("  Status: enabled");
                    println!("  Source: {}", url);
                }
                None => println!("  Status: disabled"),
            }
            println!(
                "  Last:   {}",
                last_synced
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "never".to_string())
            );
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Session:  {}", config.session_dir.display());
            if store.is_degraded() {
                println!("  Mode:     in-memory (writes failed, changes will not persist)");
            }
        }
    }

    Ok(())
}
