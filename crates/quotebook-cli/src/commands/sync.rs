//! Sync command handlers

use std::time::Duration;

use anyhow::{bail, Result};
use tracing::info;

use quotebook_core::sync::PollerEvent;
use quotebook_core::{spawn_sync_poller, Config, Intent, QuoteApp, Response, SyncOutcome};

use super::{dispatch, warn_if_degraded};
use crate::output::Output;

/// Sync once with the remote source
pub async fn sync(app: &QuoteApp, output: &Output) -> Result<()> {
    ensure_remote(app)?;

    if let Some(remote) = app.remote() {
        output.message(&format!("Fetching quotes from {}...", remote.describe()));
    }

    let Response::Synced(outcome) = dispatch(app, Intent::ManualSync).await? else {
        return Ok(());
    };
    if let SyncOutcome::Failed(e) = outcome {
        return Err(e.into());
    }

    report(&outcome, output);
    warn_if_degraded(app, output).await;
    Ok(())
}

/// Sync immediately, then periodically until interrupted
pub async fn watch(
    app: &QuoteApp,
    config: &Config,
    interval_secs: Option<u64>,
    output: &Output,
) -> Result<()> {
    ensure_remote(app)?;

    let interval = interval_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.sync_interval());

    output.message(&format!(
        "Syncing every {}s, press Ctrl-C to stop",
        interval.as_secs()
    ));
    info!("Starting watch mode, interval={:?}", interval);

    let mut handle = spawn_sync_poller(app.clone(), interval);
    handle.sync_now().await;

    loop {
        tokio::select! {
            event = handle.event_rx.recv() => {
                match event {
                    Some(PollerEvent::Synced(outcome)) => report(&outcome, output),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                handle.shutdown().await;
                output.message("Stopped");
                break;
            }
        }
    }

    warn_if_degraded(app, output).await;
    Ok(())
}

fn ensure_remote(app: &QuoteApp) -> Result<()> {
    if app.remote().is_none() {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             quotebook config set sync_enabled true\n  \
             quotebook config set remote_url https://your-server/quotes"
        );
    }
    Ok(())
}

fn report(outcome: &SyncOutcome, output: &Output) {
    match outcome {
        SyncOutcome::Succeeded { categories, .. } => {
            output.success(&outcome.to_string());
            output.message(&format!("  Categories: {}", categories.join(", ")));
        }
        SyncOutcome::Failed(_) | SyncOutcome::AlreadyRunning | SyncOutcome::Disabled => {
            output.warning(&outcome.to_string());
        }
    }
}
