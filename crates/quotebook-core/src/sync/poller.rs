//! Periodic sync
//!
//! Background task that runs a sync pass on a fixed interval and on demand.
//! Passes run one at a time inside the task; the engine's in-flight guard
//! covers overlap with manual syncs started elsewhere.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::engine::SyncOutcome;
use crate::app::QuoteApp;

/// Commands sent to the sync task
#[derive(Debug)]
pub enum SyncCommand {
    /// Run a sync pass now
    SyncNow,
    /// Shutdown the sync task
    Shutdown,
}

/// Events from the sync task
#[derive(Debug)]
pub enum PollerEvent {
    /// A pass finished (or was skipped)
    Synced(SyncOutcome),
}

/// Handle for controlling the background sync task
pub struct SyncHandle {
    pub command_tx: mpsc::Sender<SyncCommand>,
    pub event_rx: mpsc::Receiver<PollerEvent>,
}

impl SyncHandle {
    /// Ask the task to sync immediately
    pub async fn sync_now(&self) {
        let _ = self.command_tx.send(SyncCommand::SyncNow).await;
    }

    /// Stop the task
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(SyncCommand::Shutdown).await;
    }
}

/// Spawn a background task that syncs every `interval`
///
/// The first periodic pass runs one full interval after spawning.
pub fn spawn_sync_poller(app: QuoteApp, interval: Duration) -> SyncHandle {
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);

    tokio::spawn(sync_poller_task(app, interval, command_rx, event_tx));

    SyncHandle {
        command_tx,
        event_rx,
    }
}

async fn sync_poller_task(
    app: QuoteApp,
    interval: Duration,
    mut command_rx: mpsc::Receiver<SyncCommand>,
    event_tx: mpsc::Sender<PollerEvent>,
) {
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("Periodic sync triggered");
            }
            cmd = command_rx.recv() => {
                match cmd {
                    Some(SyncCommand::SyncNow) => debug!("Manual sync triggered"),
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
        }

        let outcome = app.sync().await;
        if event_tx.send(PollerEvent::Synced(outcome)).await.is_err() {
            // Nobody is listening anymore
            break;
        }
    }

    debug!("Sync poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use crate::remote::StaticRemoteSource;
    use crate::store::QuoteStore;
    use std::sync::Arc;

    fn test_app() -> QuoteApp {
        QuoteApp::new(QuoteStore::in_memory()).with_remote(Arc::new(StaticRemoteSource::new(
            vec![Quote::new("Remote", "general")],
        )))
    }

    async fn next_outcome(handle: &mut SyncHandle) -> SyncOutcome {
        let event = tokio::time::timeout(Duration::from_secs(5), handle.event_rx.recv())
            .await
            .expect("timed out waiting for sync event")
            .expect("poller stopped");
        match event {
            PollerEvent::Synced(outcome) => outcome,
        }
    }

    #[tokio::test]
    async fn test_periodic_sync() {
        let app = test_app();
        let mut handle = spawn_sync_poller(app.clone(), Duration::from_millis(50));

        let first = next_outcome(&mut handle).await;
        assert!(matches!(first, SyncOutcome::Succeeded { added: 1, .. }));

        let second = next_outcome(&mut handle).await;
        assert!(matches!(second, SyncOutcome::Succeeded { added: 0, .. }));

        handle.shutdown().await;
        assert_eq!(app.store().lock().await.len(), 4);
    }

    #[tokio::test]
    async fn test_sync_now() {
        let app = test_app();
        let mut handle = spawn_sync_poller(app.clone(), Duration::from_secs(3600));

        handle.sync_now().await;
        let outcome = next_outcome(&mut handle).await;
        assert!(outcome.is_success());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let mut handle = spawn_sync_poller(test_app(), Duration::from_secs(3600));

        handle.shutdown().await;
        let event = tokio::time::timeout(Duration::from_secs(5), handle.event_rx.recv())
            .await
            .expect("timed out waiting for poller to stop");
        assert!(event.is_none());
    }
}
