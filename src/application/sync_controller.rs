//! Keeps the live dashboard state in step with the trading backend.
//!
//! Two independent tasks write into one [`LiveStore`]:
//! - the poll task re-fetches the five dashboard resources on a fixed
//!   interval and replaces them together, or not at all;
//! - the push task holds the `/ws` connection open, folds every
//!   `portfolio_update` into the state, and after any close waits a flat
//!   delay before connecting again, forever.
//!
//! Whichever write lands last wins; the next poll reconciles any race.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::application::live_store::LiveStore;
use crate::config::DashboardConfig;
use crate::domain::errors::{PushError, SyncError};
use crate::domain::live_state::{ConnectionState, LiveState, PollBatch, PushEvent};
use crate::domain::repositories::dashboard_api::{DashboardApi, SyncResult};
use crate::infrastructure::push_channel::{push_url, PushSession};
use crate::task_runner::run_periodic;

/// How a push session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Closed,
    Shutdown,
}

/// Fetch the five dashboard resources concurrently. The first failure
/// fails the whole batch.
pub async fn fetch_batch(api: &dyn DashboardApi, config: &DashboardConfig) -> SyncResult<PollBatch> {
    let (status, portfolio, trades, history, decisions) = tokio::try_join!(
        api.status(),
        api.portfolio(),
        api.trades(config.trades_limit),
        api.portfolio_history(config.history_days),
        api.ai_decisions(config.decisions_limit),
    )?;

    Ok(PollBatch {
        status,
        portfolio,
        trades,
        history,
        decisions,
    })
}

/// Poll once and publish the result. On error nothing is written.
pub async fn poll_once(
    api: &dyn DashboardApi,
    store: &LiveStore,
    config: &DashboardConfig,
) -> SyncResult<()> {
    let batch = fetch_batch(api, config).await?;
    info!(
        "Portfolio refreshed: total={:?} cash={:?} positions_value={:?}",
        batch.portfolio.total_balance, batch.portfolio.cash_balance, batch.portfolio.positions_value
    );
    store.update(|state| state.apply_poll(batch));
    Ok(())
}

/// Decode one push frame and fold it into the store. Malformed frames are
/// logged and dropped; the channel stays up.
pub fn handle_push_frame(store: &LiveStore, raw: &str) {
    match PushEvent::parse(raw) {
        Ok(event) => {
            match &event {
                PushEvent::PortfolioUpdate {
                    snapshot,
                    recent_trades,
                    wallet_synced,
                } => debug!(
                    "Push portfolio update: cash={:?} positions={} recent_trades={} wallet_synced={}",
                    snapshot.cash_balance,
                    snapshot.positions.len(),
                    recent_trades.as_ref().map_or(0, |t| t.len()),
                    wallet_synced
                ),
                PushEvent::Ignored { kind } => debug!("Ignoring push message of type '{}'", kind),
            }
            store.update(|state| state.apply_push(&event));
        }
        Err(e) => warn!("Dropping malformed push message: {}", e),
    }
}

/// Owner-side handle for a running sync controller. Dropping it without
/// calling [`SyncHandle::shutdown`] also stops the tasks, just without
/// waiting for them.
pub struct SyncHandle {
    store: LiveStore,
    shutdown_tx: broadcast::Sender<()>,
    connect_attempts: Arc<AtomicU64>,
    tasks: Vec<JoinHandle<()>>,
}

impl SyncHandle {
    pub fn subscribe(&self) -> watch::Receiver<Arc<LiveState>> {
        self.store.subscribe()
    }

    pub fn current(&self) -> Arc<LiveState> {
        self.store.current()
    }

    /// Push-channel connection attempts made so far, including the first.
    pub fn connect_attempts(&self) -> u64 {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    /// Stop polling, close the push channel and suppress further
    /// reconnects. Returns once every task has finished.
    pub async fn shutdown(self) {
        info!("Sync controller shutting down");
        let _ = self.shutdown_tx.send(());
        for task in self.tasks {
            if let Err(e) = task.await {
                error!("Sync task ended abnormally: {}", e);
            }
        }
    }
}

pub struct SyncController;

impl SyncController {
    pub fn spawn(api: Arc<dyn DashboardApi>, config: DashboardConfig) -> Result<SyncHandle, SyncError> {
        Self::spawn_with_store(api, config, LiveStore::new())
    }

    pub fn spawn_with_store(
        api: Arc<dyn DashboardApi>,
        config: DashboardConfig,
        store: LiveStore,
    ) -> Result<SyncHandle, SyncError> {
        let ws_url = push_url(&config.backend_url)?;
        let (shutdown_tx, _) = broadcast::channel(1);
        let connect_attempts = Arc::new(AtomicU64::new(0));

        info!(
            "Sync controller starting: poll every {:?}, push channel {}",
            config.poll_interval, ws_url
        );

        let poll_task = {
            let store = store.clone();
            let shutdown_rx = shutdown_tx.subscribe();
            let config = config.clone();
            tokio::spawn(async move {
                let period = config.poll_interval;
                run_periodic("dashboard_poll", period, shutdown_rx, || {
                    poll_once(api.as_ref(), &store, &config)
                })
                .await;
            })
        };

        let push_task = {
            let store = store.clone();
            let shutdown_rx = shutdown_tx.subscribe();
            let attempts = connect_attempts.clone();
            let delay = config.reconnect_delay;
            tokio::spawn(async move {
                run_push_channel(ws_url, store, delay, attempts, shutdown_rx).await;
            })
        };

        Ok(SyncHandle {
            store,
            shutdown_tx,
            connect_attempts,
            tasks: vec![poll_task, push_task],
        })
    }
}

async fn run_push_channel(
    url: Url,
    store: LiveStore,
    reconnect_delay: Duration,
    attempts: Arc<AtomicU64>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Push channel connection attempt #{}", attempt);
        store.update(|s| s.with_push_channel(ConnectionState::Connecting));

        let outcome = push_session(&url, &store, &mut shutdown_rx).await;
        store.update(|s| s.with_push_channel(ConnectionState::Disconnected));

        match outcome {
            Ok(SessionEnd::Shutdown) => {
                info!("Push channel stopped");
                return;
            }
            Ok(SessionEnd::Closed) => {
                info!("Push channel closed, reconnecting in {:?}", reconnect_delay);
            }
            Err(e) => {
                error!("Push channel error: {}, reconnecting in {:?}", e, reconnect_delay);
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(reconnect_delay) => {}
            _ = shutdown_rx.recv() => {
                info!("Push channel stopped while waiting to reconnect");
                return;
            }
        }
    }
}

async fn push_session(
    url: &Url,
    store: &LiveStore,
    shutdown_rx: &mut broadcast::Receiver<()>,
) -> Result<SessionEnd, PushError> {
    let mut session = tokio::select! {
        result = PushSession::connect(url) => result?,
        _ = shutdown_rx.recv() => return Ok(SessionEnd::Shutdown),
    };
    store.update(|s| s.with_push_channel(ConnectionState::Connected));

    loop {
        tokio::select! {
            frame = session.next_text() => match frame? {
                Some(text) => handle_push_frame(store, &text),
                None => return Ok(SessionEnd::Closed),
            },
            _ = shutdown_rx.recv() => {
                session.close().await;
                return Ok(SessionEnd::Shutdown);
            }
        }
    }
}
