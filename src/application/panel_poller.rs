//! Side panels that refresh on their own timers, apart from the main sync
//! loop: market prices every 10 s and the analyst team every 30 s.
//!
//! A panel loads once on start, then again on every tick while auto-refresh
//! is on, on every manual refresh, and when auto-refresh is switched back on.
//! A failed load keeps whatever the panel showed before.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::entities::market::MarketTick;
use crate::domain::entities::team::TeamStatus;
use crate::domain::repositories::dashboard_api::{DashboardApi, SyncResult};
use crate::domain::services::metrics::latest_ticks_by_volume;

#[derive(Debug, Clone, PartialEq)]
pub struct PanelState<T> {
    pub data: Option<T>,
    /// When `data` was last replaced by a successful load
    pub last_update: Option<DateTime<Utc>>,
    pub loading: bool,
}

impl<T> Default for PanelState<T> {
    fn default() -> Self {
        Self {
            data: None,
            last_update: None,
            loading: false,
        }
    }
}

pub struct PanelHandle<T> {
    name: &'static str,
    state_rx: watch::Receiver<PanelState<T>>,
    auto_refresh_tx: watch::Sender<bool>,
    refresh: Arc<Notify>,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl<T: Clone> PanelHandle<T> {
    pub fn subscribe(&self) -> watch::Receiver<PanelState<T>> {
        self.state_rx.clone()
    }

    pub fn current(&self) -> PanelState<T> {
        self.state_rx.borrow().clone()
    }

    pub fn auto_refresh(&self) -> bool {
        *self.auto_refresh_tx.borrow()
    }

    /// Pause or resume the timer. Resuming loads right away.
    pub fn set_auto_refresh(&self, enabled: bool) {
        let changed = self.auto_refresh_tx.send_if_modified(|current| {
            if *current == enabled {
                false
            } else {
                *current = enabled;
                true
            }
        });
        if changed {
            info!("Panel '{}' auto-refresh {}", self.name, if enabled { "on" } else { "off" });
        }
    }

    /// Load now, whether or not auto-refresh is on. A request made while a
    /// load is running is served right after it.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            error!("Panel '{}' task ended abnormally: {}", self.name, e);
        }
    }
}

pub struct PanelPoller;

impl PanelPoller {
    pub fn spawn<T, F, Fut>(
        name: &'static str,
        interval: Duration,
        auto_refresh: bool,
        load: F,
    ) -> PanelHandle<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = SyncResult<T>> + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(PanelState::default());
        let (auto_refresh_tx, auto_refresh_rx) = watch::channel(auto_refresh);
        let refresh = Arc::new(Notify::new());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let task = tokio::spawn(run_panel(
            name,
            interval,
            state_tx,
            auto_refresh_rx,
            refresh.clone(),
            shutdown_rx,
            load,
        ));

        PanelHandle {
            name,
            state_rx,
            auto_refresh_tx,
            refresh,
            shutdown_tx,
            task,
        }
    }
}

/// Latest price per symbol, busiest first.
pub fn market_panel(api: Arc<dyn DashboardApi>, interval: Duration) -> PanelHandle<Vec<MarketTick>> {
    PanelPoller::spawn("market", interval, true, move || {
        let api = api.clone();
        async move { api.market_data().await.map(latest_ticks_by_volume) }
    })
}

pub fn team_panel(api: Arc<dyn DashboardApi>, interval: Duration) -> PanelHandle<TeamStatus> {
    PanelPoller::spawn("team", interval, true, move || {
        let api = api.clone();
        async move { api.team().await }
    })
}

async fn run_panel<T, F, Fut>(
    name: &'static str,
    interval: Duration,
    state_tx: watch::Sender<PanelState<T>>,
    mut auto_refresh_rx: watch::Receiver<bool>,
    refresh: Arc<Notify>,
    mut shutdown_rx: broadcast::Receiver<()>,
    load: F,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = SyncResult<T>>,
{
    debug!("Panel '{}' started, interval {:?}", name, interval);
    if !load_once(name, &state_tx, load(), &mut shutdown_rx).await {
        return;
    }

    loop {
        let auto = *auto_refresh_rx.borrow();
        tokio::select! {
            _ = tokio::time::sleep(interval), if auto => {}
            _ = refresh.notified() => debug!("Panel '{}' manual refresh", name),
            changed = auto_refresh_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                if !*auto_refresh_rx.borrow_and_update() {
                    continue;
                }
            }
            _ = shutdown_rx.recv() => {
                debug!("Panel '{}' stopped", name);
                return;
            }
        }

        if !load_once(name, &state_tx, load(), &mut shutdown_rx).await {
            return;
        }
    }
}

/// Returns false if shutdown arrived during the load.
async fn load_once<T, Fut>(
    name: &str,
    state_tx: &watch::Sender<PanelState<T>>,
    load: Fut,
    shutdown_rx: &mut broadcast::Receiver<()>,
) -> bool
where
    Fut: Future<Output = SyncResult<T>>,
{
    state_tx.send_modify(|s| s.loading = true);

    let result = tokio::select! {
        result = load => result,
        _ = shutdown_rx.recv() => {
            debug!("Panel '{}' stopped during a load", name);
            return false;
        }
    };

    match result {
        Ok(data) => state_tx.send_modify(|s| {
            s.data = Some(data);
            s.last_update = Some(Utc::now());
            s.loading = false;
        }),
        Err(e) => {
            warn!("Panel '{}' refresh failed, keeping previous data: {}", name, e);
            state_tx.send_modify(|s| s.loading = false);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::SyncError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_loader(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn() -> std::future::Ready<SyncResult<usize>> + Send + 'static {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(Ok(n))
        }
    }

    async fn wait_for_data<T: Clone>(
        rx: &mut watch::Receiver<PanelState<T>>,
        pred: impl Fn(&PanelState<T>) -> bool,
    ) -> PanelState<T> {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                {
                    let state = rx.borrow_and_update();
                    if pred(&*state) {
                        return state.clone();
                    }
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("panel never reached the expected state")
    }

    #[tokio::test]
    async fn test_initial_load_is_immediate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = PanelPoller::spawn(
            "test",
            Duration::from_secs(3600),
            true,
            counting_loader(calls.clone()),
        );

        let mut rx = handle.subscribe();
        let state = wait_for_data(&mut rx, |s| s.data.is_some()).await;

        assert_eq!(state.data, Some(1));
        assert!(state.last_update.is_some());
        assert!(!state.loading);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_auto_refresh_reloads_on_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = PanelPoller::spawn(
            "test",
            Duration::from_millis(10),
            true,
            counting_loader(calls.clone()),
        );

        let mut rx = handle.subscribe();
        wait_for_data(&mut rx, |s| s.data.unwrap_or(0) >= 3).await;
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_paused_panel_only_loads_on_demand() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = PanelPoller::spawn(
            "test",
            Duration::from_millis(10),
            false,
            counting_loader(calls.clone()),
        );

        let mut rx = handle.subscribe();
        wait_for_data(&mut rx, |s| s.data == Some(1)).await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        handle.refresh_now();
        let state = wait_for_data(&mut rx, |s| s.data == Some(2)).await;
        assert_eq!(state.data, Some(2));
        assert!(!handle.auto_refresh());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_resuming_auto_refresh_loads_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = PanelPoller::spawn(
            "test",
            Duration::from_secs(3600),
            false,
            counting_loader(calls.clone()),
        );

        let mut rx = handle.subscribe();
        wait_for_data(&mut rx, |s| s.data == Some(1)).await;

        handle.set_auto_refresh(true);
        wait_for_data(&mut rx, |s| s.data == Some(2)).await;
        assert!(handle.auto_refresh());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_data() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let handle = PanelPoller::spawn("test", Duration::from_secs(3600), true, move || {
            let n = calls_clone.fetch_add(1, Ordering::SeqCst) + 1;
            let result = if n == 1 {
                Ok("first".to_string())
            } else {
                Err(SyncError::HttpStatus {
                    endpoint: "/market-data".to_string(),
                    status: 503,
                })
            };
            std::future::ready(result)
        });

        let mut rx = handle.subscribe();
        let first = wait_for_data(&mut rx, |s| s.data.is_some()).await;

        handle.refresh_now();
        tokio::time::timeout(Duration::from_secs(2), async {
            while calls.load(Ordering::SeqCst) < 2 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        let state = wait_for_data(&mut rx, |s| !s.loading).await;

        assert_eq!(state.data.as_deref(), Some("first"));
        assert_eq!(state.last_update, first.last_update);
        handle.shutdown().await;
    }
}
