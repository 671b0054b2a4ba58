use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::live_state::LiveState;

/// Owned container for the live dashboard state.
///
/// Readers subscribe and always see a complete `LiveState`; every update
/// swaps in a new value in one step. Subscribers are only woken when the
/// value actually changed.
#[derive(Clone)]
pub struct LiveStore {
    tx: Arc<watch::Sender<Arc<LiveState>>>,
}

impl LiveStore {
    pub fn new() -> Self {
        Self::with_state(LiveState::default())
    }

    pub fn with_state(state: LiveState) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(state));
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<LiveState>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Arc<LiveState> {
        self.tx.borrow().clone()
    }

    /// Apply a transition and publish the result if it differs.
    /// Returns whether subscribers were notified.
    pub fn update<F>(&self, transition: F) -> bool
    where
        F: FnOnce(&LiveState) -> LiveState,
    {
        self.tx.send_if_modified(|held| {
            let next = transition(held);
            if next == **held {
                false
            } else {
                *held = Arc::new(next);
                true
            }
        })
    }
}

impl Default for LiveStore {
    fn default() -> Self {
        Self::new()
    }
}
