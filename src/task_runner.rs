/// Periodic background task runner
///
/// Runs one iteration immediately, then on a fixed cadence until shutdown.
/// A failed iteration is logged and the next tick retries; there is no
/// backoff growth and no failure count after which the task gives up.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

/// Run `task_fn` every `period` until `shutdown_rx` fires or its sender
/// is dropped. An iteration in flight when shutdown arrives is dropped.
pub async fn run_periodic<F, Fut, E>(
    task_name: &str,
    period: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
    mut task_fn: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut consecutive_failures: u32 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_rx.recv() => {
                info!("Task '{}' stopped", task_name);
                return;
            }
        }

        tokio::select! {
            result = task_fn() => match result {
                Ok(()) => {
                    if consecutive_failures > 0 {
                        warn!(
                            "Task '{}' recovered after {} failures",
                            task_name, consecutive_failures
                        );
                    }
                    consecutive_failures = 0;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    error!(
                        "Task '{}' failed (consecutive failures: {}), retrying in {:?}: {}",
                        task_name, consecutive_failures, period, e
                    );
                }
            },
            _ = shutdown_rx.recv() => {
                info!("Task '{}' stopped during an iteration", task_name);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_failures_do_not_stop_the_task() {
        let attempt_count = Arc::new(AtomicUsize::new(0));
        let attempt_count_clone = attempt_count.clone();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move {
            run_periodic("failing_task", Duration::from_millis(10), shutdown_rx, || {
                attempt_count_clone.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>("always fails") }
            })
            .await;
        });

        tokio::time::sleep(Duration::from_millis(120)).await;
        let _ = shutdown_tx.send(());
        handle.await.unwrap();

        assert!(attempt_count.load(Ordering::SeqCst) >= 5);
    }

    #[tokio::test]
    async fn test_first_iteration_runs_immediately() {
        let attempt_count = Arc::new(AtomicUsize::new(0));
        let attempt_count_clone = attempt_count.clone();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move {
            run_periodic("slow_cadence", Duration::from_secs(3600), shutdown_rx, || {
                attempt_count_clone.fetch_add(1, Ordering::SeqCst);
                async { Ok::<(), String>(()) }
            })
            .await;
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(attempt_count.load(Ordering::SeqCst), 1);

        let _ = shutdown_tx.send(());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_sender_stops_the_task() {
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        let handle = tokio::spawn(async move {
            run_periodic("orphaned", Duration::from_millis(5), shutdown_rx, || async {
                Ok::<(), String>(())
            })
            .await;
        });

        drop(shutdown_tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should stop once the shutdown sender is gone")
            .unwrap();
    }
}
