use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use vision_upstream::FetchJson;

use crate::aggregator::StatsAggregator;
use crate::stats::AggregatedStats;

/// Cancels the auto-update loop when cancelled or dropped.
pub struct AutoUpdateHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AutoUpdateHandle {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop the loop and wait for it to exit. Once this returns the callback
    /// will not be invoked again.
    pub async fn cancel(mut self) {
        self.token.cancel();

        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if err.is_panic() {
                    error!("Auto-update task panicked: {err}");
                }
            }
        }
    }
}

impl Drop for AutoUpdateHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Run a cycle now and hand it to `on_update`, then again `period` after each
/// completed cycle, until the returned handle is cancelled.
pub fn start_auto_update<F, C>(
    aggregator: Arc<StatsAggregator<F>>,
    period: Duration,
    mut on_update: C,
) -> AutoUpdateHandle
where
    F: FetchJson + 'static,
    C: FnMut(AggregatedStats) + Send + 'static,
{
    let token = CancellationToken::new();
    let cancelled = token.clone();

    let task = tokio::spawn(async move {
        loop {
            let stats = tokio::select! {
                biased;
                _ = cancelled.cancelled() => break,
                stats = aggregator.fetch_all_stats() => stats,
            };

            if cancelled.is_cancelled() {
                break;
            }
            on_update(stats);

            tokio::select! {
                biased;
                _ = cancelled.cancelled() => break,
                _ = tokio::time::sleep(period) => {}
            }
        }

        debug!("Auto-update stopped");
    });

    AutoUpdateHandle {
        token,
        task: Some(task),
    }
}
