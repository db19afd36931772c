use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tokio::time::{Duration as TokioDuration, sleep};
use tracing::{info, warn};

use crate::AppState;

const EVICTION_INTERVAL_MINUTES: u64 = 5;

/// Periodically drop dashboard workspaces nobody has touched for `idle`.
pub fn spawn(state: AppState, idle: StdDuration) {
    tokio::spawn(async move {
        let interval = TokioDuration::from_secs(EVICTION_INTERVAL_MINUTES * 60);
        loop {
            sleep(interval).await;
            run_eviction_cycle(&state, idle).await;
        }
    });
}

async fn run_eviction_cycle(state: &AppState, idle: StdDuration) -> usize {
    let cutoff = Duration::from_std(idle)
        .ok()
        .and_then(|delta| Utc::now().checked_sub_signed(delta));
    let Some(cutoff) = cutoff else {
        warn!(idle_secs = idle.as_secs(), "idle window out of range, skipping eviction");
        return 0;
    };

    let evicted = state.purge_idle(cutoff).await;
    if evicted > 0 {
        info!(evicted, "idle dashboard workspaces evicted");
    }
    evicted
}
