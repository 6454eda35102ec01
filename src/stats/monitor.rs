//! Periodic status reporting
//!
//! Purely observational: reads the atomic counters on a timer and prints a
//! one-line status to the operator console. Has no effect on relay
//! correctness and never touches the hot path.

use std::sync::Arc;
use std::time::Duration;

use super::metrics::RelayStats;

/// Spawn the background status task
///
/// Prints `[status] ACTIVE | messages: N | subscribers: K` every `interval`.
/// The relay reads as ACTIVE while the last message is younger than
/// `window`. Returns a handle that can be used to abort the task.
pub fn spawn_status_task(
    stats: Arc<RelayStats>,
    interval: Duration,
    window: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately, skip it so the first line lands
        // one full interval after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let snap = stats.snapshot();
            let state = if stats.is_active(window) {
                "ACTIVE"
            } else {
                "IDLE"
            };
            println!(
                "[status] {} | messages: {} | subscribers: {}",
                state, snap.messages, snap.subscribers
            );
        }
    })
}
