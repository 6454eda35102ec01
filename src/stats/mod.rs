//! Relay statistics and liveness monitoring
//!
//! One [`RelayStats`] instance is shared by the datagram listener (message
//! counters), the subscriber registry (subscriber count), and the status
//! task (reads). All fields are atomics, so the monitor never takes a lock
//! the hot path holds.

pub mod metrics;
pub mod monitor;

pub use metrics::{unix_millis, RelayStats, StatsSnapshot};
pub use monitor::spawn_status_task;
