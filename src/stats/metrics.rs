//! Process-wide relay counters

use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current wall-clock time as milliseconds since the Unix epoch
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Process-wide relay counters
///
/// Written by the ingest path and the registry, read concurrently by the
/// status task. Initialized at process start; reset only by restart.
#[derive(Debug)]
pub struct RelayStats {
    /// Successfully decoded and relayed messages (monotonic)
    messages: AtomicU64,
    /// Datagrams dropped because they failed to decode
    decode_errors: AtomicU64,
    /// Unix millis of the last successfully decoded message
    last_message_ms: AtomicI64,
    /// Currently connected subscribers
    subscribers: AtomicU32,
}

impl RelayStats {
    /// Create stats with the activity clock starting now
    pub fn new() -> Self {
        Self {
            messages: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            last_message_ms: AtomicI64::new(unix_millis()),
            subscribers: AtomicU32::new(0),
        }
    }

    /// Record one successfully decoded message
    pub fn record_message(&self) -> u64 {
        self.last_message_ms.store(unix_millis(), Ordering::Relaxed);
        self.messages.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a datagram dropped on decode failure
    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a subscriber joining, returns the new count
    pub fn subscriber_joined(&self) -> u32 {
        self.subscribers.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a subscriber leaving, returns the new count
    pub fn subscriber_left(&self) -> u32 {
        self.subscribers
            .fetch_sub(1, Ordering::Relaxed)
            .saturating_sub(1)
    }

    /// Total messages relayed
    pub fn message_count(&self) -> u64 {
        self.messages.load(Ordering::Relaxed)
    }

    /// Total datagrams dropped on decode failure
    pub fn decode_errors(&self) -> u64 {
        self.decode_errors.load(Ordering::Relaxed)
    }

    /// Unix millis of the last relayed message
    pub fn last_message_ms(&self) -> i64 {
        self.last_message_ms.load(Ordering::Relaxed)
    }

    /// Currently connected subscribers
    pub fn subscriber_count(&self) -> u32 {
        self.subscribers.load(Ordering::Relaxed)
    }

    /// Whether a message arrived within the activity window
    pub fn is_active(&self, window: Duration) -> bool {
        let since = unix_millis() - self.last_message_ms();
        since < window.as_millis() as i64
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            messages: self.message_count(),
            decode_errors: self.decode_errors(),
            last_message_ms: self.last_message_ms(),
            subscribers: self.subscriber_count(),
        }
    }
}

impl Default for RelayStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the relay counters
#[derive(Debug, Clone, Copy)]
pub struct StatsSnapshot {
    pub messages: u64,
    pub decode_errors: u64,
    pub last_message_ms: i64,
    pub subscribers: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_counters() {
        let stats = RelayStats::new();
        assert_eq!(stats.message_count(), 0);

        assert_eq!(stats.record_message(), 1);
        assert_eq!(stats.record_message(), 2);
        assert_eq!(stats.message_count(), 2);

        stats.record_decode_error();
        assert_eq!(stats.decode_errors(), 1);
        // Decode failures never count as messages
        assert_eq!(stats.message_count(), 2);
    }

    #[test]
    fn test_subscriber_count() {
        let stats = RelayStats::new();
        assert_eq!(stats.subscriber_joined(), 1);
        assert_eq!(stats.subscriber_joined(), 2);
        assert_eq!(stats.subscriber_left(), 1);
        assert_eq!(stats.subscriber_count(), 1);
    }

    #[test]
    fn test_active_within_window() {
        let stats = RelayStats::new();
        // Clock starts at construction, so a fresh instance reads active
        assert!(stats.is_active(Duration::from_secs(5)));
        assert!(!stats.is_active(Duration::ZERO));

        stats.record_message();
        assert!(stats.is_active(Duration::from_millis(5000)));
    }

    #[test]
    fn test_snapshot() {
        let stats = RelayStats::new();
        stats.record_message();
        stats.subscriber_joined();

        let snap = stats.snapshot();
        assert_eq!(snap.messages, 1);
        assert_eq!(snap.subscribers, 1);
        assert!(snap.last_message_ms > 0);
    }
}
