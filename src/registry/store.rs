//! Subscriber registry implementation
//!
//! Thread-safe via `RwLock`. The broadcast path only ever takes the read
//! lock; add/remove take the write lock, so `snapshot()` is atomic with
//! respect to individual registrations and never observes a half-added or
//! half-removed subscriber.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Utf8Bytes;

use crate::stats::RelayStats;

use super::entry::{Subscriber, SubscriberId};

/// Registry of all connected subscribers
pub struct SubscriberRegistry {
    /// Map of subscriber id to handle
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,

    /// Next subscriber id to allocate
    next_id: AtomicU64,

    /// Shared counters (subscriber count lives here)
    stats: Arc<RelayStats>,
}

impl SubscriberRegistry {
    /// Create an empty registry
    pub fn new(stats: Arc<RelayStats>) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            stats,
        }
    }

    /// Register a new subscriber, returns its handle id
    ///
    /// Always succeeds; admission limits are enforced by the accept path
    /// before the subscriber reaches the registry.
    pub async fn register(
        &self,
        peer_addr: SocketAddr,
        tx: mpsc::Sender<Utf8Bytes>,
    ) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscriber = Subscriber::new(id, peer_addr, tx);

        self.subscribers.write().await.insert(id, subscriber);
        let total = self.stats.subscriber_joined();

        tracing::info!(
            subscriber = %id,
            peer = %peer_addr,
            total = total,
            "subscriber connected"
        );

        id
    }

    /// Remove a subscriber
    ///
    /// Idempotent: unregistering an already-removed id is a no-op.
    /// Returns whether the subscriber was still present.
    pub async fn unregister(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().await.remove(&id);

        if let Some(subscriber) = removed {
            let total = self.stats.subscriber_left();
            tracing::info!(
                subscriber = %id,
                peer = %subscriber.peer_addr,
                total = total,
                "subscriber removed"
            );
            true
        } else {
            false
        }
    }

    /// Point-in-time copy of the live subscriber set, ordered by id
    ///
    /// Safe to iterate while registration and unregistration proceed
    /// concurrently.
    pub async fn snapshot(&self) -> Vec<Subscriber> {
        let guard = self.subscribers.read().await;
        let mut subscribers: Vec<Subscriber> = guard.values().cloned().collect();
        subscribers.sort_by_key(|s| s.id);
        subscribers
    }

    /// Number of live subscribers
    pub async fn count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Fan one serialized payload out to every subscriber
    ///
    /// The payload was serialized once by the caller; clones here are
    /// reference-counted. A subscriber whose queue is full or whose
    /// connection task is gone is removed rather than allowed to stall the
    /// others. Returns the number of successful deliveries.
    pub async fn broadcast(&self, payload: Utf8Bytes) -> usize {
        let snapshot = self.snapshot().await;
        if snapshot.is_empty() {
            return 0;
        }

        let mut delivered = 0;
        let mut stale = Vec::new();

        for subscriber in &snapshot {
            match subscriber.try_push(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        subscriber = %subscriber.id,
                        peer = %subscriber.peer_addr,
                        "outbound queue full, dropping subscriber"
                    );
                    stale.push(subscriber.id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!(
                        subscriber = %subscriber.id,
                        "subscriber queue closed"
                    );
                    stale.push(subscriber.id);
                }
            }
        }

        for id in stale {
            self.unregister(id).await;
        }

        delivered
    }

    /// Drop every subscriber (shutdown)
    ///
    /// Closing the queues lets each connection task drain in-flight
    /// payloads and send its close frame.
    pub async fn clear(&self) {
        let drained: Vec<SubscriberId> = self.subscribers.write().await.drain().map(|(id, _)| id).collect();
        for _ in &drained {
            self.stats.subscriber_left();
        }
        if !drained.is_empty() {
            tracing::info!(count = drained.len(), "disconnecting all subscribers");
        }
    }
}
