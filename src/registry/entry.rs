//! Subscriber handle types

use std::net::SocketAddr;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Utf8Bytes;

/// Unique identifier for a connected subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to one connected stream consumer
///
/// Created on connection accept, owned by the registry, destroyed on
/// disconnect or unrecoverable write failure. The handle clones cheaply
/// (the sender is reference-counted), which is what makes `snapshot()` a
/// safe point-in-time copy.
#[derive(Debug, Clone)]
pub struct Subscriber {
    /// Registry-assigned id
    pub id: SubscriberId,
    /// Remote peer address
    pub peer_addr: SocketAddr,
    /// When the subscriber connected
    pub connected_at: Instant,
    /// Bounded outbound queue, drained by the connection task
    pub(crate) tx: mpsc::Sender<Utf8Bytes>,
}

impl Subscriber {
    pub(crate) fn new(id: SubscriberId, peer_addr: SocketAddr, tx: mpsc::Sender<Utf8Bytes>) -> Self {
        Self {
            id,
            peer_addr,
            connected_at: Instant::now(),
            tx,
        }
    }

    /// Push a payload without blocking
    pub(crate) fn try_push(
        &self,
        payload: Utf8Bytes,
    ) -> Result<(), mpsc::error::TrySendError<Utf8Bytes>> {
        self.tx.try_send(payload)
    }
}
