//! OSC datagram listener
//!
//! Binds the UDP endpoint and runs the decode-and-forward loop. Binding
//! failure is fatal at startup; failure to process one datagram never is.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::net::UdpSocket;

use crate::error::{BridgeError, Result};
use crate::osc;
use crate::registry::SubscriberRegistry;
use crate::relay::event::RelayEvent;
use crate::stats::{unix_millis, RelayStats};

/// Largest datagram the listener will accept
const MAX_DATAGRAM_SIZE: usize = 64 * 1024;

/// How often to trace relayed message contents (every Nth message)
const TRACE_EVERY: u64 = 10;

/// UDP listener for inbound OSC control messages
pub struct OscListener {
    socket: UdpSocket,
    registry: Arc<SubscriberRegistry>,
    stats: Arc<RelayStats>,
}

impl OscListener {
    /// Bind the datagram endpoint
    ///
    /// A port that is in use or not permitted fails here, which aborts
    /// startup.
    pub async fn bind(
        addr: SocketAddr,
        registry: Arc<SubscriberRegistry>,
        stats: Arc<RelayStats>,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await.map_err(BridgeError::Bind)?;
        tracing::info!(addr = %socket.local_addr()?, "OSC listener bound");

        Ok(Self {
            socket,
            registry,
            stats,
        })
    }

    /// The bound local address (useful when binding port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Run the receive loop
    ///
    /// Each datagram is decoded and fanned out within this task; the loop
    /// never waits on a subscriber.
    pub async fn run(&self) -> Result<()> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

        loop {
            let (len, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    tracing::error!(error = %e, "UDP receive failed");
                    continue;
                }
            };

            let data = Bytes::copy_from_slice(&buf[..len]);
            self.handle_datagram(data, peer).await;
        }
    }

    async fn handle_datagram(&self, data: Bytes, peer: SocketAddr) {
        let messages = match osc::decode_packet(data) {
            Ok(messages) => messages,
            Err(e) => {
                self.stats.record_decode_error();
                tracing::debug!(peer = %peer, error = %e, "dropping undecodable datagram");
                return;
            }
        };

        for msg in messages {
            let count = self.stats.record_message();
            if count % TRACE_EVERY == 0 {
                tracing::debug!(
                    address = %msg.address,
                    args = msg.args.len(),
                    count = count,
                    "relaying"
                );
            }

            let event = RelayEvent::from_message(msg, peer, unix_millis());
            let payload = match event.to_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::error!(error = %e, "event serialization failed");
                    continue;
                }
            };

            self.registry.broadcast(payload).await;
        }
    }
}
