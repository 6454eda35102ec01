//! WebSocket subscriber endpoint
//!
//! Accepts stream connections, registers each as a subscriber, and runs one
//! task per connection that drains the subscriber's outbound queue into the
//! socket while watching the read half for close and ping frames. Every
//! exit path unregisters the subscriber; unregistration is idempotent, so
//! racing with a fan-out removal is harmless.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Message, Utf8Bytes};
use tokio_tungstenite::{accept_async, WebSocketStream};

use crate::error::{BridgeError, Result};
use crate::registry::SubscriberRegistry;
use crate::server::config::BridgeConfig;

/// WebSocket server for stream subscribers
pub struct WsServer {
    listener: TcpListener,
    registry: Arc<SubscriberRegistry>,
    config: BridgeConfig,
}

impl WsServer {
    /// Bind the subscriber endpoint
    pub async fn bind(
        addr: SocketAddr,
        registry: Arc<SubscriberRegistry>,
        config: BridgeConfig,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(BridgeError::Bind)?;
        tracing::info!(addr = %listener.local_addr()?, "WebSocket server bound");

        Ok(Self {
            listener,
            registry,
            config,
        })
    }

    /// The bound local address (useful when binding port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the accept loop
    pub async fn run(&self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => self.handle_connection(stream, peer).await,
                Err(e) => {
                    tracing::error!(error = %e, "failed to accept subscriber connection");
                }
            }
        }
    }

    async fn handle_connection(&self, stream: TcpStream, peer: SocketAddr) {
        if self.config.max_subscribers > 0
            && self.registry.count().await >= self.config.max_subscribers
        {
            tracing::warn!(peer = %peer, "subscriber rejected: limit reached");
            return;
        }

        let registry = Arc::clone(&self.registry);
        let queue_depth = self.config.subscriber_queue;

        tokio::spawn(async move {
            let ws = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    tracing::debug!(peer = %peer, error = %e, "WebSocket handshake failed");
                    return;
                }
            };

            let (tx, rx) = mpsc::channel(queue_depth);
            let id = registry.register(peer, tx).await;

            if let Err(e) = subscriber_loop(ws, rx).await {
                tracing::debug!(subscriber = %id, error = %e, "subscriber connection error");
            }

            registry.unregister(id).await;
        });
    }
}

/// Drive one subscriber connection until it closes or fails
async fn subscriber_loop(
    ws: WebSocketStream<TcpStream>,
    mut rx: mpsc::Receiver<Utf8Bytes>,
) -> std::result::Result<(), tokio_tungstenite::tungstenite::Error> {
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            payload = rx.recv() => match payload {
                Some(payload) => sink.send(Message::Text(payload)).await?,
                // Registry dropped us (shutdown): close politely
                None => {
                    let _ = sink.send(Message::Close(None)).await;
                    return Ok(());
                }
            },
            msg = stream.next() => match msg {
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Ok(Message::Ping(data))) => sink.send(Message::Pong(data)).await?,
                // Subscribers are receive-only; inbound frames carry nothing we act on
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
            },
        }
    }
}
