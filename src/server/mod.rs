//! Bridge server
//!
//! Ties the two endpoints together: the UDP OSC listener feeding the
//! broadcast fan-out, and the WebSocket server feeding the subscriber
//! registry. Both bind up front, so a taken port fails startup instead of
//! surfacing mid-run.

pub mod config;
pub mod ws;

use std::net::IpAddr;
use std::sync::Arc;

use crate::error::Result;
use crate::registry::SubscriberRegistry;
use crate::relay::OscListener;
use crate::stats::{spawn_status_task, RelayStats};

pub use config::BridgeConfig;
pub use ws::WsServer;

/// The OSC-to-WebSocket relay
pub struct OscBridge {
    listener: OscListener,
    ws: WsServer,
    registry: Arc<SubscriberRegistry>,
    stats: Arc<RelayStats>,
    config: BridgeConfig,
}

impl OscBridge {
    /// Open both endpoints
    ///
    /// Either bind failing is fatal; nothing is spawned yet.
    pub async fn bind(config: BridgeConfig) -> Result<Self> {
        let stats = Arc::new(RelayStats::new());
        let registry = Arc::new(SubscriberRegistry::new(Arc::clone(&stats)));

        let listener = OscListener::bind(
            config.osc_addr,
            Arc::clone(&registry),
            Arc::clone(&stats),
        )
        .await?;
        let ws = WsServer::bind(config.ws_addr, Arc::clone(&registry), config.clone()).await?;

        Ok(Self {
            listener,
            ws,
            registry,
            stats,
            config,
        })
    }

    /// Shared relay counters
    pub fn stats(&self) -> &Arc<RelayStats> {
        &self.stats
    }

    /// The subscriber registry
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Bound OSC datagram address
    pub fn osc_addr(&self) -> Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Bound WebSocket address
    pub fn ws_addr(&self) -> Result<std::net::SocketAddr> {
        self.ws.local_addr()
    }

    /// Run the bridge until one of the endpoints fails
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the bridge with graceful shutdown
    ///
    /// When `shutdown` resolves, both accept loops stop, every subscriber
    /// queue is closed so connection tasks can drain and send their close
    /// frames, and after a bounded grace period the call returns.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let status = spawn_status_task(
            Arc::clone(&self.stats),
            self.config.status_interval,
            self.config.activity_window,
        );

        let result = tokio::select! {
            _ = shutdown => {
                tracing::info!("shutdown signal received");
                Ok(())
            }
            result = self.listener.run() => result,
            result = self.ws.run() => result,
        };

        status.abort();
        self.registry.clear().await;
        tokio::time::sleep(self.config.shutdown_grace).await;

        result
    }
}

/// Non-loopback IPv4 addresses of this host, for operator display
///
/// Enumeration failure is non-fatal and yields an empty list.
pub fn local_interfaces() -> Vec<IpAddr> {
    match local_ip_address::list_afinet_netifas() {
        Ok(interfaces) => interfaces
            .into_iter()
            .map(|(_, ip)| ip)
            .filter(|ip| matches!(ip, IpAddr::V4(v4) if !v4.is_loopback()))
            .collect(),
        Err(e) => {
            tracing::debug!(error = %e, "failed to enumerate network interfaces");
            Vec::new()
        }
    }
}
