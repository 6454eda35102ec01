//! Bridge configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Default UDP port for inbound OSC
pub const DEFAULT_OSC_PORT: u16 = 8000;

/// Default TCP port for WebSocket subscribers
pub const DEFAULT_STREAM_PORT: u16 = 8080;

/// Bridge configuration options
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Address for the OSC datagram listener
    pub osc_addr: SocketAddr,

    /// Address for the WebSocket subscriber endpoint
    pub ws_addr: SocketAddr,

    /// How recent the last message must be to report ACTIVE
    pub activity_window: Duration,

    /// Interval between status lines
    pub status_interval: Duration,

    /// Per-subscriber outbound queue depth; a subscriber that falls this
    /// far behind is dropped
    pub subscriber_queue: usize,

    /// Maximum concurrent subscribers (0 = unlimited)
    pub max_subscribers: usize,

    /// How long shutdown waits for in-flight deliveries to drain
    pub shutdown_grace: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            osc_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_OSC_PORT)),
            ws_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_STREAM_PORT)),
            activity_window: Duration::from_millis(5000),
            status_interval: Duration::from_secs(5),
            subscriber_queue: 256,
            max_subscribers: 0, // Unlimited
            shutdown_grace: Duration::from_millis(250),
        }
    }
}

impl BridgeConfig {
    /// Build a config from the environment
    ///
    /// `OSC_PORT` and `STREAM_PORT` override the listening ports; anything
    /// unset or unparsable keeps the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = port_from_env("OSC_PORT") {
            config.osc_addr.set_port(port);
        }
        if let Some(port) = port_from_env("STREAM_PORT") {
            config.ws_addr.set_port(port);
        }
        config
    }

    /// Set the OSC listener address
    pub fn osc_addr(mut self, addr: SocketAddr) -> Self {
        self.osc_addr = addr;
        self
    }

    /// Set the WebSocket endpoint address
    pub fn ws_addr(mut self, addr: SocketAddr) -> Self {
        self.ws_addr = addr;
        self
    }

    /// Set the activity window
    pub fn activity_window(mut self, window: Duration) -> Self {
        self.activity_window = window;
        self
    }

    /// Set the status line interval
    pub fn status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }

    /// Set the per-subscriber queue depth
    pub fn subscriber_queue(mut self, depth: usize) -> Self {
        self.subscriber_queue = depth.max(1);
        self
    }

    /// Set the subscriber limit (0 = unlimited)
    pub fn max_subscribers(mut self, max: usize) -> Self {
        self.max_subscribers = max;
        self
    }
}

fn port_from_env(var: &str) -> Option<u16> {
    std::env::var(var).ok().and_then(|p| p.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();

        assert_eq!(config.osc_addr.port(), DEFAULT_OSC_PORT);
        assert_eq!(config.ws_addr.port(), DEFAULT_STREAM_PORT);
        assert_eq!(config.activity_window, Duration::from_millis(5000));
        assert_eq!(config.status_interval, Duration::from_secs(5));
        assert_eq!(config.subscriber_queue, 256);
        assert_eq!(config.max_subscribers, 0);
    }

    #[test]
    fn test_builder_chaining() {
        let osc: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let ws: SocketAddr = "127.0.0.1:9090".parse().unwrap();
        let config = BridgeConfig::default()
            .osc_addr(osc)
            .ws_addr(ws)
            .activity_window(Duration::from_secs(1))
            .subscriber_queue(8)
            .max_subscribers(32);

        assert_eq!(config.osc_addr, osc);
        assert_eq!(config.ws_addr, ws);
        assert_eq!(config.activity_window, Duration::from_secs(1));
        assert_eq!(config.subscriber_queue, 8);
        assert_eq!(config.max_subscribers, 32);
    }

    #[test]
    fn test_queue_depth_floor() {
        let config = BridgeConfig::default().subscriber_queue(0);
        assert_eq!(config.subscriber_queue, 1);
    }

    // One test owns the env vars; parallel tests sharing them would race.
    #[test]
    fn test_from_env() {
        std::env::set_var("OSC_PORT", "9001");
        std::env::set_var("STREAM_PORT", "9002");
        let overridden = BridgeConfig::from_env();

        std::env::set_var("OSC_PORT", "not-a-port");
        std::env::remove_var("STREAM_PORT");
        let garbage = BridgeConfig::from_env();

        std::env::remove_var("OSC_PORT");
        let unset = BridgeConfig::from_env();

        assert_eq!(overridden.osc_addr.port(), 9001);
        assert_eq!(overridden.ws_addr.port(), 9002);
        assert_eq!(garbage.osc_addr.port(), DEFAULT_OSC_PORT);
        assert_eq!(garbage.ws_addr.port(), DEFAULT_STREAM_PORT);
        assert_eq!(unset.osc_addr.port(), DEFAULT_OSC_PORT);
    }
}
