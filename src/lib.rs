//! OSC-to-WebSocket bridge
//!
//! Receives OSC control messages (phone motion sensors, control surfaces)
//! over UDP and relays each one as a JSON record to every connected
//! WebSocket subscriber.
//!
//! ```text
//! UDP datagram ──► decode ──► RelayEvent ──► serialize once ──► fan-out
//!                                                        │
//!                                     SubscriberRegistry ┴─► per-subscriber
//!                                     (WebSocket accepts)     queue ──► TCP
//! ```
//!
//! Ingestion never blocks on a subscriber: fan-out pushes into bounded
//! per-subscriber queues, and a consumer that cannot keep up is dropped
//! from the registry instead of slowing the rest.
//!
//! # Example
//!
//! ```no_run
//! use osc_bridge::{BridgeConfig, OscBridge};
//!
//! #[tokio::main]
//! async fn main() -> osc_bridge::Result<()> {
//!     let bridge = OscBridge::bind(BridgeConfig::default()).await?;
//!     bridge.run_until(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```

pub mod error;
pub mod osc;
pub mod registry;
pub mod relay;
pub mod server;
pub mod stats;

pub use error::{BridgeError, Result};
pub use osc::{OscError, OscMessage, OscValue};
pub use registry::{Subscriber, SubscriberId, SubscriberRegistry};
pub use relay::{OscListener, RelayEvent};
pub use server::{local_interfaces, BridgeConfig, OscBridge, WsServer};
pub use stats::{RelayStats, StatsSnapshot};
