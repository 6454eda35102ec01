//! Normalized relay event

use std::net::SocketAddr;

use serde::Serialize;
use tokio_tungstenite::tungstenite::Utf8Bytes;

use crate::osc::{OscMessage, OscValue};

/// One decoded control message, normalized for delivery
///
/// Immutable once constructed. Serializes to the subscriber wire record:
///
/// ```json
/// { "address": "/watch/accel/x", "args": [0.523], "source": "10.0.0.5", "timestamp": 1754000000000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayEvent {
    /// OSC address path, always beginning with `/`
    pub address: String,
    /// Arguments in decode order
    pub args: Vec<OscValue>,
    /// Sender IP address
    pub source: String,
    /// Arrival time, unix millis
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
}

impl RelayEvent {
    /// Build an event from a decoded message and its datagram metadata
    pub fn from_message(msg: OscMessage, source: SocketAddr, timestamp_ms: i64) -> Self {
        Self {
            address: msg.address,
            args: msg.args,
            source: source.ip().to_string(),
            timestamp_ms,
        }
    }

    /// Serialize to the outbound payload
    ///
    /// Called once per event; the returned bytes clone by reference count
    /// during fan-out.
    pub fn to_payload(&self) -> Result<Utf8Bytes, serde_json::Error> {
        serde_json::to_string(self).map(Utf8Bytes::from)
    }
}
