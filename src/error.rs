//! Bridge error types
//!
//! Only `Bind` is fatal, and only at startup. Everything else is handled at
//! the point of occurrence: a datagram that fails to decode is dropped, a
//! subscriber that fails a write is removed from the registry.

use crate::osc::OscError;

/// Error type for bridge operations
#[derive(Debug)]
pub enum BridgeError {
    /// Failed to open a listening endpoint (port in use, permission denied)
    Bind(std::io::Error),
    /// I/O error on an already-open socket
    Io(std::io::Error),
    /// WebSocket protocol error
    WebSocket(tokio_tungstenite::tungstenite::Error),
    /// Malformed OSC datagram
    Osc(OscError),
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::Bind(e) => write!(f, "failed to bind endpoint: {}", e),
            BridgeError::Io(e) => write!(f, "I/O error: {}", e),
            BridgeError::WebSocket(e) => write!(f, "WebSocket error: {}", e),
            BridgeError::Osc(e) => write!(f, "OSC decode error: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Bind(e) | BridgeError::Io(e) => Some(e),
            BridgeError::WebSocket(e) => Some(e),
            BridgeError::Osc(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        BridgeError::Io(e)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for BridgeError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        BridgeError::WebSocket(e)
    }
}

impl From<OscError> for BridgeError {
    fn from(e: OscError) -> Self {
        BridgeError::Osc(e)
    }
}

/// Result alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
