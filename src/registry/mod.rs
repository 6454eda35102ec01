//! Subscriber registry and broadcast fan-out
//!
//! The registry owns the live set of WebSocket subscribers and routes each
//! relayed event to all of them.
//!
//! # Architecture
//!
//! ```text
//!                  Arc<SubscriberRegistry>
//!              ┌────────────────────────────┐
//!              │ subscribers: HashMap<Id,   │
//!              │   Subscriber {             │
//!              │     tx: mpsc::Sender,      │
//!              │   }                        │
//!              │ >                          │
//!              └─────────────┬──────────────┘
//!                            │
//!            ┌───────────────┼───────────────┐
//!            ▼               ▼               ▼
//!       [Listener]      [Subscriber]    [Subscriber]
//!       broadcast()     rx.recv()       rx.recv()
//!            │               │               │
//!            └──► try_send ──► ws.send() ──► TCP
//! ```
//!
//! Each subscriber has its own bounded queue; the fan-out pushes with
//! `try_send`, so a stalled consumer is unregistered instead of blocking
//! delivery to the rest. The serialized payload is a `Utf8Bytes`, so all
//! queues share one reference-counted allocation.

pub mod entry;
pub mod store;

pub use entry::{Subscriber, SubscriberId};
pub use store::SubscriberRegistry;
