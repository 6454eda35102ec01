//! OSC wire codec
//!
//! Open Sound Control 1.0 messages as used for real-time control data:
//! a 32-bit-aligned address string, a `,`-prefixed type tag string, and
//! tagged argument values, all big-endian.
//!
//! Packet layout:
//! ```text
//! +---------------------+--------------------+----------------+
//! | Address (padded)    | Type tags (padded) | Argument data  |
//! | "/watch/accel/x\0"  | ",f\0\0"           | f32 BE         |
//! +---------------------+--------------------+----------------+
//! ```
//!
//! `#bundle` packets wrap a time tag and a sequence of size-prefixed
//! elements; the decoder unpacks them recursively. Messages whose payload
//! lacks a type tag string are accepted as bare big-endian float32 words.

pub mod decoder;
pub mod error;
pub mod value;

pub use decoder::{decode_message, decode_packet, encode_bundle, encode_message};
pub use error::OscError;
pub use value::{OscMessage, OscValue};
