//! OSC value and message types

use serde::Serialize;

/// A single OSC argument
///
/// Numeric arguments are normalized to `f64`; int32 and boolean stay
/// distinct kinds so a consumer can tell a button trigger from a
/// continuous sensor reading. Serializes untagged, so a JSON argument
/// list reads `[0.523, 1, "on", true]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OscValue {
    /// IEEE 754 double (OSC tags `f` and `d`)
    Float(f64),
    /// 32-bit signed integer (OSC tag `i`)
    Int(i32),
    /// UTF-8 string (OSC tag `s`)
    Str(String),
    /// Boolean (OSC tags `T` / `F`)
    Bool(bool),
}

impl OscValue {
    /// Try to get this value as a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            OscValue::Float(v) => Some(*v),
            OscValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get this value as an integer
    pub fn as_int(&self) -> Option<i32> {
        match self {
            OscValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get this value as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OscValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// A decoded OSC message: address pattern plus arguments in wire order
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    /// Address pattern, always beginning with `/`
    pub address: String,
    /// Arguments in decode order
    pub args: Vec<OscValue>,
}

impl OscMessage {
    /// Create a new message
    pub fn new(address: impl Into<String>, args: Vec<OscValue>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }
}
