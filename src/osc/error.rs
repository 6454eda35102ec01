//! OSC decode error types

/// Error type for OSC packet decoding
///
/// All variants are per-datagram: a failed decode drops that datagram and
/// nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OscError {
    /// Buffer ended before the value it should contain
    UnexpectedEof,
    /// Address pattern does not begin with `/`
    InvalidAddress,
    /// Unterminated or non-UTF-8 string
    BadString,
    /// Type tag not supported by this decoder
    UnsupportedTag(u8),
    /// Data left over after the last declared argument
    TrailingBytes,
    /// Bundle recursion exceeded the depth limit
    NestingTooDeep,
}

impl std::fmt::Display for OscError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OscError::UnexpectedEof => write!(f, "unexpected end of packet"),
            OscError::InvalidAddress => write!(f, "address must begin with '/'"),
            OscError::BadString => write!(f, "malformed string"),
            OscError::UnsupportedTag(tag) => {
                write!(f, "unsupported type tag: {:?}", *tag as char)
            }
            OscError::TrailingBytes => write!(f, "trailing bytes after arguments"),
            OscError::NestingTooDeep => write!(f, "bundle nesting too deep"),
        }
    }
}

impl std::error::Error for OscError {}
