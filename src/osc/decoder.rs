//! OSC packet decoder and encoder
//!
//! Decoding is pure and stateless: every function takes the packet bytes and
//! returns values or an [`OscError`], with no shared state between calls.
//!
//! Two argument encodings are accepted:
//! - tagged (primary): a `,`-prefixed type tag string describes each value
//! - bare (fallback): no tag string, remaining 32-bit words are read as
//!   big-endian float32
//!
//! Supported type tags:
//! ```text
//! i - int32
//! f - float32 (widened to f64)
//! d - float64
//! s - string (UTF-8, NUL-terminated, 32-bit aligned)
//! T - true (no payload)
//! F - false (no payload)
//! ```
//!
//! Anything else fails the decode for that datagram only.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::error::OscError;
use super::value::{OscMessage, OscValue};

/// Maximum bundle recursion (prevent stack overflow on crafted packets)
const MAX_BUNDLE_DEPTH: usize = 16;

/// Bundle packets start with this padded marker string
const BUNDLE_HEADER: &[u8] = b"#bundle\0";

/// Immediate-execution OSC time tag
const TIMETAG_IMMEDIATE: u64 = 1;

/// Decode one OSC packet, unpacking `#bundle` wrappers recursively
///
/// Returns the contained messages in wire order. Time tags are ignored;
/// the relay delivers everything immediately.
pub fn decode_packet(buf: Bytes) -> Result<Vec<OscMessage>, OscError> {
    let mut messages = Vec::new();
    decode_packet_into(buf, 0, &mut messages)?;
    Ok(messages)
}

/// Decode a single (non-bundle) OSC message
pub fn decode_message(mut buf: Bytes) -> Result<OscMessage, OscError> {
    let address = read_padded_str(&mut buf)?;
    if !address.starts_with('/') {
        return Err(OscError::InvalidAddress);
    }

    if buf.is_empty() {
        return Ok(OscMessage::new(address, Vec::new()));
    }

    if buf[0] != b',' {
        return decode_bare(address, buf);
    }

    let tags = read_padded_str(&mut buf)?;
    let mut args = Vec::with_capacity(tags.len().saturating_sub(1));
    for tag in tags.bytes().skip(1) {
        args.push(decode_arg(tag, &mut buf)?);
    }

    if buf.has_remaining() {
        return Err(OscError::TrailingBytes);
    }

    Ok(OscMessage::new(address, args))
}

fn decode_packet_into(
    mut buf: Bytes,
    depth: usize,
    out: &mut Vec<OscMessage>,
) -> Result<(), OscError> {
    if depth > MAX_BUNDLE_DEPTH {
        return Err(OscError::NestingTooDeep);
    }

    if buf.len() < BUNDLE_HEADER.len() || &buf[..BUNDLE_HEADER.len()] != BUNDLE_HEADER {
        out.push(decode_message(buf)?);
        return Ok(());
    }

    buf.advance(BUNDLE_HEADER.len());

    // Time tag: 64-bit NTP timestamp, not used by the relay
    if buf.remaining() < 8 {
        return Err(OscError::UnexpectedEof);
    }
    buf.advance(8);

    while buf.has_remaining() {
        if buf.remaining() < 4 {
            return Err(OscError::UnexpectedEof);
        }
        let size = buf.get_u32() as usize;
        if size > buf.remaining() {
            return Err(OscError::UnexpectedEof);
        }
        let element = buf.split_to(size);
        decode_packet_into(element, depth + 1, out)?;
    }

    Ok(())
}

fn decode_arg(tag: u8, buf: &mut Bytes) -> Result<OscValue, OscError> {
    match tag {
        b'i' => {
            if buf.remaining() < 4 {
                return Err(OscError::UnexpectedEof);
            }
            Ok(OscValue::Int(buf.get_i32()))
        }
        b'f' => {
            if buf.remaining() < 4 {
                return Err(OscError::UnexpectedEof);
            }
            Ok(OscValue::Float(buf.get_f32() as f64))
        }
        b'd' => {
            if buf.remaining() < 8 {
                return Err(OscError::UnexpectedEof);
            }
            Ok(OscValue::Float(buf.get_f64()))
        }
        b's' => Ok(OscValue::Str(read_padded_str(buf)?)),
        b'T' => Ok(OscValue::Bool(true)),
        b'F' => Ok(OscValue::Bool(false)),
        other => Err(OscError::UnsupportedTag(other)),
    }
}

/// Fallback for messages lacking a type tag string: remaining 32-bit words
/// are bare big-endian float32 values.
fn decode_bare(address: String, mut buf: Bytes) -> Result<OscMessage, OscError> {
    if buf.len() % 4 != 0 {
        return Err(OscError::TrailingBytes);
    }
    let mut args = Vec::with_capacity(buf.len() / 4);
    while buf.has_remaining() {
        args.push(OscValue::Float(buf.get_f32() as f64));
    }
    Ok(OscMessage::new(address, args))
}

/// Read a NUL-terminated string padded to a 32-bit boundary
fn read_padded_str(buf: &mut Bytes) -> Result<String, OscError> {
    if buf.is_empty() {
        return Err(OscError::UnexpectedEof);
    }
    let nul = buf.iter().position(|&b| b == 0).ok_or(OscError::BadString)?;
    let padded = (nul / 4 + 1) * 4;
    if padded > buf.len() {
        return Err(OscError::UnexpectedEof);
    }
    let raw = buf.split_to(padded);
    let s = std::str::from_utf8(&raw[..nul]).map_err(|_| OscError::BadString)?;
    Ok(s.to_string())
}

/// Encode a message in the tagged wire form
///
/// Floats are written as float32, the form control-surface receivers expect.
pub fn encode_message(msg: &OscMessage) -> Bytes {
    let mut buf = BytesMut::new();
    put_padded_str(&mut buf, &msg.address);

    let mut tags = String::with_capacity(msg.args.len() + 1);
    tags.push(',');
    for arg in &msg.args {
        tags.push(match arg {
            OscValue::Int(_) => 'i',
            OscValue::Float(_) => 'f',
            OscValue::Str(_) => 's',
            OscValue::Bool(true) => 'T',
            OscValue::Bool(false) => 'F',
        });
    }
    put_padded_str(&mut buf, &tags);

    for arg in &msg.args {
        match arg {
            OscValue::Int(v) => buf.put_i32(*v),
            OscValue::Float(v) => buf.put_f32(*v as f32),
            OscValue::Str(s) => put_padded_str(&mut buf, s),
            OscValue::Bool(_) => {}
        }
    }

    buf.freeze()
}

/// Encode messages as an immediate-delivery `#bundle`
pub fn encode_bundle(messages: &[OscMessage]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_slice(BUNDLE_HEADER);
    buf.put_u64(TIMETAG_IMMEDIATE);
    for msg in messages {
        let encoded = encode_message(msg);
        buf.put_u32(encoded.len() as u32);
        buf.put_slice(&encoded);
    }
    buf.freeze()
}

/// Write a string with NUL terminator, padded to a 32-bit boundary
fn put_padded_str(buf: &mut BytesMut, s: &str) {
    buf.put_slice(s.as_bytes());
    let pad = 4 - (s.len() % 4);
    buf.put_bytes(0, pad);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(parts: &[&[u8]]) -> Bytes {
        Bytes::from(parts.concat())
    }

    #[test]
    fn test_decode_tagged_float() {
        // Pin the wire format byte for byte, not just via the encoder
        let buf = raw(&[b"/ax\0", b",f\0\0", &0.5f32.to_be_bytes()]);
        let msg = decode_message(buf).unwrap();
        assert_eq!(msg.address, "/ax");
        assert_eq!(msg.args, vec![OscValue::Float(0.5)]);
    }

    #[test]
    fn test_decode_accelerometer_message() {
        let buf = raw(&[
            b"/watch/accel/x\0\0",
            b",f\0\0",
            &0.523f32.to_be_bytes(),
        ]);
        let msg = decode_message(buf).unwrap();
        assert_eq!(msg.address, "/watch/accel/x");
        let v = msg.args[0].as_float().unwrap();
        assert!((v - 0.523f32 as f64).abs() < f32::EPSILON as f64);
    }

    #[test]
    fn test_int_and_bool_stay_distinct() {
        let buf = raw(&[b"/btn\0\0\0\0", b",iTF\0\0\0\0", &5i32.to_be_bytes()]);
        let msg = decode_message(buf).unwrap();
        assert_eq!(
            msg.args,
            vec![
                OscValue::Int(5),
                OscValue::Bool(true),
                OscValue::Bool(false),
            ]
        );
    }

    #[test]
    fn test_decode_string_arg() {
        let buf = raw(&[b"/label\0\0", b",s\0\0", b"hello\0\0\0"]);
        let msg = decode_message(buf).unwrap();
        assert_eq!(msg.args, vec![OscValue::Str("hello".into())]);
    }

    #[test]
    fn test_decode_double_tag() {
        let buf = raw(&[b"/d\0\0", b",d\0\0", &0.523f64.to_be_bytes()]);
        let msg = decode_message(buf).unwrap();
        assert_eq!(msg.args, vec![OscValue::Float(0.523)]);
    }

    #[test]
    fn test_args_preserve_order() {
        let buf = raw(&[
            b"/multi\0\0",
            b",ifs\0\0\0\0",
            &1i32.to_be_bytes(),
            &2.0f32.to_be_bytes(),
            b"x\0\0\0",
        ]);
        let msg = decode_message(buf).unwrap();
        assert_eq!(
            msg.args,
            vec![
                OscValue::Int(1),
                OscValue::Float(2.0),
                OscValue::Str("x".into()),
            ]
        );
    }

    #[test]
    fn test_no_args() {
        let msg = decode_message(raw(&[b"/ping\0\0\0"])).unwrap();
        assert_eq!(msg.address, "/ping");
        assert!(msg.args.is_empty());
    }

    #[test]
    fn test_bare_fallback() {
        // No type tag string: payload words are bare float32
        let buf = raw(&[b"/a\0\0", &0.25f32.to_be_bytes(), &1.5f32.to_be_bytes()]);
        let msg = decode_message(buf).unwrap();
        assert_eq!(
            msg.args,
            vec![OscValue::Float(0.25), OscValue::Float(1.5)]
        );
    }

    #[test]
    fn test_bare_fallback_unaligned_fails() {
        let buf = raw(&[b"/a\0\0", &[0x3f, 0x00, 0x00]]);
        assert_eq!(decode_message(buf), Err(OscError::TrailingBytes));
    }

    #[test]
    fn test_address_must_start_with_slash() {
        let buf = raw(&[b"nope\0\0\0\0", b",f\0\0", &0.5f32.to_be_bytes()]);
        assert_eq!(decode_message(buf), Err(OscError::InvalidAddress));
    }

    #[test]
    fn test_unsupported_tag_fails() {
        let buf = raw(&[b"/b\0\0", b",b\0\0", &4u32.to_be_bytes(), &[1, 2, 3, 4]]);
        assert_eq!(decode_message(buf), Err(OscError::UnsupportedTag(b'b')));
    }

    #[test]
    fn test_truncated_arg_fails() {
        let buf = raw(&[b"/f\0\0", b",f\0\0", &[0x3f, 0x00]]);
        assert_eq!(decode_message(buf), Err(OscError::UnexpectedEof));
    }

    #[test]
    fn test_unterminated_address_fails() {
        assert_eq!(
            decode_message(Bytes::from_static(b"/abc")),
            Err(OscError::BadString)
        );
    }

    #[test]
    fn test_empty_packet_fails() {
        assert_eq!(decode_message(Bytes::new()), Err(OscError::UnexpectedEof));
    }

    #[test]
    fn test_trailing_bytes_fail() {
        let buf = raw(&[b"/t\0\0", b",i\0\0", &1i32.to_be_bytes(), &[0, 0, 0, 9]]);
        assert_eq!(decode_message(buf), Err(OscError::TrailingBytes));
    }

    #[test]
    fn test_encode_decode_tagged() {
        let msg = OscMessage::new(
            "/synth/note",
            vec![
                OscValue::Int(60),
                OscValue::Float(0.5f32 as f64),
                OscValue::Bool(true),
                OscValue::Str("pad".into()),
            ],
        );
        let decoded = decode_message(encode_message(&msg)).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_packet_single_message() {
        let msg = OscMessage::new("/a", vec![OscValue::Int(1)]);
        let out = decode_packet(encode_message(&msg)).unwrap();
        assert_eq!(out, vec![msg]);
    }

    #[test]
    fn test_bundle_unpacks_in_order() {
        let a = OscMessage::new("/a", vec![OscValue::Int(1)]);
        let b = OscMessage::new("/b", vec![OscValue::Int(2)]);
        let out = decode_packet(encode_bundle(&[a.clone(), b.clone()])).unwrap();
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn test_nested_bundle() {
        let inner = encode_bundle(&[OscMessage::new("/in", vec![])]);
        let mut buf = BytesMut::new();
        buf.put_slice(BUNDLE_HEADER);
        buf.put_u64(TIMETAG_IMMEDIATE);
        buf.put_u32(inner.len() as u32);
        buf.put_slice(&inner);
        let out = decode_packet(buf.freeze()).unwrap();
        assert_eq!(out, vec![OscMessage::new("/in", vec![])]);
    }

    #[test]
    fn test_bundle_depth_limit() {
        let mut packet = encode_message(&OscMessage::new("/deep", vec![]));
        for _ in 0..(MAX_BUNDLE_DEPTH + 1) {
            let mut buf = BytesMut::new();
            buf.put_slice(BUNDLE_HEADER);
            buf.put_u64(TIMETAG_IMMEDIATE);
            buf.put_u32(packet.len() as u32);
            buf.put_slice(&packet);
            packet = buf.freeze();
        }
        assert_eq!(decode_packet(packet), Err(OscError::NestingTooDeep));
    }

    #[test]
    fn test_bundle_truncated_element_fails() {
        let mut buf = BytesMut::new();
        buf.put_slice(BUNDLE_HEADER);
        buf.put_u64(TIMETAG_IMMEDIATE);
        buf.put_u32(64); // claims more than is present
        buf.put_slice(b"/a\0\0");
        assert_eq!(decode_packet(buf.freeze()), Err(OscError::UnexpectedEof));
    }
}
