//! Ink stream codec.
//!
//! Ink is stored as base64 text wrapping a tag/length/value binary stream (an
//! ISF-like layout): a format header, a drawing attribute table and one tag per
//! stroke with delta-encoded packet data. The codec is pure and knows nothing
//! about the page tree.
//!
//! Decoding keeps enough of the original layout (opaque tags, attribute index
//! tags, each stroke's packet bytes) that a collection which was not mutated
//! re-encodes to exactly the bytes it came from.

mod attributes;
mod packets;
mod stream;
mod stroke;
mod varint;

pub mod tags;

pub use attributes::{AttributeProperty, DrawingAttributes, PropertyValue, DEFAULT_PEN_SIZE};
pub use packets::Transform;
pub use stroke::{Point, Stroke, StrokeCollection};

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Errors produced while decoding an ink payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Invalid base64 payload: {0}")]
    Base64(String),
    #[error("Unexpected end of ink stream at byte {0}")]
    UnexpectedEnd(usize),
    #[error("Unsupported ink stream format {0}")]
    UnsupportedFormat(u64),
    #[error("Ink stream declares {declared} bytes but carries {actual}")]
    SizeMismatch { declared: usize, actual: usize },
    #[error("Unknown tag {tag} at byte {offset}")]
    UnknownTag { tag: u64, offset: usize },
    #[error("Non-canonical integer at byte {0}")]
    NonCanonical(usize),
    #[error("Integer overflow at byte {0}")]
    Overflow(usize),
    #[error("Trailing bytes in {what} at byte {offset}")]
    TrailingBytes { what: &'static str, offset: usize },
    #[error("Misplaced drawing attribute table at byte {0}")]
    MisplacedAttributeTable(usize),
    #[error("Drawing attribute index {index} out of range ({count} blocks)")]
    AttributeIndex { index: usize, count: usize },
    #[error("Invalid packet data: {0}")]
    InvalidPackets(String),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Decode base64 payload text into a stroke collection.
///
/// Empty or whitespace-only text is an empty collection. ASCII whitespace
/// inside the text (line wrapping) is ignored.
pub fn decode(payload: &str) -> CodecResult<StrokeCollection> {
    if payload.trim().is_empty() {
        return Ok(StrokeCollection::new());
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| CodecError::Base64(e.to_string()))?;
    decode_bytes(&bytes)
}

/// Encode a stroke collection as base64 payload text.
pub fn encode(strokes: &StrokeCollection) -> String {
    let bytes = encode_bytes(strokes);
    if bytes.is_empty() {
        String::new()
    } else {
        STANDARD.encode(bytes)
    }
}

/// Decode a raw binary ink stream. An empty buffer is an empty collection.
pub fn decode_bytes(bytes: &[u8]) -> CodecResult<StrokeCollection> {
    stream::decode(bytes)
}

/// Encode a stroke collection as a raw binary ink stream.
pub fn encode_bytes(strokes: &StrokeCollection) -> Vec<u8> {
    stream::encode(strokes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::InkColor;

    fn sample_collection() -> StrokeCollection {
        let red = DrawingAttributes::new().with_color(InkColor::rgb(255, 0, 0));
        let mut strokes = StrokeCollection::new();
        strokes.push(
            Stroke::new(vec![Point::new(0, 0), Point::new(120, -40), Point::new(260, 15)], red)
                .unwrap(),
        );
        strokes
    }

    #[test]
    fn test_blank_payload_is_empty_collection() {
        for text in ["", "   ", "\r\n\t"] {
            let strokes = decode(text).unwrap();
            assert!(strokes.is_empty());
        }
        assert_eq!(encode(&StrokeCollection::new()), "");
    }

    #[test]
    fn test_payload_round_trip_is_byte_identical() {
        let payload = encode(&sample_collection());
        let decoded = decode(&payload).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(encode(&decoded), payload);
    }

    #[test]
    fn test_wrapped_payload_decodes() {
        let payload = encode(&sample_collection());
        let (head, tail) = payload.split_at(payload.len() / 2);
        let wrapped = format!("{head}\r\n  {tail}\n");
        assert_eq!(decode(&wrapped).unwrap(), decode(&payload).unwrap());
    }

    #[test]
    fn test_invalid_base64_is_error() {
        assert!(matches!(decode("not base64!"), Err(CodecError::Base64(_))));
    }

    #[test]
    fn test_valid_base64_with_garbage_stream_is_error() {
        let payload = STANDARD.encode([0x07, 0x01, 0x02]);
        assert!(decode(&payload).is_err());
    }
}
