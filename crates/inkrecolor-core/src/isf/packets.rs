//! Stroke packet data (point channels).
//!
//! A stroke body is:
//!
//! ```text
//! mbuint  packet count
//! u8      channel count (2 = X,Y  3 = X,Y,pressure)
//! per channel:
//!   u8    transform (0 absolute, 1 delta, 2 delta-delta)
//!   sint  × packet count
//! ```

use super::stroke::Point;
use super::varint::{Reader, write_sint, write_uint};
use super::{CodecError, CodecResult};

/// How a channel's values are stored relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    Absolute,
    Delta,
    /// Second-order differences; smallest output for smooth pen motion.
    #[default]
    DeltaDelta,
}

impl Transform {
    fn from_byte(byte: u8) -> CodecResult<Self> {
        match byte {
            0 => Ok(Self::Absolute),
            1 => Ok(Self::Delta),
            2 => Ok(Self::DeltaDelta),
            other => Err(CodecError::InvalidPackets(format!("unknown transform {other}"))),
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            Self::Absolute => 0,
            Self::Delta => 1,
            Self::DeltaDelta => 2,
        }
    }
}

/// Decode a stroke body into points.
pub(crate) fn decode(mut reader: Reader<'_>) -> CodecResult<Vec<Point>> {
    let count = reader.read_len()?;
    if count == 0 {
        return Err(CodecError::InvalidPackets("stroke has no packets".to_string()));
    }
    // Each value takes at least one byte.
    if count > reader.remaining() {
        return Err(CodecError::UnexpectedEnd(reader.offset() + reader.remaining()));
    }

    let channels = reader.read_u8()?;
    if !(2..=3).contains(&channels) {
        return Err(CodecError::InvalidPackets(format!("unsupported channel count {channels}")));
    }

    let xs = decode_channel(&mut reader, count)?;
    let ys = decode_channel(&mut reader, count)?;
    let pressures = if channels == 3 {
        Some(decode_channel(&mut reader, count)?)
    } else {
        None
    };
    reader.finish("stroke")?;

    let points = xs
        .into_iter()
        .zip(ys)
        .enumerate()
        .map(|(i, (x, y))| Point {
            x,
            y,
            pressure: pressures.as_ref().map(|p| p[i]),
        })
        .collect();
    Ok(points)
}

/// Encode points as a stroke body. Callers guarantee a non-empty point list
/// with pressure on all points or none.
pub(crate) fn encode(points: &[Point], transform: Transform) -> Vec<u8> {
    let mut out = Vec::new();
    write_uint(&mut out, points.len() as u64);

    let has_pressure = points.first().is_some_and(|p| p.pressure.is_some());
    out.push(if has_pressure { 3 } else { 2 });

    encode_channel(&mut out, points.iter().map(|p| p.x), transform);
    encode_channel(&mut out, points.iter().map(|p| p.y), transform);
    if has_pressure {
        encode_channel(&mut out, points.iter().map(|p| p.pressure.unwrap_or(0)), transform);
    }
    out
}

fn decode_channel(reader: &mut Reader<'_>, count: usize) -> CodecResult<Vec<i32>> {
    let transform = Transform::from_byte(reader.read_u8()?)?;
    let mut values = Vec::with_capacity(count);
    let (mut prev, mut prev_delta) = (0i64, 0i64);

    for _ in 0..count {
        let offset = reader.offset();
        let raw = reader.read_sint()?;
        let value = match transform {
            Transform::Absolute => Some(raw),
            Transform::Delta => prev.checked_add(raw),
            Transform::DeltaDelta => prev_delta
                .checked_add(raw)
                .and_then(|delta| prev.checked_add(delta)),
        };
        let value = value
            .and_then(|v| i32::try_from(v).ok())
            .ok_or(CodecError::Overflow(offset))?;

        let value = i64::from(value);
        prev_delta = value - prev;
        prev = value;
        values.push(value as i32);
    }
    Ok(values)
}

fn encode_channel(out: &mut Vec<u8>, values: impl Iterator<Item = i32>, transform: Transform) {
    out.push(transform.to_byte());
    let (mut prev, mut prev_delta) = (0i64, 0i64);

    for value in values.map(i64::from) {
        let delta = value - prev;
        let stored = match transform {
            Transform::Absolute => value,
            Transform::Delta => delta,
            Transform::DeltaDelta => delta - prev_delta,
        };
        write_sint(out, stored);
        prev_delta = delta;
        prev = value;
    }
}
