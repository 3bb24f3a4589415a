//! Multi-byte integer encoding and a bounds-checked byte reader.
//!
//! # Unsigned (`mbuint`)
//!
//! ```text
//! CVVV_VVVV CVVV_VVVV ...
//!   C = continuation bit (1 = another byte follows)
//!   V = 7 value bits, least significant group first
//! ```
//!
//! | Value Range | Total Bytes |
//! |-------------|-------------|
//! | 0 - 127 | 1 |
//! | 128 - 16,383 | 2 |
//! | 16,384 - 2,097,151 | 3 |
//!
//! # Signed (`sint`)
//!
//! The magnitude is shifted left by one and the sign stored in bit 0, then the
//! result is written as an `mbuint`.
//!
//! Decoding rejects overlong encodings and negative zero, so every value has
//! exactly one representation and decode-then-encode reproduces the input.

use super::{CodecError, CodecResult};

/// Longest legal `mbuint` (10 × 7 bits covers 64 bits).
const MAX_UINT_BYTES: usize = 10;

/// Append an unsigned integer in `mbuint` form.
pub fn write_uint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Append a signed integer in `sint` form.
pub fn write_sint(out: &mut Vec<u8>, value: i64) {
    let magnitude = value.unsigned_abs();
    debug_assert!(magnitude < 1 << 63, "sint magnitude out of range");
    let sign = u64::from(value < 0);
    write_uint(out, magnitude << 1 | sign);
}

/// Number of bytes `write_uint` emits for `value`.
pub fn uint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Sequential reader over an ink stream. Offsets in errors are absolute.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0, base: 0 }
    }

    /// Absolute offset of the next byte.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unread bytes, without consuming them.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Bytes consumed since `start` (a value previously returned by [`position`](Self::position)).
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.bytes[start..self.pos]
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(CodecError::UnexpectedEnd(self.offset()))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_uint(&mut self) -> CodecResult<u64> {
        let start = self.offset();
        let mut value = 0u64;
        for i in 0..MAX_UINT_BYTES {
            let byte = self.read_u8()?;
            let group = u64::from(byte & 0x7F);
            if i == MAX_UINT_BYTES - 1 && group > 1 {
                return Err(CodecError::Overflow(start));
            }
            value |= group << (7 * i);
            if byte & 0x80 == 0 {
                if i > 0 && group == 0 {
                    return Err(CodecError::NonCanonical(start));
                }
                return Ok(value);
            }
        }
        Err(CodecError::Overflow(start))
    }

    pub fn read_sint(&mut self) -> CodecResult<i64> {
        let start = self.offset();
        let raw = self.read_uint()?;
        let magnitude = (raw >> 1) as i64;
        if raw & 1 == 0 {
            Ok(magnitude)
        } else if magnitude == 0 {
            Err(CodecError::NonCanonical(start))
        } else {
            Ok(-magnitude)
        }
    }

    /// Read an `mbuint` that must fit in `usize`.
    pub fn read_len(&mut self) -> CodecResult<usize> {
        let start = self.offset();
        let value = self.read_uint()?;
        usize::try_from(value).map_err(|_| CodecError::Overflow(start))
    }

    pub fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(CodecError::UnexpectedEnd(self.base + self.bytes.len()));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Skip `count` little-endian `f32` values.
    pub fn skip_f32(&mut self, count: usize) -> CodecResult<()> {
        self.read_bytes(count * 4).map(|_| ())
    }

    /// Split off the next `len` bytes as their own reader.
    pub fn sub_reader(&mut self, len: usize) -> CodecResult<Reader<'a>> {
        let base = self.offset();
        let bytes = self.read_bytes(len)?;
        Ok(Reader { bytes, pos: 0, base })
    }

    /// Read a size-prefixed section as its own reader.
    pub fn sized_section(&mut self) -> CodecResult<Reader<'a>> {
        let len = self.read_len()?;
        self.sub_reader(len)
    }

    /// Fail if anything is left in `what`.
    pub fn finish(&self, what: &'static str) -> CodecResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes { what, offset: self.offset() })
        }
    }
}
