//! Little-endian field helpers for fixed-size records.

use crate::{Error, Result};

/// Sequential little-endian field reader over a record buffer.
///
/// The record codecs check the buffer length up front, so every read here is
/// in bounds by construction.
pub(crate) struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    /// Wraps `buf`, failing unless it is exactly `expected` bytes long.
    pub(crate) fn exact(record: &'static str, buf: &'a [u8], expected: usize) -> Result<Self> {
        if buf.len() != expected {
            return Err(Error::SizeMismatch {
                record,
                expected,
                actual: buf.len(),
            });
        }
        Ok(Self { buf, pos: 0 })
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    pub(crate) fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    pub(crate) fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take())
    }
}

/// Sequential little-endian field writer into a fixed-size record.
pub(crate) struct FieldWriter<const N: usize> {
    buf: [u8; N],
    pos: usize,
}

impl<const N: usize> FieldWriter<N> {
    pub(crate) fn new() -> Self {
        Self {
            buf: [0u8; N],
            pos: 0,
        }
    }

    fn put(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        self
    }

    pub(crate) fn u32(&mut self, value: u32) -> &mut Self {
        self.put(&value.to_le_bytes())
    }

    pub(crate) fn u64(&mut self, value: u64) -> &mut Self {
        self.put(&value.to_le_bytes())
    }

    pub(crate) fn finish(&self) -> [u8; N] {
        debug_assert_eq!(self.pos, N, "record not fully written");
        self.buf
    }
}

/// Converts an in-memory offset or size to its 32-bit on-disk field.
pub(crate) fn to_u32(value: u64, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        Error::LimitExceeded(format!("{} {} does not fit in 32 bits", what, value))
    })
}
