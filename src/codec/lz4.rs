//! LZ4 block codec.
//!
//! ARC payloads are raw LZ4 blocks (no frame header), one block per chunk.

use lz4_flex::block;

use super::BlockCodec;
use crate::{Error, Result};

/// Largest input the LZ4 block format accepts.
pub const MAX_INPUT_SIZE: usize = 0x7E00_0000;

/// Worst-case LZ4 block size for `len` input bytes.
///
/// This is the bound the format was written against
/// (`len + len / 255 + 16`).
#[inline]
pub const fn compress_bound(len: usize) -> usize {
    len + len / 255 + 16
}

/// LZ4 block codec backed by `lz4_flex`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl BlockCodec for Lz4Codec {
    fn name(&self) -> &'static str {
        "LZ4"
    }

    fn compress_bound(&self, len: usize) -> usize {
        compress_bound(len)
    }

    fn compress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        if src.len() > MAX_INPUT_SIZE {
            return Err(Error::Codec(format!(
                "LZ4 input of {} bytes exceeds maximum of {}",
                src.len(),
                MAX_INPUT_SIZE
            )));
        }

        // lz4_flex wants more headroom than the format bound, so compress
        // into its own buffer and copy out.
        let compressed = block::compress(src);
        let capacity = dst.len();
        let out = dst.get_mut(..compressed.len()).ok_or_else(|| {
            Error::Codec(format!(
                "compressed block of {} bytes does not fit {} byte buffer",
                compressed.len(),
                capacity
            ))
        })?;
        out.copy_from_slice(&compressed);
        Ok(compressed.len())
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        block::decompress_into(src, dst).map_err(|e| Error::Codec(e.to_string()))
    }
}
