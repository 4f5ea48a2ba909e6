//! Compression codec port for ARC payloads.
//!
//! The engine only ever compresses and decompresses whole blocks with known
//! sizes, so the port is a small block-oriented trait rather than a
//! streaming `Read`/`Write` pair. The default implementation is
//! [`Lz4Codec`], a pure-Rust LZ4 block codec.

pub mod lz4;

use std::sync::{Arc, LazyLock};

use crate::Result;

pub use lz4::Lz4Codec;

/// A bounded block compressor/decompressor.
///
/// Implementations must be stateless between calls (or internally
/// synchronized): one instance may be shared by every archive in the process.
pub trait BlockCodec: Send + Sync {
    /// Returns a human-readable codec name for logs.
    fn name(&self) -> &'static str;

    /// Worst-case compressed size for `len` plain bytes.
    fn compress_bound(&self, len: usize) -> usize;

    /// Compresses `src` into `dst`, returning the compressed length.
    ///
    /// `dst` is at least [`compress_bound(src.len())`](Self::compress_bound)
    /// bytes long.
    fn compress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize>;

    /// Decompresses `src` into `dst`, returning the decompressed length.
    ///
    /// `dst.len()` is the expected plain size.
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize>;
}

static DEFAULT_CODEC: LazyLock<Arc<dyn BlockCodec>> = LazyLock::new(|| Arc::new(Lz4Codec));

/// Returns the process-wide default codec.
pub fn default_codec() -> Arc<dyn BlockCodec> {
    Arc::clone(&DEFAULT_CODEC)
}
