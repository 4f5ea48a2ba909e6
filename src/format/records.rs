//! Entry and chunk table records.

use super::reader::{FieldReader, FieldWriter};
use super::{CHUNK_SIZE, ENTRY_SIZE};
use crate::Result;

/// One 12-byte chunk table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkRecord {
    /// Absolute offset of the stored block.
    pub data_pointer: u32,
    /// Stored (possibly compressed) size of the block.
    pub compressed_size: u32,
    /// Size of the block once decompressed.
    pub plain_size: u32,
}

impl ChunkRecord {
    /// Decodes a chunk record from exactly [`CHUNK_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = FieldReader::exact("Chunk", bytes, CHUNK_SIZE)?;
        Ok(Self {
            data_pointer: r.u32(),
            compressed_size: r.u32(),
            plain_size: r.u32(),
        })
    }

    /// Encodes the chunk record.
    pub fn to_bytes(&self) -> [u8; CHUNK_SIZE] {
        FieldWriter::<CHUNK_SIZE>::new()
            .u32(self.data_pointer)
            .u32(self.compressed_size)
            .u32(self.plain_size)
            .finish()
    }
}

/// One 44-byte entry table record.
///
/// `data_pointer`, `compressed_size` and `plain_size` summarize the entry's
/// chunks: the first chunk's offset and the totals over all chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryRecord {
    /// Raw storage mode (see [`StorageMode`](super::StorageMode)).
    pub storage_mode: u32,
    /// Offset of the first chunk.
    pub data_pointer: u32,
    /// Total stored size.
    pub compressed_size: u32,
    /// Total plain size.
    pub plain_size: u32,
    /// Adler-32 of the plain bytes.
    pub adler32: u32,
    /// Windows FILETIME of the last write.
    pub file_time: u64,
    /// Number of chunk records owned by the entry.
    pub chunk_count: u32,
    /// Index of the entry's first record in the chunk table.
    pub chunk_offset: u32,
    /// Path length in bytes, excluding the terminating NUL.
    pub path_length: u32,
    /// Byte offset of the path within the path table.
    pub path_offset: u32,
}

impl EntryRecord {
    /// Decodes an entry record from exactly [`ENTRY_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = FieldReader::exact("Entry", bytes, ENTRY_SIZE)?;
        Ok(Self {
            storage_mode: r.u32(),
            data_pointer: r.u32(),
            compressed_size: r.u32(),
            plain_size: r.u32(),
            adler32: r.u32(),
            file_time: r.u64(),
            chunk_count: r.u32(),
            chunk_offset: r.u32(),
            path_length: r.u32(),
            path_offset: r.u32(),
        })
    }

    /// Encodes the entry record.
    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        FieldWriter::<ENTRY_SIZE>::new()
            .u32(self.storage_mode)
            .u32(self.data_pointer)
            .u32(self.compressed_size)
            .u32(self.plain_size)
            .u32(self.adler32)
            .u64(self.file_time)
            .u32(self.chunk_count)
            .u32(self.chunk_offset)
            .u32(self.path_length)
            .u32(self.path_offset)
            .finish()
    }
}
