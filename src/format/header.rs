//! ARC header record.

use super::reader::{FieldReader, FieldWriter};
use super::{CHUNK_SIZE, DATA_START, ENTRY_SIZE, HEADER_SIZE};
use crate::Result;

/// The 20-byte header stored at offset 8.
///
/// `FooterPointer + ChunkIndexSize + PathIndexSize + EntryCount * 44` equals
/// the file length of a well-formed archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of entries in the entry table.
    pub entry_count: u32,
    /// Number of records in the chunk table.
    pub chunk_count: u32,
    /// Size of the chunk table in bytes.
    pub chunk_index_size: u32,
    /// Size of the path table in bytes.
    pub path_index_size: u32,
    /// Absolute offset where the footer (chunk table) begins.
    pub footer_pointer: u32,
}

impl Default for Header {
    /// The header of an archive with no entries.
    fn default() -> Self {
        Self {
            entry_count: 0,
            chunk_count: 0,
            chunk_index_size: 0,
            path_index_size: 0,
            footer_pointer: DATA_START as u32,
        }
    }
}

impl Header {
    /// Decodes a header from exactly [`HEADER_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = FieldReader::exact("Header", bytes, HEADER_SIZE)?;
        Ok(Self {
            entry_count: r.u32(),
            chunk_count: r.u32(),
            chunk_index_size: r.u32(),
            path_index_size: r.u32(),
            footer_pointer: r.u32(),
        })
    }

    /// Encodes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        FieldWriter::<HEADER_SIZE>::new()
            .u32(self.entry_count)
            .u32(self.chunk_count)
            .u32(self.chunk_index_size)
            .u32(self.path_index_size)
            .u32(self.footer_pointer)
            .finish()
    }

    /// Offset of the chunk table.
    pub fn chunk_index_pointer(&self) -> u64 {
        u64::from(self.footer_pointer)
    }

    /// Offset of the path table.
    pub fn path_index_pointer(&self) -> u64 {
        self.chunk_index_pointer() + u64::from(self.chunk_index_size)
    }

    /// Offset of the entry table.
    pub fn entry_index_pointer(&self) -> u64 {
        self.path_index_pointer() + u64::from(self.path_index_size)
    }

    /// Size of the entry table in bytes.
    pub fn entry_index_size(&self) -> u64 {
        u64::from(self.entry_count) * ENTRY_SIZE as u64
    }

    /// The file length this header describes.
    pub fn expected_len(&self) -> u64 {
        self.entry_index_pointer() + self.entry_index_size()
    }

    /// Returns true if the chunk table size agrees with the chunk count.
    pub fn chunk_table_consistent(&self) -> bool {
        u64::from(self.chunk_index_size) == u64::from(self.chunk_count) * CHUNK_SIZE as u64
    }
}
