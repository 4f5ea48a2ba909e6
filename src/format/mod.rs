//! ARC container format constants, record layouts and codecs.
//!
//! # File layout
//!
//! All integers are little-endian.
//!
//! | Offset | Field | Size |
//! |---|---|---|
//! | 0 | magic `"ARC\0"` | 4 |
//! | 4 | format version (3) | 4 |
//! | 8 | [`Header`] | 20 |
//! | 28 | reserved, zero-filled on creation | up to 2048 |
//! | 2048 | data region: raw or LZ4 block payloads | ... |
//! | `FooterPointer` | chunk table: [`ChunkRecord`] × `ChunkCount` | `ChunkIndexSize` |
//! | `+ChunkIndexSize` | path table: NUL-terminated ASCII paths | `PathIndexSize` |
//! | `+PathIndexSize` | entry table: [`EntryRecord`] × `EntryCount` | `EntryCount × 44` |

pub mod header;
pub(crate) mod reader;
pub mod records;

use std::fmt;

pub use header::Header;
pub use records::{ChunkRecord, EntryRecord};

/// The ARC file signature (magic bytes), including the trailing NUL.
pub const MAGIC: &[u8; 4] = b"ARC\0";

/// The only supported format version.
pub const VERSION: u32 = 3;

/// Offset of the [`Header`] record.
pub const HEADER_OFFSET: u64 = 8;

/// Start of the data region; everything before it is preamble.
///
/// Also the minimum length of a valid archive.
pub const DATA_START: u64 = 2048;

/// Size of an encoded [`Header`].
pub const HEADER_SIZE: usize = 20;

/// Size of an encoded [`EntryRecord`].
pub const ENTRY_SIZE: usize = 44;

/// Size of an encoded [`ChunkRecord`].
pub const CHUNK_SIZE: usize = 12;

/// How an entry's payload is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageMode {
    /// Raw bytes, one chunk.
    Plain,
    /// One or more independently LZ4-compressed block chunks.
    Lz4Compressed,
}

impl StorageMode {
    /// Returns the on-disk value of this mode.
    pub const fn as_u32(self) -> u32 {
        match self {
            StorageMode::Plain => 1,
            StorageMode::Lz4Compressed => 3,
        }
    }

    /// Maps an on-disk value to a known mode.
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(StorageMode::Plain),
            3 => Some(StorageMode::Lz4Compressed),
            _ => None,
        }
    }
}

impl TryFrom<u32> for StorageMode {
    type Error = crate::Error;

    fn try_from(value: u32) -> crate::Result<Self> {
        Self::from_u32(value).ok_or(crate::Error::UnsupportedStorageMode { mode: value })
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageMode::Plain => f.write_str("plain"),
            StorageMode::Lz4Compressed => f.write_str("lz4"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic() {
        assert_eq!(MAGIC.len(), 4);
        assert_eq!(&MAGIC[..3], b"ARC");
        assert_eq!(MAGIC[3], 0);
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(HEADER_SIZE, 20);
        assert_eq!(ENTRY_SIZE, 44);
        assert_eq!(CHUNK_SIZE, 12);
        assert!(HEADER_OFFSET + HEADER_SIZE as u64 <= DATA_START);
    }

    #[test]
    fn test_storage_mode_values() {
        assert_eq!(StorageMode::Plain.as_u32(), 1);
        assert_eq!(StorageMode::Lz4Compressed.as_u32(), 3);
        assert_eq!(StorageMode::from_u32(1), Some(StorageMode::Plain));
        assert_eq!(StorageMode::from_u32(3), Some(StorageMode::Lz4Compressed));
        assert_eq!(StorageMode::from_u32(2), None);
    }

    #[test]
    fn test_storage_mode_try_from_unknown() {
        let err = StorageMode::try_from(7).unwrap_err();
        assert!(matches!(err, crate::Error::UnsupportedStorageMode { mode: 7 }));
    }
}
