//! Entry model.
//!
//! The archive keeps its entries as [`StoredEntry`] values in one indexed
//! list. Callers only ever see [`Entry`] snapshots, which name their stored
//! counterpart through an [`EntryId`] and hold no reference into the
//! archive.

use crate::format::{ChunkRecord, EntryRecord, StorageMode};
use crate::timestamp::Timestamp;

/// One physically contiguous stored block of an entry.
pub type Chunk = ChunkRecord;

/// Identifies an entry within one specific archive instance.
///
/// Serials are never reused, so an id outlives the entry it names and is
/// simply no longer found after a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EntryId {
    pub(crate) archive: u64,
    pub(crate) serial: u64,
}

/// An entry as held by the archive.
#[derive(Debug, Clone)]
pub(crate) struct StoredEntry {
    pub(crate) serial: u64,
    pub(crate) path: String,
    pub(crate) record: EntryRecord,
    pub(crate) chunks: Vec<Chunk>,
}

impl StoredEntry {
    /// Absolute offset and length of the entry's payload bytes.
    ///
    /// Chunks of one entry are stored back to back, so the payload runs
    /// from the first chunk's pointer for the sum of the stored sizes.
    pub(crate) fn data_region(&self) -> (u64, u64) {
        match self.chunks.first() {
            Some(first) => (
                u64::from(first.data_pointer),
                self.chunks
                    .iter()
                    .map(|c| u64::from(c.compressed_size))
                    .sum(),
            ),
            None => (
                u64::from(self.record.data_pointer),
                u64::from(self.record.compressed_size),
            ),
        }
    }

    /// Moves every pointer at or past `boundary` back by `distance`.
    pub(crate) fn shift_pointers(&mut self, boundary: u64, distance: u32) {
        for chunk in &mut self.chunks {
            if u64::from(chunk.data_pointer) >= boundary {
                chunk.data_pointer -= distance;
            }
        }
        if u64::from(self.record.data_pointer) >= boundary {
            self.record.data_pointer -= distance;
        }
        if let Some(first) = self.chunks.first() {
            self.record.data_pointer = first.data_pointer;
        }
    }

    pub(crate) fn snapshot(&self, archive: u64) -> Entry {
        Entry {
            id: EntryId {
                archive,
                serial: self.serial,
            },
            path: self.path.clone(),
            record: self.record,
            chunks: self.chunks.clone(),
        }
    }
}

/// A snapshot of one stored file.
///
/// Entries are cheap copies of the archive's index at the moment they were
/// taken. Operations look the entry up again by identity, so a snapshot
/// whose offsets went stale after another entry was deleted still reads
/// the right bytes. Once its entry is deleted or the archive is closed the
/// snapshot is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub(crate) id: EntryId,
    pub(crate) path: String,
    pub(crate) record: EntryRecord,
    pub(crate) chunks: Vec<Chunk>,
}

impl Entry {
    /// Absolute path of the entry.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Storage mode, or `None` if the stored value is not recognized.
    pub fn storage_mode(&self) -> Option<StorageMode> {
        StorageMode::from_u32(self.record.storage_mode)
    }

    /// Raw storage mode value from the entry table.
    pub fn raw_storage_mode(&self) -> u32 {
        self.record.storage_mode
    }

    /// Returns true if the payload is LZ4 compressed.
    pub fn is_compressed(&self) -> bool {
        self.storage_mode() == Some(StorageMode::Lz4Compressed)
    }

    /// Offset of the first chunk.
    pub fn data_pointer(&self) -> u32 {
        self.record.data_pointer
    }

    /// Total stored size.
    pub fn compressed_size(&self) -> u32 {
        self.record.compressed_size
    }

    /// Total plain size.
    pub fn plain_size(&self) -> u32 {
        self.record.plain_size
    }

    /// Adler-32 of the plain bytes, as stored.
    pub fn adler32(&self) -> u32 {
        self.record.adler32
    }

    /// Last-write time.
    pub fn file_time(&self) -> Timestamp {
        Timestamp::from_filetime(self.record.file_time)
    }

    /// The entry's chunks, in payload order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The raw entry table record as of this snapshot.
    pub fn record(&self) -> &EntryRecord {
        &self.record
    }
}
