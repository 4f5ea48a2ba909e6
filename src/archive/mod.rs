//! The ARC archive engine.
//!
//! An [`Archive`] owns one seekable stream and the parsed index of the
//! container stored in it. Every public operation takes `&self`, locks the
//! archive for its whole duration and works through absolute seeks, so one
//! instance can be shared between threads.
//!
//! # Example
//!
//! ```rust
//! use gdarc::{Archive, StorageMode};
//! use std::io::Cursor;
//!
//! let archive = Archive::create(Cursor::new(Vec::new()))?;
//! let entry = archive.create_entry("/a/b.txt", b"hello", StorageMode::Plain)?;
//! assert_eq!(archive.read_entry(&entry)?, b"hello");
//! assert_eq!(entry.adler32(), gdarc::checksum::checksum(b"hello"));
//! # Ok::<(), gdarc::Error>(())
//! ```

mod archive_edit;
mod archive_open;
mod decompression;
mod entry;
mod extraction;
mod footer;
mod info;
mod options;
mod shift;
mod stream;

pub use entry::{Chunk, Entry};
pub use info::{ArchiveInfo, ExtractResult, TestResult};
pub use options::{ArchiveOptions, DEFAULT_MAX_SHIFT_BUFFER, ExtractOptions, OverwritePolicy};
pub use stream::Truncate;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::format::Header;
use crate::{Error, Result};

use entry::{EntryId, StoredEntry};

static NEXT_ARCHIVE_ID: AtomicU64 = AtomicU64::new(1);

/// Acquires a mutex lock, recovering from poisoning.
fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("Archive mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// An opened ARC archive.
pub struct Archive<S> {
    id: u64,
    options: ArchiveOptions,
    state: Mutex<Option<ArchiveState<S>>>,
}

/// Everything an open archive holds. `None` in [`Archive::state`] means
/// the archive was closed.
pub(crate) struct ArchiveState<S> {
    pub(crate) stream: S,
    pub(crate) header: Header,
    pub(crate) entries: Vec<StoredEntry>,
    next_serial: u64,
}

impl<S> ArchiveState<S> {
    pub(crate) fn new(stream: S, header: Header) -> Self {
        Self {
            stream,
            header,
            entries: Vec::new(),
            next_serial: 0,
        }
    }

    pub(crate) fn next_serial(&mut self) -> u64 {
        let serial = self.next_serial;
        self.next_serial += 1;
        serial
    }

    /// Finds the index of the entry named by `id`.
    pub(crate) fn position(&self, archive: u64, id: EntryId) -> Result<usize> {
        if id.archive != archive {
            return Err(Error::NotOwned);
        }
        self.entries
            .iter()
            .position(|e| e.serial == id.serial)
            .ok_or(Error::NotOwned)
    }
}

impl<S> Archive<S> {
    pub(crate) fn from_state(state: ArchiveState<S>, options: ArchiveOptions) -> Self {
        Self {
            id: NEXT_ARCHIVE_ID.fetch_add(1, Ordering::Relaxed),
            options,
            state: Mutex::new(Some(state)),
        }
    }

    /// Runs `f` against the open state.
    pub(crate) fn with_state<T>(
        &self,
        f: impl FnOnce(&mut ArchiveState<S>) -> Result<T>,
    ) -> Result<T> {
        let mut guard = lock_or_recover(&self.state);
        let state = guard.as_mut().ok_or(Error::Disposed)?;
        f(state)
    }

    /// Runs `f` against the open state of a writable archive.
    pub(crate) fn with_writable_state<T>(
        &self,
        f: impl FnOnce(&mut ArchiveState<S>) -> Result<T>,
    ) -> Result<T> {
        self.with_state(|state| {
            if self.options.read_only {
                return Err(Error::StreamCapability(
                    "archive was opened read-only".into(),
                ));
            }
            f(state)
        })
    }

    /// Returns the options this archive was opened with.
    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Returns true if mutating operations are rejected.
    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    /// Returns snapshots of all entries, in entry table order.
    pub fn entries(&self) -> Result<Vec<Entry>> {
        self.with_state(|state| Ok(state.entries.iter().map(|e| e.snapshot(self.id)).collect()))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> Result<usize> {
        self.with_state(|state| Ok(state.entries.len()))
    }

    /// Returns true if the archive has no entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Finds the first entry with exactly this path.
    ///
    /// Paths are not required to be unique; later duplicates are only
    /// reachable through [`entries`](Self::entries).
    pub fn find(&self, path: &str) -> Result<Option<Entry>> {
        self.with_state(|state| {
            Ok(state
                .entries
                .iter()
                .find(|e| e.path == path)
                .map(|e| e.snapshot(self.id)))
        })
    }

    /// Returns a fresh snapshot of `entry`.
    pub fn refresh(&self, entry: &Entry) -> Result<Entry> {
        self.with_state(|state| {
            let index = state.position(self.id, entry.id)?;
            Ok(state.entries[index].snapshot(self.id))
        })
    }

    /// Returns true if `entry` belongs to this archive and still exists.
    pub fn contains(&self, entry: &Entry) -> Result<bool> {
        self.with_state(|state| Ok(state.position(self.id, entry.id).is_ok()))
    }

    /// Returns the header as last written or parsed.
    pub fn header(&self) -> Result<Header> {
        self.with_state(|state| Ok(state.header))
    }

    /// Returns summary information about the archive.
    pub fn info(&self) -> Result<ArchiveInfo> {
        self.with_state(|state| {
            let header = state.header;
            Ok(ArchiveInfo {
                entry_count: state.entries.len(),
                chunk_count: state.entries.iter().map(|e| e.chunks.len()).sum(),
                total_size: state
                    .entries
                    .iter()
                    .map(|e| u64::from(e.record.plain_size))
                    .sum(),
                packed_size: state
                    .entries
                    .iter()
                    .map(|e| u64::from(e.record.compressed_size))
                    .sum(),
                footer_pointer: header.chunk_index_pointer(),
                footer_size: header.expected_len() - header.chunk_index_pointer(),
            })
        })
    }

    /// Returns true if the archive has been closed.
    pub fn is_closed(&self) -> bool {
        lock_or_recover(&self.state).is_none()
    }

    /// Closes the archive and releases the stream.
    ///
    /// Closing twice is a no-op. Every entry snapshot taken from this
    /// archive is rejected afterwards.
    pub fn close(&self) {
        if let Some(state) = lock_or_recover(&self.state).take() {
            log::debug!(
                "Closing archive {} with {} entries",
                self.id,
                state.entries.len()
            );
        }
    }

    /// Closes the archive and hands the stream back to the caller.
    pub fn into_inner(self) -> Result<S> {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(|poisoned| {
                log::warn!("Archive mutex was poisoned, recovering");
                poisoned.into_inner()
            })
            .ok_or(Error::Disposed)?;
        Ok(state.stream)
    }
}

impl<S> std::fmt::Debug for Archive<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::StorageMode;
    use std::io::Cursor;

    fn new_archive() -> Archive<Cursor<Vec<u8>>> {
        Archive::create(Cursor::new(Vec::new())).unwrap()
    }

    #[test]
    fn test_archive_ids_are_unique() {
        let a = new_archive();
        let b = new_archive();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_foreign_entry_not_owned() {
        let a = new_archive();
        let b = new_archive();
        let entry = a.create_entry("/x", b"data", StorageMode::Plain).unwrap();
        assert!(matches!(b.read_entry(&entry), Err(Error::NotOwned)));
        assert!(!b.contains(&entry).unwrap());
        assert!(a.contains(&entry).unwrap());
    }

    #[test]
    fn test_close_is_idempotent() {
        let archive = new_archive();
        let entry = archive.create_entry("/x", b"data", StorageMode::Plain).unwrap();
        archive.close();
        archive.close();
        assert!(archive.is_closed());
        assert!(matches!(archive.len(), Err(Error::Disposed)));
        assert!(matches!(archive.read_entry(&entry), Err(Error::Disposed)));
        assert!(matches!(archive.into_inner(), Err(Error::Disposed)));
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let archive = new_archive();
        let first = archive.create_entry("/dup", b"one", StorageMode::Plain).unwrap();
        archive.create_entry("/dup", b"two", StorageMode::Plain).unwrap();
        let found = archive.find("/dup").unwrap().unwrap();
        assert_eq!(found, first);
        assert!(archive.find("/missing").unwrap().is_none());
    }

    #[test]
    fn test_info_totals() {
        let archive = new_archive();
        archive.create_entry("/a", &[0u8; 100], StorageMode::Plain).unwrap();
        archive
            .create_entry("/b", &[0u8; 1000], StorageMode::Lz4Compressed)
            .unwrap();
        let info = archive.info().unwrap();
        assert_eq!(info.entry_count, 2);
        assert_eq!(info.chunk_count, 2);
        assert_eq!(info.total_size, 1100);
        assert!(info.packed_size < info.total_size);
    }

    #[test]
    fn test_archive_is_sync() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<Archive<Cursor<Vec<u8>>>>();
        assert_sync::<Archive<std::fs::File>>();
    }
}
