//! Structural edits: create, delete and move.
//!
//! Each edit puts the in-memory entries into their new shape and then
//! commits the footer once. Paths are validated after the archive is
//! known to be open and writable, and before the stream is touched.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::archive_path::{self, EntryPath};
use crate::checksum::checksum;
use crate::format::reader::to_u32;
use crate::format::{DATA_START, EntryRecord, StorageMode};
use crate::timestamp::Timestamp;
use crate::{Error, Result};

use super::entry::{Chunk, StoredEntry};
use super::shift::shift_back;
use super::{Archive, Entry, Truncate};

/// A payload prepared for writing, one buffer per chunk.
struct Payload {
    blocks: Vec<Vec<u8>>,
    plain_sizes: Vec<usize>,
}

impl Payload {
    fn len(&self) -> u64 {
        self.blocks.iter().map(|b| b.len() as u64).sum()
    }
}

impl<S: Read + Write + Seek + Truncate> Archive<S> {
    /// Stores `data` under `path` and returns the new entry.
    ///
    /// The payload is written where the footer used to start; the footer
    /// follows right after it.
    pub fn create_entry(&self, path: &str, data: &[u8], mode: StorageMode) -> Result<Entry> {
        self.with_writable_state(|state| {
            archive_path::validate(path)?;
            to_u32(data.len() as u64, "entry size")?;
            let payload = self.encode(data, mode)?;

            let start = state.header.chunk_index_pointer();
            let mut chunks = Vec::with_capacity(payload.blocks.len());
            let mut offset = start;
            for (block, &plain) in payload.blocks.iter().zip(&payload.plain_sizes) {
                chunks.push(Chunk {
                    data_pointer: to_u32(offset, "data pointer")?,
                    compressed_size: to_u32(block.len() as u64, "compressed size")?,
                    plain_size: to_u32(plain as u64, "plain size")?,
                });
                offset += block.len() as u64;
            }
            let end = start + payload.len();

            let serial = state.next_serial();
            state.entries.push(StoredEntry {
                serial,
                path: path.to_string(),
                record: EntryRecord {
                    storage_mode: mode.as_u32(),
                    adler32: checksum(data),
                    file_time: Timestamp::now().as_filetime(),
                    ..Default::default()
                },
                chunks,
            });

            let written = state.layout(end).and_then(|footer| {
                state.stream.seek(SeekFrom::Start(start))?;
                for block in &payload.blocks {
                    state.stream.write_all(block)?;
                }
                state.write_footer(footer)
            });
            if let Err(e) = written {
                state.entries.pop();
                return Err(e);
            }

            log::debug!(
                "Created {} ({} bytes, {}, {} stored)",
                path,
                data.len(),
                mode,
                payload.len()
            );
            let last = state.entries.len() - 1;
            Ok(state.entries[last].snapshot(self.id))
        })
    }

    /// Splits and compresses `data` according to `mode` and the options.
    fn encode(&self, data: &[u8], mode: StorageMode) -> Result<Payload> {
        match mode {
            StorageMode::Plain => Ok(Payload {
                blocks: vec![data.to_vec()],
                plain_sizes: vec![data.len()],
            }),
            StorageMode::Lz4Compressed => {
                let pieces: Vec<&[u8]> = match self.options.chunk_size {
                    Some(size) if size > 0 && !data.is_empty() => data.chunks(size).collect(),
                    _ => vec![data],
                };
                let codec = self.options.codec.as_ref();
                let mut payload = Payload {
                    blocks: Vec::with_capacity(pieces.len()),
                    plain_sizes: Vec::with_capacity(pieces.len()),
                };
                for piece in pieces {
                    let mut block = vec![0u8; codec.compress_bound(piece.len())];
                    let n = codec.compress(piece, &mut block)?;
                    block.truncate(n);
                    payload.blocks.push(block);
                    payload.plain_sizes.push(piece.len());
                }
                Ok(payload)
            }
        }
    }

    /// Deletes an entry and reclaims its payload bytes.
    ///
    /// Everything stored after the entry's payload moves back to close the
    /// gap, so the file never keeps unreferenced bytes. The new footer is
    /// laid out before any byte moves. If writing it fails once the payload
    /// has been compacted, the entry stays deleted in memory and the next
    /// successful edit writes the footer at the compacted offset.
    pub fn delete_entry(&self, entry: Entry) -> Result<()> {
        self.with_writable_state(|state| {
            let index = state.position(self.id, entry.id)?;
            let (start, size) = state.entries[index].data_region();
            let footer = state.header.chunk_index_pointer();
            let end = start + size;

            if size > 0 && (start < DATA_START || end > footer) {
                return Err(Error::out_of_bounds(
                    start,
                    format!(
                        "{} byte payload outside the data region {:#x}..{:#x}",
                        size, DATA_START, footer
                    ),
                ));
            }
            let distance = to_u32(size, "reclaimed size")?;
            let compacted = to_u32(footer - size, "footer pointer")?;

            let previous = state.entries.clone();
            if size > 0 {
                for (i, other) in state.entries.iter_mut().enumerate() {
                    if i != index {
                        other.shift_pointers(end, distance);
                    }
                }
            }
            let removed = state.entries.remove(index);
            let layout = match state.layout(u64::from(compacted)) {
                Ok(layout) => layout,
                Err(e) => {
                    state.entries = previous;
                    return Err(e);
                }
            };

            if size > 0 {
                match shift_back(
                    &mut state.stream,
                    end,
                    footer,
                    size,
                    self.options.max_shift_buffer,
                ) {
                    Ok(moved) => log::debug!("Compacted {} bytes after {:#x}", moved, start),
                    Err(e) => {
                        state.entries = previous;
                        return Err(e);
                    }
                }
            }

            if let Err(e) = state.write_footer(layout) {
                log::warn!(
                    "Footer write failed after deleting {}; footer moves to {:#x}",
                    removed.path,
                    compacted
                );
                state.header.footer_pointer = compacted;
                return Err(e);
            }
            log::debug!("Deleted {} ({} bytes reclaimed)", removed.path, size);
            Ok(())
        })
    }

    /// Renames an entry. The payload is not touched.
    ///
    /// `entry` is refreshed to the committed state on success and left as
    /// it was on failure.
    pub fn move_entry(&self, entry: &mut Entry, new_path: &str) -> Result<()> {
        self.with_writable_state(|state| {
            let index = state.position(self.id, entry.id)?;
            archive_path::validate(new_path)?;
            if state.entries[index].path != new_path {
                let old = std::mem::replace(&mut state.entries[index].path, new_path.to_string());
                let footer = state.header.chunk_index_pointer();
                if let Err(e) = state.commit(footer) {
                    state.entries[index].path = old;
                    return Err(e);
                }
                log::debug!("Moved {} to {}", old, new_path);
            }
            *entry = state.entries[index].snapshot(self.id);
            Ok(())
        })
    }

    /// Moves every entry under `folder` to the same place under
    /// `new_folder`, returning the number of entries moved.
    ///
    /// Either every rebased path is valid and all entries move in one
    /// footer rebuild, or nothing changes.
    pub fn move_folder(&self, folder: &str, new_folder: &str) -> Result<usize> {
        self.with_writable_state(|state| {
            archive_path::validate(folder)?;
            archive_path::validate(new_folder)?;

            let mut renames = Vec::new();
            for (i, entry) in state.entries.iter().enumerate() {
                let Ok(path) = EntryPath::new(&entry.path) else {
                    continue;
                };
                if let Some(rebased) = path.rebase(folder, new_folder)? {
                    renames.push((i, rebased.into_string()));
                }
            }
            if renames.is_empty() || folder == new_folder {
                return Ok(0);
            }

            let mut previous = Vec::with_capacity(renames.len());
            for (i, path) in renames {
                previous.push((i, std::mem::replace(&mut state.entries[i].path, path)));
            }
            let footer = state.header.chunk_index_pointer();
            if let Err(e) = state.commit(footer) {
                for (i, path) in previous {
                    state.entries[i].path = path;
                }
                return Err(e);
            }

            log::debug!(
                "Moved {} entries from {} to {}",
                previous.len(),
                folder,
                new_folder
            );
            Ok(previous.len())
        })
    }
}
