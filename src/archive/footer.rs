//! Footer rebuild.
//!
//! Every structural change funnels through [`ArchiveState::commit`], the
//! only code that derives chunk offsets, path offsets, the entry summaries
//! and the header fields. Callers just put the in-memory entries in their
//! new shape and say where the footer starts.

use std::io::{Seek, SeekFrom, Write};

use crate::Result;
use crate::format::reader::to_u32;
use crate::format::{CHUNK_SIZE, EntryRecord, HEADER_OFFSET, Header};

use super::{ArchiveState, Truncate};

/// Serialized index tables, ready to be written.
pub(crate) struct Footer {
    header: Header,
    chunk_table: Vec<u8>,
    path_table: Vec<u8>,
    records: Vec<EntryRecord>,
}

impl<S> ArchiveState<S> {
    /// Computes the footer for the current entries at `footer_pointer`.
    ///
    /// Nothing is written, so a `LimitExceeded` here leaves the stream as
    /// it was.
    pub(crate) fn layout(&self, footer_pointer: u64) -> Result<Footer> {
        let mut chunk_table = Vec::new();
        let mut path_table = Vec::new();
        let mut records = Vec::with_capacity(self.entries.len());
        let mut chunk_count = 0u64;

        for entry in &self.entries {
            let mut record = entry.record;
            record.chunk_offset = to_u32(chunk_count, "chunk offset")?;
            record.chunk_count = to_u32(entry.chunks.len() as u64, "chunk count")?;
            record.path_offset = to_u32(path_table.len() as u64, "path offset")?;
            record.path_length = to_u32(entry.path.len() as u64, "path length")?;

            if let Some(first) = entry.chunks.first() {
                record.data_pointer = first.data_pointer;
                record.compressed_size = to_u32(
                    entry.chunks.iter().map(|c| u64::from(c.compressed_size)).sum(),
                    "compressed size",
                )?;
                record.plain_size = to_u32(
                    entry.chunks.iter().map(|c| u64::from(c.plain_size)).sum(),
                    "plain size",
                )?;
            }

            for chunk in &entry.chunks {
                chunk_table.extend_from_slice(&chunk.to_bytes());
            }
            chunk_count += entry.chunks.len() as u64;
            path_table.extend_from_slice(entry.path.as_bytes());
            path_table.push(0);
            records.push(record);
        }

        let header = Header {
            entry_count: to_u32(records.len() as u64, "entry count")?,
            chunk_count: to_u32(chunk_count, "chunk count")?,
            chunk_index_size: to_u32(chunk_count * CHUNK_SIZE as u64, "chunk table size")?,
            path_index_size: to_u32(path_table.len() as u64, "path table size")?,
            footer_pointer: to_u32(footer_pointer, "footer pointer")?,
        };

        Ok(Footer {
            header,
            chunk_table,
            path_table,
            records,
        })
    }
}

impl<S: Write + Seek + Truncate> ArchiveState<S> {
    /// Writes the chunk, path and entry tables at `footer_pointer`, cuts
    /// the stream off after them and rewrites the header.
    pub(crate) fn commit(&mut self, footer_pointer: u64) -> Result<()> {
        let footer = self.layout(footer_pointer)?;
        self.write_footer(footer)
    }

    /// Writes a footer computed by [`layout`](Self::layout) and adopts its
    /// records and header.
    pub(crate) fn write_footer(&mut self, footer: Footer) -> Result<()> {
        let footer_pointer = footer.header.chunk_index_pointer();
        self.stream.seek(SeekFrom::Start(footer_pointer))?;
        self.stream.write_all(&footer.chunk_table)?;
        self.stream.write_all(&footer.path_table)?;
        for record in &footer.records {
            self.stream.write_all(&record.to_bytes())?;
        }
        self.stream.truncate(footer.header.expected_len())?;

        self.stream.seek(SeekFrom::Start(HEADER_OFFSET))?;
        self.stream.write_all(&footer.header.to_bytes())?;
        self.stream.flush()?;

        for (entry, record) in self.entries.iter_mut().zip(footer.records) {
            entry.record = record;
        }
        self.header = footer.header;

        log::debug!(
            "Committed footer at {:#x}: {} entries, {} chunks, {} path bytes",
            footer_pointer,
            self.header.entry_count,
            self.header.chunk_count,
            self.header.path_index_size
        );
        Ok(())
    }
}
