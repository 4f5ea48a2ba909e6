//! Reading entry payloads.

use std::io::{Read, Seek, SeekFrom};

use crate::codec::BlockCodec;
use crate::format::{DATA_START, Header, StorageMode};
use crate::{Error, Result};

use super::entry::{Chunk, StoredEntry};
use super::{Archive, Entry};

impl<S: Read + Seek> Archive<S> {
    /// Reads and, if needed, decompresses an entry's payload.
    ///
    /// The stored Adler-32 is not checked; compare
    /// [`checksum`](crate::checksum::checksum) of the result with
    /// [`Entry::adler32`] to detect corruption.
    pub fn read_entry(&self, entry: &Entry) -> Result<Vec<u8>> {
        self.with_state(|state| {
            let index = state.position(self.id, entry.id)?;
            let stored = &state.entries[index];
            read_stored(
                &mut state.stream,
                &state.header,
                stored,
                self.options.codec.as_ref(),
            )
        })
    }
}

/// Checks that `len` bytes at `offset` lie in the data region.
fn check_data_region(header: &Header, offset: u64, len: u64) -> Result<()> {
    let footer = header.chunk_index_pointer();
    if offset < DATA_START || offset + len > footer {
        return Err(Error::out_of_bounds(
            offset,
            format!(
                "{} byte block outside the data region {:#x}..{:#x}",
                len, DATA_START, footer
            ),
        ));
    }
    Ok(())
}

fn read_block<S: Read + Seek>(
    stream: &mut S,
    header: &Header,
    offset: u64,
    len: u32,
) -> Result<Vec<u8>> {
    check_data_region(header, offset, u64::from(len))?;
    let mut buf = vec![0u8; len as usize];
    stream.seek(SeekFrom::Start(offset))?;
    stream.read_exact(&mut buf)?;
    Ok(buf)
}

pub(crate) fn read_stored<S: Read + Seek>(
    stream: &mut S,
    header: &Header,
    stored: &StoredEntry,
    codec: &dyn BlockCodec,
) -> Result<Vec<u8>> {
    let record = &stored.record;
    match StorageMode::try_from(record.storage_mode)? {
        StorageMode::Plain => read_block(
            stream,
            header,
            u64::from(record.data_pointer),
            record.plain_size,
        ),
        StorageMode::Lz4Compressed => {
            let chunk_total: u64 = stored.chunks.iter().map(|c| u64::from(c.plain_size)).sum();
            if chunk_total != u64::from(record.plain_size) {
                return Err(Error::out_of_bounds(
                    u64::from(record.data_pointer),
                    format!(
                        "'{}' chunks hold {} plain bytes but the entry declares {}",
                        stored.path, chunk_total, record.plain_size
                    ),
                ));
            }
            for chunk in &stored.chunks {
                check_data_region(
                    header,
                    u64::from(chunk.data_pointer),
                    u64::from(chunk.compressed_size),
                )?;
            }

            let mut out = vec![0u8; record.plain_size as usize];
            let mut filled = 0usize;
            for chunk in &stored.chunks {
                filled += decode_chunk(stream, header, chunk, codec, &mut out[filled..])?;
            }
            if filled != out.len() {
                return Err(Error::Codec(format!(
                    "'{}' decoded to {} bytes, expected {}",
                    stored.path,
                    filled,
                    out.len()
                )));
            }
            Ok(out)
        }
    }
}

/// Decompresses one chunk into the front of `out`.
fn decode_chunk<S: Read + Seek>(
    stream: &mut S,
    header: &Header,
    chunk: &Chunk,
    codec: &dyn BlockCodec,
    out: &mut [u8],
) -> Result<usize> {
    let plain = chunk.plain_size as usize;
    if plain > out.len() {
        return Err(Error::out_of_bounds(
            u64::from(chunk.data_pointer),
            format!(
                "chunk holds {} plain bytes but only {} remain in the entry",
                plain,
                out.len()
            ),
        ));
    }
    let packed = read_block(
        stream,
        header,
        u64::from(chunk.data_pointer),
        chunk.compressed_size,
    )?;
    let n = codec.decompress(&packed, &mut out[..plain])?;
    if n != plain {
        return Err(Error::Codec(format!(
            "chunk at {:#x} decoded to {} bytes, expected {}",
            chunk.data_pointer, n, plain
        )));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::EntryRecord;
    use std::io::Cursor;

    #[test]
    fn test_check_data_region() {
        let header = Header {
            footer_pointer: 3000,
            ..Header::default()
        };
        assert!(check_data_region(&header, 2048, 952).is_ok());
        assert!(check_data_region(&header, 2048, 953).is_err());
        assert!(check_data_region(&header, 2047, 1).is_err());
    }

    #[test]
    fn test_unknown_storage_mode() {
        let header = Header::default();
        let stored = StoredEntry {
            serial: 0,
            path: "/x".into(),
            record: EntryRecord {
                storage_mode: 2,
                ..Default::default()
            },
            chunks: Vec::new(),
        };
        let err = read_stored(
            &mut Cursor::new(Vec::new()),
            &header,
            &stored,
            &crate::codec::Lz4Codec,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedStorageMode { mode: 2 }));
    }

    #[test]
    fn test_plain_read_outside_data_region() {
        let header = Header::default();
        let stored = StoredEntry {
            serial: 0,
            path: "/x".into(),
            record: EntryRecord {
                storage_mode: 1,
                data_pointer: 2048,
                compressed_size: 4,
                plain_size: 4,
                ..Default::default()
            },
            chunks: Vec::new(),
        };
        let err = read_stored(
            &mut Cursor::new(vec![0u8; 4096]),
            &header,
            &stored,
            &crate::codec::Lz4Codec,
        )
        .unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_chunk_sizes_checked_before_allocation() {
        let header = Header {
            footer_pointer: 4096,
            ..Header::default()
        };
        let stored = StoredEntry {
            serial: 0,
            path: "/a".into(),
            record: EntryRecord {
                storage_mode: 3,
                data_pointer: 2048,
                plain_size: 0xFFFF_FFF0,
                ..Default::default()
            },
            chunks: Vec::new(),
        };
        let err = read_stored(
            &mut Cursor::new(vec![0u8; 4096]),
            &header,
            &stored,
            &crate::codec::Lz4Codec,
        )
        .unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }), "{:?}", err);
    }
}
