//! Opening, validating and creating archives.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::format::{
    CHUNK_SIZE, ChunkRecord, DATA_START, ENTRY_SIZE, EntryRecord, HEADER_OFFSET, HEADER_SIZE,
    Header, MAGIC, VERSION,
};
use crate::{Error, Result};

use super::entry::StoredEntry;
use super::{Archive, ArchiveOptions, ArchiveState, Truncate};

impl Archive<File> {
    /// Opens an archive file for reading and writing.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::open(file)
    }

    /// Opens an archive file read-only.
    ///
    /// Mutating operations fail with [`Error::StreamCapability`].
    pub fn open_path_read_only(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::open_with_options(file, ArchiveOptions::default().read_only(true))
    }

    /// Creates a new, empty archive file, replacing any existing file.
    pub fn create_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::create(file)
    }
}

impl<S: Read + Seek> Archive<S> {
    /// Opens an archive from a seekable stream.
    pub fn open(stream: S) -> Result<Self> {
        Self::open_with_options(stream, ArchiveOptions::default())
    }

    /// Opens an archive from a seekable stream with custom options.
    ///
    /// Validation only reads; a stream that is not an ARC archive is left
    /// untouched.
    pub fn open_with_options(mut stream: S, options: ArchiveOptions) -> Result<Self> {
        let stream_len = validate(&mut stream)?;
        let state = parse(stream, stream_len)?;
        log::debug!(
            "Opened archive: {} entries, {} chunks, footer at {:#x}",
            state.header.entry_count,
            state.header.chunk_count,
            state.header.footer_pointer
        );
        Ok(Self::from_state(state, options))
    }
}

impl<S: Read + Write + Seek + Truncate> Archive<S> {
    /// Writes an empty archive into `stream` and opens it.
    ///
    /// Any previous contents of the stream are discarded.
    pub fn create(stream: S) -> Result<Self> {
        Self::create_with_options(stream, ArchiveOptions::default())
    }

    /// Writes an empty archive into `stream` and opens it with custom
    /// options.
    pub fn create_with_options(mut stream: S, options: ArchiveOptions) -> Result<Self> {
        write_empty(&mut stream)?;
        log::debug!("Created empty archive");
        Self::open_with_options(stream, options)
    }
}

/// Writes magic, version, an empty header and zero padding up to the data
/// region.
fn write_empty<S: Write + Seek + Truncate>(stream: &mut S) -> Result<()> {
    stream.truncate(0)?;
    let mut preamble = vec![0u8; DATA_START as usize];
    preamble[..4].copy_from_slice(MAGIC);
    preamble[4..8].copy_from_slice(&VERSION.to_le_bytes());
    let header_at = HEADER_OFFSET as usize;
    preamble[header_at..header_at + HEADER_SIZE].copy_from_slice(&Header::default().to_bytes());
    stream.seek(SeekFrom::Start(0))?;
    stream.write_all(&preamble)?;
    stream.flush()?;
    Ok(())
}

/// Checks length, magic and version, returning the stream length.
fn validate<S: Read + Seek>(stream: &mut S) -> Result<u64> {
    let len = stream.seek(SeekFrom::End(0))?;
    if len < DATA_START {
        return Err(Error::InvalidFormat(format!(
            "file is {} bytes, shorter than the {} byte minimum",
            len, DATA_START
        )));
    }

    let mut preamble = [0u8; 8];
    stream.seek(SeekFrom::Start(0))?;
    stream.read_exact(&mut preamble)?;

    if &preamble[..4] != MAGIC {
        return Err(Error::InvalidFormat(format!(
            "bad magic {:02x?}",
            &preamble[..4]
        )));
    }

    let version = u32::from_le_bytes([preamble[4], preamble[5], preamble[6], preamble[7]]);
    if version != VERSION {
        return Err(Error::InvalidFormat(format!(
            "unsupported version {} (expected {})",
            version, VERSION
        )));
    }

    Ok(len)
}

/// Reads `len` bytes at `offset`.
fn read_region<S: Read + Seek>(stream: &mut S, offset: u64, len: u64) -> Result<Vec<u8>> {
    let len = usize::try_from(len)
        .map_err(|_| Error::out_of_bounds(offset, "region does not fit in memory"))?;
    let mut buf = vec![0u8; len];
    stream.seek(SeekFrom::Start(offset))?;
    stream.read_exact(&mut buf)?;
    Ok(buf)
}

/// Parses the header and the three index tables.
fn parse<S: Read + Seek>(mut stream: S, stream_len: u64) -> Result<ArchiveState<S>> {
    let mut header_bytes = [0u8; HEADER_SIZE];
    stream.seek(SeekFrom::Start(HEADER_OFFSET))?;
    stream.read_exact(&mut header_bytes)?;
    let header = Header::from_bytes(&header_bytes)?;

    let footer = header.chunk_index_pointer();
    if footer < DATA_START {
        return Err(Error::out_of_bounds(footer, "footer starts inside the preamble"));
    }
    let footer_end = header.expected_len();
    if footer_end > stream_len {
        return Err(Error::out_of_bounds(
            footer_end,
            format!("footer runs past the end of the {} byte stream", stream_len),
        ));
    }
    if footer_end < stream_len {
        log::warn!(
            "{} trailing bytes after the entry table",
            stream_len - footer_end
        );
    }

    let chunk_table = read_region(&mut stream, footer, u64::from(header.chunk_index_size))?;
    let path_table = read_region(
        &mut stream,
        header.path_index_pointer(),
        u64::from(header.path_index_size),
    )?;
    let entry_table = read_region(
        &mut stream,
        header.entry_index_pointer(),
        header.entry_index_size(),
    )?;

    let mut state = ArchiveState::new(stream, header);
    for (i, raw) in entry_table.chunks_exact(ENTRY_SIZE).enumerate() {
        let record = EntryRecord::from_bytes(raw)?;
        let path = entry_path(&header, &record, &path_table)?;
        let chunks = entry_chunks(&header, &record, &chunk_table)?;
        log::trace!("Entry {}: {} ({} chunks)", i, path, chunks.len());
        let serial = state.next_serial();
        state.entries.push(StoredEntry {
            serial,
            path,
            record,
            chunks,
        });
    }

    Ok(state)
}

/// Slices an entry's path out of the path table.
fn entry_path(header: &Header, record: &EntryRecord, path_table: &[u8]) -> Result<String> {
    let start = u64::from(record.path_offset);
    let end = start + u64::from(record.path_length);
    if end > path_table.len() as u64 {
        return Err(Error::out_of_bounds(
            header.path_index_pointer() + start,
            format!(
                "path slice {}..{} outside the {} byte path table",
                start,
                end,
                path_table.len()
            ),
        ));
    }
    Ok(String::from_utf8_lossy(&path_table[start as usize..end as usize]).into_owned())
}

/// Decodes an entry's slice of the chunk table.
fn entry_chunks(
    header: &Header,
    record: &EntryRecord,
    chunk_table: &[u8],
) -> Result<Vec<ChunkRecord>> {
    let start = u64::from(record.chunk_offset) * CHUNK_SIZE as u64;
    let end = start + u64::from(record.chunk_count) * CHUNK_SIZE as u64;
    if end > chunk_table.len() as u64 {
        return Err(Error::out_of_bounds(
            header.chunk_index_pointer() + start,
            format!(
                "chunks {}..{} outside the {} record chunk table",
                record.chunk_offset,
                u64::from(record.chunk_offset) + u64::from(record.chunk_count),
                chunk_table.len() / CHUNK_SIZE
            ),
        ));
    }
    chunk_table[start as usize..end as usize]
        .chunks_exact(CHUNK_SIZE)
        .map(ChunkRecord::from_bytes)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn empty_archive_bytes() -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        write_empty(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_write_empty_layout() {
        let bytes = empty_archive_bytes();
        assert_eq!(bytes.len(), 2048);
        assert_eq!(&bytes[..4], b"ARC\0");
        assert_eq!(&bytes[4..8], &3u32.to_le_bytes());
        assert_eq!(&bytes[24..28], &2048u32.to_le_bytes());
        assert!(bytes[8..24].iter().all(|&b| b == 0));
        assert!(bytes[28..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_create_truncates_previous_contents() {
        let archive = Archive::create(Cursor::new(vec![0xFFu8; 5000])).unwrap();
        let bytes = archive.into_inner().unwrap().into_inner();
        assert_eq!(bytes, empty_archive_bytes());
    }

    #[test]
    fn test_open_empty() {
        let archive = Archive::open(Cursor::new(empty_archive_bytes())).unwrap();
        assert!(archive.is_empty().unwrap());
        assert_eq!(archive.header().unwrap(), Header::default());
    }

    #[test]
    fn test_validate_short_stream() {
        let bytes = empty_archive_bytes()[..2047].to_vec();
        let err = Archive::open(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_validate_bad_magic() {
        let mut bytes = empty_archive_bytes();
        bytes[0] = b'Z';
        assert!(matches!(
            Archive::open(Cursor::new(bytes)),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_validate_bad_version() {
        let mut bytes = empty_archive_bytes();
        bytes[4] = 2;
        let err = Archive::open(Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("unsupported version 2"));
    }

    #[test]
    fn test_footer_past_end() {
        let mut bytes = empty_archive_bytes();
        // One entry declared, none stored.
        bytes[8..12].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(
            Archive::open(Cursor::new(bytes)),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_footer_inside_preamble() {
        let mut bytes = empty_archive_bytes();
        bytes[24..28].copy_from_slice(&100u32.to_le_bytes());
        assert!(matches!(
            Archive::open(Cursor::new(bytes)),
            Err(Error::OutOfBounds { offset: 100, .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_tolerated() {
        let mut bytes = empty_archive_bytes();
        bytes.extend_from_slice(&[1, 2, 3]);
        let archive = Archive::open(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len().unwrap(), 0);
    }

    #[test]
    fn test_entry_chunk_slice_out_of_bounds() {
        let header = Header {
            chunk_count: 1,
            chunk_index_size: 12,
            ..Header::default()
        };
        let record = EntryRecord {
            chunk_count: 2,
            ..Default::default()
        };
        let err = entry_chunks(&header, &record, &[0u8; 12]).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_entry_path_slice_out_of_bounds() {
        let header = Header::default();
        let record = EntryRecord {
            path_offset: 2,
            path_length: 4,
            ..Default::default()
        };
        assert!(entry_path(&header, &record, b"/abc\0").is_err());
        let record = EntryRecord {
            path_offset: 0,
            path_length: 4,
            ..Default::default()
        };
        assert_eq!(entry_path(&header, &record, b"/abc\0").unwrap(), "/abc");
    }
}
