//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::Cursor;

use gdarc::{Archive, StorageMode, checksum::checksum};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub type MemArchive = Archive<Cursor<Vec<u8>>>;

/// Creates an empty in-memory archive.
pub fn new_archive() -> MemArchive {
    Archive::create(Cursor::new(Vec::new())).expect("Failed to create archive")
}

/// Creates an in-memory archive holding `entries` and returns its bytes.
pub fn create_archive(entries: &[(&str, &[u8], StorageMode)]) -> Vec<u8> {
    let archive = new_archive();
    for (path, data, mode) in entries {
        archive
            .create_entry(path, data, *mode)
            .expect("Failed to create entry");
    }
    archive
        .into_inner()
        .expect("Archive closed unexpectedly")
        .into_inner()
}

/// Deterministic pseudo-random bytes.
pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);
    data
}

/// Highly compressible text.
pub fn compressible(len: usize) -> Vec<u8> {
    b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

/// One entry of a hand-assembled archive.
pub struct RawEntry {
    pub path: Vec<u8>,
    pub storage_mode: u32,
    /// Stored bytes and plain size of each chunk.
    pub chunks: Vec<(Vec<u8>, u32)>,
    pub adler32: u32,
}

impl RawEntry {
    /// A plain single-chunk entry.
    pub fn plain(path: &str, data: &[u8]) -> Self {
        Self {
            path: path.as_bytes().to_vec(),
            storage_mode: 1,
            chunks: vec![(data.to_vec(), data.len() as u32)],
            adler32: checksum(data),
        }
    }

    /// An LZ4 entry with one chunk per piece of `pieces`.
    pub fn lz4(path: &str, pieces: &[&[u8]]) -> Self {
        let plain: Vec<u8> = pieces.concat();
        Self {
            path: path.as_bytes().to_vec(),
            storage_mode: 3,
            chunks: pieces
                .iter()
                .map(|p| (lz4_flex::block::compress(p), p.len() as u32))
                .collect(),
            adler32: checksum(&plain),
        }
    }
}

/// Assembles an archive byte-by-byte without going through the engine.
///
/// Payloads are laid out back to back from offset 2048, then the chunk,
/// path and entry tables follow.
pub fn build_raw_archive(entries: &[RawEntry]) -> Vec<u8> {
    let mut out = vec![0u8; 2048];
    out[..4].copy_from_slice(b"ARC\0");
    out[4..8].copy_from_slice(&3u32.to_le_bytes());

    let mut chunk_table = Vec::new();
    let mut path_table = Vec::new();
    let mut entry_table = Vec::new();
    let mut chunk_index = 0u32;

    for entry in entries {
        let first = out.len() as u32;
        let mut packed = 0u32;
        let mut plain = 0u32;
        for (stored, plain_size) in &entry.chunks {
            chunk_table.extend_from_slice(&(out.len() as u32).to_le_bytes());
            chunk_table.extend_from_slice(&(stored.len() as u32).to_le_bytes());
            chunk_table.extend_from_slice(&plain_size.to_le_bytes());
            out.extend_from_slice(stored);
            packed += stored.len() as u32;
            plain += plain_size;
        }

        let path_offset = path_table.len() as u32;
        path_table.extend_from_slice(&entry.path);
        path_table.push(0);

        for field in [entry.storage_mode, first, packed, plain, entry.adler32] {
            entry_table.extend_from_slice(&field.to_le_bytes());
        }
        entry_table.extend_from_slice(&0x01D0_0000_0000_0000u64.to_le_bytes());
        for field in [
            entry.chunks.len() as u32,
            chunk_index,
            entry.path.len() as u32,
            path_offset,
        ] {
            entry_table.extend_from_slice(&field.to_le_bytes());
        }
        chunk_index += entry.chunks.len() as u32;
    }

    let footer = out.len() as u32;
    let header = [
        entries.len() as u32,
        chunk_index,
        chunk_table.len() as u32,
        path_table.len() as u32,
        footer,
    ];
    for (i, field) in header.iter().enumerate() {
        let at = 8 + i * 4;
        out[at..at + 4].copy_from_slice(&field.to_le_bytes());
    }

    out.extend_from_slice(&chunk_table);
    out.extend_from_slice(&path_table);
    out.extend_from_slice(&entry_table);
    out
}

/// Footer size for the given entries: chunk + path + entry tables.
pub fn footer_size(archive: &MemArchive) -> u64 {
    let header = archive.header().expect("archive open");
    header.expected_len() - header.chunk_index_pointer()
}
