//! Round-trip tests: create entries, reopen, read back.

mod common;

use std::io::Cursor;

use gdarc::checksum::checksum;
use gdarc::{Archive, ArchiveOptions, StorageMode};

use common::{RawEntry, build_raw_archive, compressible, new_archive, random_bytes};

#[test]
fn test_new_archive_layout() {
    let archive = new_archive();
    assert_eq!(archive.len().unwrap(), 0);

    let bytes = archive.into_inner().unwrap().into_inner();
    assert_eq!(bytes.len(), 2048);
    assert!(bytes[28..2048].iter().all(|&b| b == 0));
}

#[test]
fn test_hello_plain_scenario() {
    let archive = new_archive();
    let entry = archive
        .create_entry("/a/b.txt", b"hello", StorageMode::Plain)
        .unwrap();

    assert_eq!(archive.len().unwrap(), 1);
    assert_eq!(entry.path(), "/a/b.txt");
    assert_eq!(archive.read_entry(&entry).unwrap(), b"hello");
    assert_eq!(entry.adler32(), checksum(b"hello"));
}

#[test]
fn test_plain_and_lz4_roundtrip_after_reopen() {
    let text = compressible(50_000);
    let noise = random_bytes(10_000, 7);

    let archive = new_archive();
    archive.create_entry("/text.txt", &text, StorageMode::Lz4Compressed).unwrap();
    archive.create_entry("/noise.bin", &noise, StorageMode::Plain).unwrap();
    archive.create_entry("/empty", b"", StorageMode::Lz4Compressed).unwrap();
    archive.create_entry("/empty-plain", b"", StorageMode::Plain).unwrap();
    let bytes = archive.into_inner().unwrap().into_inner();

    let archive = Archive::open(Cursor::new(bytes)).unwrap();
    let entries = archive.entries().unwrap();
    assert_eq!(entries.len(), 4);

    let text_entry = &entries[0];
    assert!(text_entry.is_compressed());
    assert!(text_entry.compressed_size() < text_entry.plain_size());
    assert_eq!(archive.read_entry(text_entry).unwrap(), text);
    assert_eq!(archive.read_entry(&entries[1]).unwrap(), noise);
    assert!(archive.read_entry(&entries[2]).unwrap().is_empty());
    assert!(archive.read_entry(&entries[3]).unwrap().is_empty());

    for entry in &entries {
        let data = archive.read_entry(entry).unwrap();
        assert_eq!(data.len() as u32, entry.plain_size());
        assert_eq!(checksum(&data), entry.adler32());
    }
}

#[test]
fn test_header_invariant_holds_after_each_create() {
    let archive = new_archive();
    for i in 0..20 {
        let data = random_bytes(i * 37, i as u64);
        archive
            .create_entry(&format!("/dir{}/file{}.bin", i % 3, i), &data, StorageMode::Plain)
            .unwrap();
        let header = archive.header().unwrap();
        assert_eq!(header.entry_count as usize, i + 1);
        assert!(header.chunk_table_consistent());
    }
    let header = archive.header().unwrap();
    let bytes = archive.into_inner().unwrap().into_inner();
    assert_eq!(bytes.len() as u64, header.expected_len());
}

#[test]
fn test_chunked_entries_roundtrip() {
    let options = ArchiveOptions::new().chunk_size(Some(4096));
    let archive = Archive::create_with_options(Cursor::new(Vec::new()), options).unwrap();
    let data = compressible(20_000);
    let entry = archive
        .create_entry("/chunked.txt", &data, StorageMode::Lz4Compressed)
        .unwrap();
    assert_eq!(entry.chunks().len(), 5);
    let bytes = archive.into_inner().unwrap().into_inner();

    // Any reader handles multi-chunk entries, whatever the writer's options.
    let archive = Archive::open(Cursor::new(bytes)).unwrap();
    let entry = archive.find("/chunked.txt").unwrap().unwrap();
    assert_eq!(entry.chunks().len(), 5);
    assert_eq!(archive.read_entry(&entry).unwrap(), data);
}

#[test]
fn test_reads_hand_assembled_archive() {
    let part1 = compressible(3000);
    let part2 = random_bytes(500, 1);
    let bytes = build_raw_archive(&[
        RawEntry::plain("/records/a.dbr", b"plain payload"),
        RawEntry::lz4("/records/b.dbr", &[part1.as_slice(), part2.as_slice()]),
    ]);

    let archive = Archive::open(Cursor::new(bytes)).unwrap();
    let entries = archive.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].path(), "/records/a.dbr");
    assert_eq!(archive.read_entry(&entries[0]).unwrap(), b"plain payload");

    assert_eq!(entries[1].chunks().len(), 2);
    let mut expected = part1.clone();
    expected.extend_from_slice(&part2);
    assert_eq!(archive.read_entry(&entries[1]).unwrap(), expected);
    assert!(archive.test().unwrap().is_ok());
}

#[test]
fn test_file_backed_archive() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("assets.arc");

    let archive = Archive::create_path(&path).unwrap();
    archive
        .create_entry("/ui/icon.tex", &random_bytes(1234, 3), StorageMode::Lz4Compressed)
        .unwrap();
    archive.close();

    let archive = Archive::open_path_read_only(&path).unwrap();
    assert!(archive.is_read_only());
    let entry = archive.find("/ui/icon.tex").unwrap().unwrap();
    assert_eq!(archive.read_entry(&entry).unwrap(), random_bytes(1234, 3));

    let header = archive.header().unwrap();
    assert_eq!(
        std::fs::metadata(&path).unwrap().len(),
        header.expected_len()
    );
}

#[test]
fn test_archive_shared_between_threads() {
    let archive = new_archive();
    std::thread::scope(|s| {
        for t in 0..4 {
            let archive = &archive;
            s.spawn(move || {
                for i in 0..10 {
                    let data = random_bytes(100 + i, t * 100 + i as u64);
                    let entry = archive
                        .create_entry(&format!("/t{}/{}", t, i), &data, StorageMode::Lz4Compressed)
                        .unwrap();
                    assert_eq!(archive.read_entry(&entry).unwrap(), data);
                }
            });
        }
    });
    assert_eq!(archive.len().unwrap(), 40);
    assert!(archive.test().unwrap().is_ok());
}
