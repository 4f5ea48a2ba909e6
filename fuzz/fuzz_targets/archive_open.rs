//! Fuzz target for Archive::open with arbitrary byte input.
//!
//! Exercises header and footer parsing, then reads every entry so that
//! chunk bounds checks and LZ4 decoding see hostile input too.
//!
//! Run with: cargo +nightly fuzz run archive_open

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Anything shorter than the data region start is rejected up front.
    let Ok(archive) = gdarc::Archive::open(Cursor::new(data)) else {
        return;
    };
    let Ok(entries) = archive.entries() else {
        return;
    };
    for entry in &entries {
        if let Ok(bytes) = archive.read_entry(entry) {
            assert_eq!(bytes.len(), entry.plain_size() as usize);
        }
    }
    let _ = archive.test();
});
