//! Fuzz target for EntryPath::new with arbitrary string input.
//!
//! Every accepted path must map to a location under the extraction
//! directory: absolute, no empty segments, no `.` or `..` segments, no
//! separators or control characters inside a segment.
//!
//! Run with: cargo +nightly fuzz run archive_path

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(path_str) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(path) = gdarc::EntryPath::new(path_str) else {
        return;
    };

    assert!(path.as_str().starts_with('/'), "relative path accepted: {:?}", path);
    for segment in path.segments() {
        assert!(!segment.is_empty(), "empty segment in {:?}", path);
        assert!(
            segment != "." && segment != "..",
            "traversal segment in {:?}",
            path
        );
        assert!(
            !segment.contains('\\') && !segment.chars().any(char::is_control),
            "separator or control character in {:?}",
            path
        );
    }
});
