//! Error types for ARC archive operations.
//!
//! This module provides the [`Error`] enum which represents every failure
//! mode of the archive engine, along with a convenient [`Result<T>`] alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Nothing
//! is retried internally; every failure surfaces on the return path of the
//! call that caused it.
//!
//! ```rust,no_run
//! use gdarc::{Archive, Error};
//!
//! fn open_or_explain(path: &str) -> gdarc::Result<()> {
//!     match Archive::open_path_read_only(path) {
//!         Ok(archive) => {
//!             println!("{} entries", archive.len()?);
//!             Ok(())
//!         }
//!         Err(Error::InvalidFormat(msg)) => {
//!             eprintln!("Not an ARC file: {}", msg);
//!             Err(Error::InvalidFormat(msg))
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;

/// The main error type for ARC archive operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io], [`StreamCapability`][Self::StreamCapability] | Stream failures or missing capabilities |
/// | Format | [`InvalidFormat`][Self::InvalidFormat], [`UnsupportedStorageMode`][Self::UnsupportedStorageMode], [`SizeMismatch`][Self::SizeMismatch] | Not an ARC file, or an unsupported one |
/// | Corruption | [`OutOfBounds`][Self::OutOfBounds], [`ChecksumMismatch`][Self::ChecksumMismatch] | Damaged index or payload |
/// | Usage | [`InvalidPath`][Self::InvalidPath], [`NotOwned`][Self::NotOwned], [`Disposed`][Self::Disposed] | Caller mistakes |
/// | Limits | [`LimitExceeded`][Self::LimitExceeded] | Archive outgrew the 32-bit on-disk fields |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream lacks a capability the operation needs.
    ///
    /// Returned by mutating operations on an archive opened read-only.
    #[error("Stream capability missing: {0}")]
    StreamCapability(String),

    /// The stream is not a supported ARC archive.
    ///
    /// Covers short files, a bad magic token and unsupported format versions.
    /// The stream is left untouched when this is returned from `open`.
    #[error("Invalid ARC format: {0}")]
    InvalidFormat(String),

    /// An entry uses a storage mode this crate does not understand.
    #[error("Unsupported storage mode: {mode}")]
    UnsupportedStorageMode {
        /// The raw storage mode value.
        mode: u32,
    },

    /// A fixed-size record was decoded from a buffer of the wrong length.
    #[error("{record} record must be {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Name of the record type.
        record: &'static str,
        /// The declared record size.
        expected: usize,
        /// The length of the supplied buffer.
        actual: usize,
    },

    /// A path does not satisfy the absolute entry path grammar.
    #[error("Invalid entry path '{path}': {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// The entry does not belong to this archive, or was already deleted.
    #[error("Entry is not owned by this archive")]
    NotOwned,

    /// Index math points outside the region it must stay in.
    ///
    /// This indicates a corrupt index table.
    #[error("Out of bounds at offset {offset:#x}: {reason}")]
    OutOfBounds {
        /// The offending byte offset.
        offset: u64,
        /// A description of the violated bound.
        reason: String,
    },

    /// The archive was closed.
    #[error("Archive has been closed")]
    Disposed,

    /// The compression codec failed.
    #[error("Codec error: {0}")]
    Codec(String),

    /// An offset or size no longer fits the on-disk field width.
    #[error("Format limit exceeded: {0}")]
    LimitExceeded(String),

    /// Data read back does not match the stored Adler-32.
    ///
    /// The engine never returns this from `read_entry`; only the
    /// verification helpers do.
    #[error("Checksum mismatch for '{path}': expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch {
        /// Path of the entry.
        path: String,
        /// Adler-32 stored in the entry table.
        expected: u32,
        /// Adler-32 of the data that was read.
        actual: u32,
    },
}

/// A specialized Result type for ARC archive operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if the stream is not a readable ARC archive.
    pub fn is_invalid_format(&self) -> bool {
        matches!(
            self,
            Error::InvalidFormat(_)
                | Error::UnsupportedStorageMode { .. }
                | Error::SizeMismatch { .. }
        )
    }

    /// Returns `true` if this error indicates a damaged archive.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::OutOfBounds { .. } | Error::ChecksumMismatch { .. } | Error::Codec(_)
        )
    }

    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_bounds(offset: u64, reason: impl Into<String>) -> Self {
        Error::OutOfBounds {
            offset,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_format() {
        let err = Error::InvalidFormat("bad magic".into());
        assert_eq!(err.to_string(), "Invalid ARC format: bad magic");
        assert!(err.is_invalid_format());
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(0x1234, "chunk slice past table end");
        assert!(err.to_string().contains("0x1234"));
        assert!(err.to_string().contains("chunk slice past table end"));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_size_mismatch() {
        let err = Error::SizeMismatch {
            record: "Header",
            expected: 20,
            actual: 19,
        };
        assert_eq!(err.to_string(), "Header record must be 20 bytes, got 19");
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_checksum_mismatch_display() {
        let err = Error::ChecksumMismatch {
            path: "/a.txt".into(),
            expected: 1,
            actual: 0x0620_0213,
        };
        let msg = err.to_string();
        assert!(msg.contains("/a.txt"));
        assert!(msg.contains("0x00000001"));
        assert!(msg.contains("0x06200213"));
    }

    #[test]
    fn test_invalid_path() {
        let err = Error::invalid_path("/bad?path", "reserved character '?'");
        assert!(matches!(err, Error::InvalidPath { .. }));
        assert!(err.to_string().contains("/bad?path"));
    }
}
