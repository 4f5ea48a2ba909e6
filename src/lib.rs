//! # gdarc
//!
//! A pure-Rust library for reading and editing ARC game asset packages.
//!
//! An ARC file stores many named files, raw or LZ4-compressed, in one
//! seekable file with an index at the end. Entries can be added, renamed
//! and deleted in place: only the index is rewritten, except when a delete
//! compacts the bytes that followed the removed payload.
//!
//! ## Quick Start
//!
//! ### Reading an Archive
//!
//! ```rust,no_run
//! use gdarc::{Archive, Result, checksum::checksum};
//!
//! fn main() -> Result<()> {
//!     let archive = Archive::open_path_read_only("resources.arc")?;
//!
//!     for entry in archive.entries()? {
//!         let data = archive.read_entry(&entry)?;
//!         let ok = checksum(&data) == entry.adler32();
//!         println!("{}: {} bytes{}", entry.path(), data.len(), if ok { "" } else { " (corrupt)" });
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Editing an Archive
//!
//! ```rust,no_run
//! use gdarc::{Archive, Result, StorageMode};
//!
//! fn main() -> Result<()> {
//!     let archive = Archive::create_path("new.arc")?;
//!
//!     let mut entry = archive.create_entry("/text/readme.txt", b"Hello", StorageMode::Lz4Compressed)?;
//!     archive.move_entry(&mut entry, "/docs/readme.txt")?;
//!     archive.move_folder("/docs", "/manual")?;
//!     archive.delete_entry(entry)?;
//!
//!     archive.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line interface tool |
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], which is an alias for
//! `std::result::Result<T, Error>`:
//!
//! ```rust,no_run
//! use gdarc::{Archive, Error};
//!
//! fn open_archive(path: &str) -> gdarc::Result<()> {
//!     match Archive::open_path(path) {
//!         Ok(archive) => {
//!             println!("Opened archive with {} entries", archive.len()?);
//!             Ok(())
//!         }
//!         Err(Error::Io(e)) => {
//!             eprintln!("I/O error: {}", e);
//!             Err(Error::Io(e))
//!         }
//!         Err(Error::InvalidFormat(msg)) => {
//!             eprintln!("Not an ARC file: {}", msg);
//!             Err(Error::InvalidFormat(msg))
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! # fn main() {}
//! ```
//!
//! ## Concurrency
//!
//! [`Archive`] serializes every operation behind one lock, so it can be
//! shared across threads (`Archive<S>: Sync` for `S: Send`). Operations on
//! the same archive never overlap.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod archive;
pub mod archive_path;
pub mod checksum;
pub mod codec;
pub mod error;
pub mod format;
pub mod timestamp;

pub use archive::{
    Archive, ArchiveInfo, ArchiveOptions, Chunk, Entry, ExtractOptions, ExtractResult,
    OverwritePolicy, TestResult, Truncate,
};
pub use archive_path::EntryPath;
pub use codec::{BlockCodec, Lz4Codec};
pub use error::{Error, Result};
pub use format::{Header, StorageMode};
pub use timestamp::Timestamp;
