//! Options for opening archives and extracting entries.

use std::sync::Arc;

use crate::codec::{BlockCodec, default_codec};

/// Default cap on the scratch buffer used when compacting after a delete.
pub const DEFAULT_MAX_SHIFT_BUFFER: usize = 4 * 1024 * 1024;

/// Options controlling how an [`Archive`](super::Archive) accesses its stream.
///
/// # Example
///
/// ```rust
/// use gdarc::ArchiveOptions;
///
/// let options = ArchiveOptions::new()
///     .max_shift_buffer(64 * 1024)
///     .chunk_size(Some(256 * 1024));
/// assert!(!options.is_read_only());
/// ```
#[derive(Clone)]
pub struct ArchiveOptions {
    /// Reject every mutating operation with `StreamCapability`.
    pub read_only: bool,
    /// Largest scratch buffer allocated while shifting bytes on delete.
    pub max_shift_buffer: usize,
    /// Split LZ4 entries into independent chunks of at most this many
    /// plain bytes. `None` stores every entry as a single chunk.
    pub chunk_size: Option<usize>,
    /// Block codec used for `Lz4Compressed` entries.
    pub codec: Arc<dyn BlockCodec>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            read_only: false,
            max_shift_buffer: DEFAULT_MAX_SHIFT_BUFFER,
            chunk_size: None,
            codec: default_codec(),
        }
    }
}

impl std::fmt::Debug for ArchiveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveOptions")
            .field("read_only", &self.read_only)
            .field("max_shift_buffer", &self.max_shift_buffer)
            .field("chunk_size", &self.chunk_size)
            .field("codec", &self.codec.name())
            .finish()
    }
}

impl ArchiveOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the archive read-only.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets the compaction buffer cap. Values below one byte are clamped.
    pub fn max_shift_buffer(mut self, bytes: usize) -> Self {
        self.max_shift_buffer = bytes.max(1);
        self
    }

    /// Sets the chunk size for new LZ4 entries. `Some(0)` means `None`.
    pub fn chunk_size(mut self, size: Option<usize>) -> Self {
        self.chunk_size = size.filter(|&n| n > 0);
        self
    }

    /// Replaces the block codec.
    pub fn codec(mut self, codec: Arc<dyn BlockCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Returns true if mutations are disabled.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// Policy for handling existing files during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Record a failure if the file exists.
    #[default]
    Error,
    /// Skip files that already exist.
    Skip,
    /// Overwrite existing files.
    Overwrite,
}

/// Options for [`Archive::extract_to`](super::Archive::extract_to).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Policy for handling existing files.
    pub overwrite: OverwritePolicy,
    /// Compare each entry's Adler-32 before writing it out.
    pub verify_checksum: bool,
    /// Set the file modification time from the entry's FileTime.
    pub preserve_time: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            overwrite: OverwritePolicy::default(),
            verify_checksum: true,
            preserve_time: true,
        }
    }
}

impl ExtractOptions {
    /// Creates extraction options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the overwrite policy.
    pub fn overwrite(mut self, policy: OverwritePolicy) -> Self {
        self.overwrite = policy;
        self
    }

    /// Enables or disables checksum verification.
    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    /// Enables or disables modification time restore.
    pub fn preserve_time(mut self, preserve: bool) -> Self {
        self.preserve_time = preserve;
        self
    }
}
