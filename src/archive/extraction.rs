//! Extraction of entries to the filesystem.

use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::archive_path::EntryPath;
use crate::checksum::checksum;
use crate::timestamp::Timestamp;
use crate::{Error, Result};

use super::decompression::read_stored;
use super::entry::StoredEntry;
use super::{Archive, ArchiveState, ExtractOptions, ExtractResult, OverwritePolicy};

/// Outcome of extracting a single entry.
enum Extracted {
    Written(u64),
    Skipped,
}

/// Maps an entry path to a location under `dest`.
///
/// The path is checked against the entry grammar again, which rules out
/// `..` segments and separators, so the result never escapes `dest`.
fn destination_path(dest: &Path, entry_path: &str) -> Result<PathBuf> {
    let path = EntryPath::new(entry_path)?;
    let mut target = dest.to_path_buf();
    for segment in path.segments() {
        target.push(segment);
    }
    Ok(target)
}

impl<S: Read + Seek> Archive<S> {
    /// Extracts every entry into `dest`, creating it if needed.
    ///
    /// The leading `/` of each entry path is dropped, so `/a/b.txt` lands
    /// at `dest/a/b.txt`. Per-entry failures are collected in the result.
    pub fn extract_to(
        &self,
        dest: impl AsRef<Path>,
        options: &ExtractOptions,
    ) -> Result<ExtractResult> {
        let dest = dest.as_ref();
        fs::create_dir_all(dest)?;

        self.with_state(|state| {
            let mut result = ExtractResult::default();
            for index in 0..state.entries.len() {
                let path = state.entries[index].path.clone();
                match self.extract_one(state, index, dest, options) {
                    Ok(Extracted::Written(bytes)) => {
                        result.entries_extracted += 1;
                        result.bytes_extracted += bytes;
                    }
                    Ok(Extracted::Skipped) => result.entries_skipped += 1,
                    Err(e) => {
                        log::warn!("Failed to extract {}: {}", path, e);
                        result.entries_failed += 1;
                        result.failures.push((path, e.to_string()));
                    }
                }
            }
            log::debug!(
                "Extracted {} entries ({} bytes) to {}",
                result.entries_extracted,
                result.bytes_extracted,
                dest.display()
            );
            Ok(result)
        })
    }

    fn extract_one(
        &self,
        state: &mut ArchiveState<S>,
        index: usize,
        dest: &Path,
        options: &ExtractOptions,
    ) -> Result<Extracted> {
        let stored: &StoredEntry = &state.entries[index];
        let target = destination_path(dest, &stored.path)?;

        if target.exists() {
            match options.overwrite {
                OverwritePolicy::Error => {
                    return Err(Error::Io(std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        format!("file already exists: {}", target.display()),
                    )));
                }
                OverwritePolicy::Skip => return Ok(Extracted::Skipped),
                OverwritePolicy::Overwrite => {}
            }
        }

        let data = read_stored(
            &mut state.stream,
            &state.header,
            stored,
            self.options.codec.as_ref(),
        )?;

        if options.verify_checksum {
            let actual = checksum(&data);
            if actual != stored.record.adler32 {
                return Err(Error::ChecksumMismatch {
                    path: stored.path.clone(),
                    expected: stored.record.adler32,
                    actual,
                });
            }
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &data)?;

        if options.preserve_time {
            let time = Timestamp::from_filetime(stored.record.file_time).as_system_time();
            let mtime = filetime::FileTime::from_system_time(time);
            if let Err(e) = filetime::set_file_mtime(&target, mtime) {
                log::warn!(
                    "Failed to set modification time on '{}': {}",
                    target.display(),
                    e
                );
            }
        }

        Ok(Extracted::Written(data.len() as u64))
    }
}
