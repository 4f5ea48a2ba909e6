//! Command implementations for the CLI tool.

use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use gdarc::{Archive, ArchiveOptions, ExtractOptions, OverwritePolicy, StorageMode};

use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::{create_formatter, humanize_bytes};
use crate::{OutputFormat, OverwriteMode};

/// Configuration for the extract command.
pub struct ExtractConfig<'a> {
    pub archive_path: &'a Path,
    pub output_dir: &'a Path,
    pub overwrite: OverwriteMode,
    pub verify: bool,
    pub format: OutputFormat,
}

/// Configuration for the add command.
pub struct AddConfig<'a> {
    pub archive_path: &'a Path,
    pub files: &'a [PathBuf],
    pub dest: &'a str,
    pub plain: bool,
    pub chunk_size: Option<usize>,
    pub quiet: bool,
}

/// New command implementation
pub fn new(archive_path: &Path, force: bool, quiet: bool) -> ExitCode {
    if archive_path.exists() && !force {
        eprintln!(
            "Error: {} already exists (use --force to replace it)",
            archive_path.display()
        );
        return ExitCode::BadArgs;
    }

    match Archive::create_path(archive_path) {
        Ok(archive) => {
            archive.close();
            if !quiet {
                println!("Created {}", archive_path.display());
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error creating archive: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// List command implementation
pub fn list(archive_path: &Path, technical: bool, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let archive = match open_read_only(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match archive.entries() {
        Ok(entries) => {
            print!("{}", formatter.format_list(&entries, technical));
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// Info command implementation
pub fn info(archive_path: &Path, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let archive = match open_read_only(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match archive.info() {
        Ok(info) => {
            print!("{}", formatter.format_info(&info));
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// Extract command implementation
pub fn extract(config: &ExtractConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let archive = match open_read_only(config.archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let overwrite_policy = match config.overwrite {
        OverwriteMode::Always => OverwritePolicy::Overwrite,
        OverwriteMode::Never => OverwritePolicy::Skip,
        OverwriteMode::Error => OverwritePolicy::Error,
    };
    let options = ExtractOptions::new()
        .overwrite(overwrite_policy)
        .verify_checksum(config.verify);

    let result = match archive.extract_to(config.output_dir, &options) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    print!("{}", formatter.format_extract_result(&result));

    if result.is_ok() {
        ExitCode::Success
    } else {
        ExitCode::Warning
    }
}

/// Test command implementation
pub fn test(archive_path: &Path, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let archive = match open_read_only(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = match archive.test() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    print!("{}", formatter.format_test_result(&result));

    if result.is_ok() {
        ExitCode::Success
    } else {
        ExitCode::BadArchive
    }
}

/// Add command implementation
pub fn add(config: &AddConfig<'_>) -> ExitCode {
    let dest = config.dest.trim_end_matches('/');
    if !dest.is_empty() && !gdarc::archive_path::is_valid(dest) {
        eprintln!("Error: invalid destination folder '{}'", config.dest);
        return ExitCode::BadArgs;
    }

    let all_files = collect_files(config.files, dest);
    if all_files.is_empty() {
        eprintln!("Error: No files to add to archive");
        return ExitCode::BadArgs;
    }

    let options = ArchiveOptions::new().chunk_size(config.chunk_size);
    let archive = match open_writable(config.archive_path, options) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let mode = if config.plain {
        StorageMode::Plain
    } else {
        StorageMode::Lz4Compressed
    };

    let mut added = 0usize;
    let mut total_size = 0u64;
    let mut packed_size = 0u64;
    let mut had_warning = false;

    for (disk_path, entry_path) in &all_files {
        let data = match std::fs::read(disk_path) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", disk_path.display(), e);
                had_warning = true;
                continue;
            }
        };

        match archive.create_entry(entry_path, &data, mode) {
            Ok(entry) => {
                added += 1;
                total_size += u64::from(entry.plain_size());
                packed_size += u64::from(entry.compressed_size());
            }
            Err(e @ gdarc::Error::InvalidPath { .. }) => {
                eprintln!("Warning: Skipping {}: {}", disk_path.display(), e);
                had_warning = true;
            }
            Err(e) => {
                eprintln!("Error adding {}: {}", disk_path.display(), e);
                return error_to_exit_code(&e);
            }
        }
    }

    if !config.quiet {
        println!(
            "Added {} files ({} -> {})",
            added,
            humanize_bytes(total_size),
            humanize_bytes(packed_size)
        );
    }

    if had_warning {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}

/// Remove command implementation
pub fn remove(archive_path: &Path, paths: &[String], quiet: bool) -> ExitCode {
    let archive = match open_writable(archive_path, ArchiveOptions::new()) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let mut missing = 0usize;
    for path in paths {
        let entry = match archive.find(path) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                eprintln!("Warning: {} not found", path);
                missing += 1;
                continue;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return error_to_exit_code(&e);
            }
        };

        if let Err(e) = archive.delete_entry(entry) {
            eprintln!("Error removing {}: {}", path, e);
            return error_to_exit_code(&e);
        }
        if !quiet {
            println!("Removed {}", path);
        }
    }

    if missing > 0 {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}

/// Move command implementation
pub fn rename(archive_path: &Path, from: &str, to: &str, folder: bool, quiet: bool) -> ExitCode {
    let archive = match open_writable(archive_path, ArchiveOptions::new()) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if folder {
        return match archive.move_folder(from, to) {
            Ok(0) => {
                eprintln!("Warning: no entries under {}", from);
                ExitCode::Warning
            }
            Ok(n) => {
                if !quiet {
                    println!("Moved {} entries from {} to {}", n, from, to);
                }
                ExitCode::Success
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                error_to_exit_code(&e)
            }
        };
    }

    let mut entry = match archive.find(from) {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            eprintln!("Error: {} not found", from);
            return ExitCode::BadArgs;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    match archive.move_entry(&mut entry, to) {
        Ok(()) => {
            if !quiet {
                println!("Moved {} to {}", from, entry.path());
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// Maps the given files and directories to entry paths under `dest`.
fn collect_files(files: &[PathBuf], dest: &str) -> Vec<(PathBuf, String)> {
    let mut all_files = Vec::new();

    for path in files {
        if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        eprintln!("Warning: {}", e);
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                let rel_path = entry.path().strip_prefix(path).unwrap_or(entry.path());
                let segments: Vec<String> = rel_path
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                all_files.push((
                    entry.path().to_path_buf(),
                    format!("{}/{}", dest, segments.join("/")),
                ));
            }
        } else if path.is_file() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            all_files.push((path.clone(), format!("{}/{}", dest, name)));
        } else {
            eprintln!("Warning: {} does not exist", path.display());
        }
    }

    all_files
}

/// Helper to open an archive for reading only
fn open_read_only(path: &Path) -> Result<Archive<File>, ExitCode> {
    Archive::open_path_read_only(path).map_err(|e| {
        eprintln!("Error opening archive: {}", e);
        error_to_exit_code(&e)
    })
}

/// Helper to open an archive for editing
fn open_writable(path: &Path, options: ArchiveOptions) -> Result<Archive<File>, ExitCode> {
    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| {
            eprintln!("Error opening archive: {}", e);
            ExitCode::IoError
        })?;
    Archive::open_with_options(file, options).map_err(|e| {
        eprintln!("Error opening archive: {}", e);
        error_to_exit_code(&e)
    })
}
