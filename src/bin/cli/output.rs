//! Output formatting for CLI operations.

use gdarc::{ArchiveInfo, Entry, ExtractResult, TestResult};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a list of entries
    fn format_list(&self, entries: &[Entry], technical: bool) -> String;

    /// Formats archive information
    fn format_info(&self, info: &ArchiveInfo) -> String;

    /// Formats extraction results
    fn format_extract_result(&self, result: &ExtractResult) -> String;

    /// Formats test results
    fn format_test_result(&self, result: &TestResult) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_list(&self, entries: &[Entry], technical: bool) -> String {
        let mut output = String::new();

        if technical {
            output.push_str(&format!(
                "{:>12} {:>12} {:>6} {:>5} {:>19} {:>10} {}\n",
                "Size", "Packed", "Mode", "Parts", "Modified", "Adler32", "Name"
            ));
        } else {
            output.push_str(&format!("{:>12} {:>19} {}\n", "Size", "Modified", "Name"));
        }
        output.push_str(&"-".repeat(70));
        output.push('\n');

        let mut total_size: u64 = 0;

        for entry in entries {
            total_size += u64::from(entry.plain_size());
            let size_str = humanize_bytes(u64::from(entry.plain_size()));
            let mtime_str = format_timestamp(entry.file_time().as_system_time());

            if technical {
                let mode_str = entry
                    .storage_mode()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("?{}", entry.raw_storage_mode()));
                output.push_str(&format!(
                    "{:>12} {:>12} {:>6} {:>5} {:>19} {:>10} {}\n",
                    size_str,
                    humanize_bytes(u64::from(entry.compressed_size())),
                    mode_str,
                    entry.chunks().len(),
                    mtime_str,
                    format!("{:08X}", entry.adler32()),
                    entry.path()
                ));
            } else {
                output.push_str(&format!(
                    "{:>12} {:>19} {}\n",
                    size_str,
                    mtime_str,
                    entry.path()
                ));
            }
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{} files, {} total\n",
            entries.len(),
            humanize_bytes(total_size)
        ));

        output
    }

    fn format_info(&self, info: &ArchiveInfo) -> String {
        let mut output = String::new();

        output.push_str("Archive Information:\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!("  Entries:        {}\n", info.entry_count));
        output.push_str(&format!("  Chunks:         {}\n", info.chunk_count));
        output.push_str(&format!(
            "  Total size:     {}\n",
            humanize_bytes(info.total_size)
        ));
        output.push_str(&format!(
            "  Packed size:    {}\n",
            humanize_bytes(info.packed_size)
        ));
        output.push_str(&format!(
            "  Ratio:          {:.1}%\n",
            info.compression_ratio() * 100.0
        ));
        output.push_str(&format!(
            "  Space savings:  {:.1}%\n",
            info.space_savings() * 100.0
        ));
        output.push_str(&format!(
            "  Footer:         {:#x} ({})\n",
            info.footer_pointer,
            humanize_bytes(info.footer_size)
        ));

        output
    }

    fn format_extract_result(&self, result: &ExtractResult) -> String {
        let mut output = String::new();

        if result.is_ok() {
            output.push_str(&format!(
                "Extracted {} files ({})\n",
                result.entries_extracted,
                humanize_bytes(result.bytes_extracted)
            ));
            if result.entries_skipped > 0 {
                output.push_str(&format!("Skipped {} files\n", result.entries_skipped));
            }
        } else {
            output.push_str("Extraction completed with errors:\n");
            output.push_str(&format!("  Extracted: {}\n", result.entries_extracted));
            output.push_str(&format!("  Skipped:   {}\n", result.entries_skipped));
            output.push_str(&format!("  Failed:    {}\n", result.entries_failed));
            push_failures(&mut output, &result.failures);
        }

        output
    }

    fn format_test_result(&self, result: &TestResult) -> String {
        let mut output = String::new();

        if result.is_ok() {
            output.push_str(&format!(
                "OK - {} files tested, all passed\n",
                result.entries_tested
            ));
        } else {
            output.push_str("Test completed with errors:\n");
            output.push_str(&format!("  Tested: {}\n", result.entries_tested));
            output.push_str(&format!("  Passed: {}\n", result.entries_passed));
            output.push_str(&format!("  Failed: {}\n", result.entries_failed));
            push_failures(&mut output, &result.failures);
        }

        output
    }
}

fn push_failures(output: &mut String, failures: &[(String, String)]) {
    if !failures.is_empty() {
        output.push_str("\nFailures:\n");
        for (path, error) in failures {
            output.push_str(&format!("  {}: {}\n", path, error));
        }
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_list(&self, entries: &[Entry], _technical: bool) -> String {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "path": e.path(),
                    "size": e.plain_size(),
                    "packed_size": e.compressed_size(),
                    "storage_mode": e.raw_storage_mode(),
                    "chunks": e.chunks().len(),
                    "modified": e.file_time().as_unix_secs(),
                    "adler32": e.adler32(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_info(&self, info: &ArchiveInfo) -> String {
        let obj = json!({
            "entry_count": info.entry_count,
            "chunk_count": info.chunk_count,
            "total_size": info.total_size,
            "packed_size": info.packed_size,
            "compression_ratio": info.compression_ratio(),
            "space_savings": info.space_savings(),
            "footer_pointer": info.footer_pointer,
            "footer_size": info.footer_size,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_extract_result(&self, result: &ExtractResult) -> String {
        let obj = json!({
            "success": result.is_ok(),
            "entries_extracted": result.entries_extracted,
            "entries_skipped": result.entries_skipped,
            "entries_failed": result.entries_failed,
            "bytes_extracted": result.bytes_extracted,
            "failures": result.failures.iter().map(|(p, e)| json!({"path": p, "error": e})).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_test_result(&self, result: &TestResult) -> String {
        let obj = json!({
            "success": result.is_ok(),
            "entries_tested": result.entries_tested,
            "entries_passed": result.entries_passed,
            "entries_failed": result.entries_failed,
            "failures": result.failures.iter().map(|(p, e)| json!({"path": p, "error": e})).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Formats a SystemTime as a UTC datetime string
pub fn format_timestamp(time: SystemTime) -> String {
    let Ok(duration) = time.duration_since(UNIX_EPOCH) else {
        return "-".to_string();
    };
    let secs = duration.as_secs();
    let time_of_day = secs % 86400;
    let (year, month, day) = civil_from_days((secs / 86400) as i64);

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    )
}

/// Converts days since 1970-01-01 to a proleptic Gregorian date.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
