//! Progress record persistence.
//!
//! # Format
//!
//! ```text
//! LastPushDate: 2026-03-05
//! LastPushTime: 14:30:00
//! LastPushSuccess: True
//! DayNumber: 5
//! TotalDays: 30
//! FilesPushed: 23
//! TotalFiles: 120
//! ```
//!
//! Parsing is tolerant: keys are matched case-insensitively, unknown keys and
//! malformed lines are ignored, and a bad value keeps the field's default.
//! The document is always rewritten in full.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};

use crate::error::ProgressError;
use crate::types::{DayNumber, ProgressRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

// ---------------------------------------------------------------------------
// Parse / render
// ---------------------------------------------------------------------------

/// Parse a progress document. Never fails; missing keys keep their defaults.
pub fn parse(text: &str) -> ProgressRecord {
    let mut record = ProgressRecord::default();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "lastpushdate" => {
                record.last_push_date = parse_or_keep(&key, value, record.last_push_date, |v| {
                    NaiveDate::parse_from_str(v, DATE_FORMAT).ok().map(Some)
                });
            }
            "lastpushtime" => {
                record.last_push_time = parse_or_keep(&key, value, record.last_push_time, |v| {
                    NaiveTime::parse_from_str(v, TIME_FORMAT)
                        .or_else(|_| NaiveTime::parse_from_str(v, "%H:%M"))
                        .ok()
                        .map(Some)
                });
            }
            "lastpushsuccess" => {
                record.last_push_success =
                    parse_or_keep(&key, value, record.last_push_success, parse_bool);
            }
            "daynumber" => {
                record.day_number = parse_or_keep(&key, value, record.day_number, |v| {
                    v.parse::<u32>().ok().map(DayNumber)
                });
            }
            "totaldays" => {
                record.total_days =
                    parse_or_keep(&key, value, record.total_days, |v| v.parse().ok());
            }
            "filespushed" => {
                record.files_pushed =
                    parse_or_keep(&key, value, record.files_pushed, |v| v.parse().ok());
            }
            "totalfiles" => {
                record.total_files =
                    parse_or_keep(&key, value, record.total_files, |v| v.parse().ok());
            }
            _ => {}
        }
    }

    record
}

/// Render every key, in canonical order.
pub fn render(record: &ProgressRecord) -> String {
    let date = record
        .last_push_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default();
    let time = record
        .last_push_time
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default();
    let success = if record.last_push_success { "True" } else { "False" };

    format!(
        "LastPushDate: {date}\n\
         LastPushTime: {time}\n\
         LastPushSuccess: {success}\n\
         DayNumber: {}\n\
         TotalDays: {}\n\
         FilesPushed: {}\n\
         TotalFiles: {}\n",
        record.day_number.0, record.total_days, record.files_pushed, record.total_files,
    )
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Empty values mean "unset" and keep the default silently.
fn parse_or_keep<T>(key: &str, value: &str, current: T, f: impl FnOnce(&str) -> Option<T>) -> T {
    if value.is_empty() {
        return current;
    }
    match f(value) {
        Some(parsed) => parsed,
        None => {
            tracing::warn!("progress record: ignoring unparsable {key} value '{value}'");
            current
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load the progress record at `path`; an absent file yields the defaults.
pub fn load_at(path: &Path) -> Result<ProgressRecord, ProgressError> {
    if !path.exists() {
        tracing::debug!("no progress record at {}; using defaults", path.display());
        return Ok(ProgressRecord::default());
    }
    let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    Ok(parse(&text))
}

/// Atomically rewrite the progress record: `<path>.tmp` then rename.
pub fn save_at(path: &Path, record: &ProgressRecord) -> Result<(), ProgressError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    std::fs::write(&tmp, render(record)).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

fn io_err(path: &Path, source: std::io::Error) -> ProgressError {
    ProgressError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_full_document() {
        let record = parse(
            "LastPushDate: 2026-03-05\n\
             LastPushTime: 14:30:00\n\
             LastPushSuccess: True\n\
             DayNumber: 5\n\
             TotalDays: 30\n\
             FilesPushed: 23\n\
             TotalFiles: 120\n",
        );
        assert_eq!(record.last_push_date.unwrap().to_string(), "2026-03-05");
        assert_eq!(record.last_push_time.unwrap().to_string(), "14:30:00");
        assert!(record.last_push_success);
        assert_eq!(record.day_number, DayNumber(5));
        assert_eq!(record.total_days, 30);
        assert_eq!(record.files_pushed, 23);
        assert_eq!(record.total_files, 120);
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let record = parse("FilesPushed: 7\n");
        assert_eq!(record.files_pushed, 7);
        assert_eq!(record.day_number, DayNumber(1));
        assert!(record.last_push_date.is_none());
        assert!(!record.last_push_success);
    }

    #[test]
    fn tolerant_key_matching() {
        let record = parse("  daynumber :  12 \nLASTPUSHSUCCESS: yes\nnoise line\nOther: 3\n");
        assert_eq!(record.day_number, DayNumber(12));
        assert!(record.last_push_success);
    }

    #[test]
    fn bad_value_keeps_default() {
        let record = parse("DayNumber: twelve\nLastPushDate: yesterday\n");
        assert_eq!(record.day_number, DayNumber(1));
        assert!(record.last_push_date.is_none());
    }

    #[test]
    fn empty_date_renders_blank() {
        let text = render(&ProgressRecord::default());
        assert!(text.starts_with("LastPushDate: \n"));
        assert!(text.contains("LastPushSuccess: False\n"));
        assert!(text.contains("DayNumber: 1\n"));
    }

    #[test]
    fn load_absent_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let record = load_at(&dir.path().join("push_progress.txt")).unwrap();
        assert_eq!(record, ProgressRecord::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("push_progress.txt");
        let record = parse("LastPushDate: 2026-03-05\nLastPushTime: 08:00:00\nDayNumber: 3\n");
        save_at(&path, &record).unwrap();
        assert_eq!(load_at(&path).unwrap(), record);
        assert!(!dir.path().join("push_progress.txt.tmp").exists());
    }
}
