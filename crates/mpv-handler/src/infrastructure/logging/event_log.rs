//! Append-only, timestamped event log file.
//!
//! Each event becomes one line:
//!
//! ```text
//! 2024-05-01 18:32:07 | Decoded URL: https://example.com/v.mkv
//! ```
//!
//! The file is opened for every event and closed again before `record`
//! returns, so concurrent handler processes only ever interleave whole
//! lines.  Any I/O failure is swallowed: logging never aborts link handling.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, trace};

use crate::application::diagnostics::EventSink;

/// Sortable local-time timestamp format used at the start of each line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats one log line, including the trailing newline.
///
/// Line breaks inside `message` are replaced with spaces so every event
/// stays on a single line.
pub fn format_line(timestamp: NaiveDateTime, message: &str) -> String {
    let message = message.replace(['\r', '\n'], " ");
    format!("{} | {}\n", timestamp.format(TIMESTAMP_FORMAT), message)
}

/// [`EventSink`] writing to the configured log file when logging is enabled.
#[derive(Debug, Clone)]
pub struct FileEventLog {
    enabled: bool,
    path: PathBuf,
}

impl FileEventLog {
    pub fn new(enabled: bool, path: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            path: path.into(),
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl EventSink for FileEventLog {
    fn record(&self, message: &str) {
        debug!(target: "mpv_handler::event", "{message}");
        if !self.enabled {
            return;
        }
        let line = format_line(Local::now().naive_local(), message);
        if let Err(e) = self.append(&line) {
            trace!(path = %self.path.display(), error = %e, "event log write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mpv-handler-log-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid timestamp")
    }

    #[test]
    fn test_format_line_uses_sortable_timestamp() {
        assert_eq!(
            format_line(at(7, 5, 3), "Raw URL: mpv://x"),
            "2024-03-09 07:05:03 | Raw URL: mpv://x\n"
        );
    }

    #[test]
    fn test_format_line_flattens_embedded_newlines() {
        assert_eq!(format_line(at(0, 0, 0), "a\r\nb"), "2024-03-09 00:00:00 | a  b\n");
    }

    #[test]
    fn test_disabled_log_creates_no_file() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("events.log");
        let log = FileEventLog::new(false, &path);

        // Act
        log.record("hello");

        // Assert
        assert!(!path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_enabled_log_appends_one_line_per_event() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("events.log");
        std::fs::write(&path, "existing line\n").expect("seed");
        let log = FileEventLog::new(true, &path);

        // Act
        log.record("first");
        log.record("second");

        // Assert
        let content = std::fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "existing line");
        assert!(lines[1].ends_with(" | first"));
        assert!(lines[2].ends_with(" | second"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let dir = temp_dir();
        // A directory cannot be opened for append.
        let log = FileEventLog::new(true, &dir);

        log.record("does not panic");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
