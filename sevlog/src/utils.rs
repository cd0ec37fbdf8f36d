use std::{ffi::OsStr, path::Path};

use chrono::Local;
use log::Record;
use sevlog_core::Severity;

/// Formats a record as `Lmmdd hh:mm:ss.uuuuuu ppppppp file:line] message`,
/// where `L` is the severity tag the router dispatches on.
pub(crate) fn format_line(severity: Severity, record: &Record) -> String {
    let time = Local::now().format("%m%d %H:%M:%S%.6f");
    let (file, line) = match record.file() {
        Some(path) => (
            Path::new(path)
                .file_name()
                .and_then(OsStr::to_str)
                .unwrap_or(path),
            record.line().unwrap_or(0),
        ),
        None => ("???", 1),
    };
    let mut formatted = format!(
        "{}{time} {:>7} {file}:{line}] {}",
        char::from(severity.tag()),
        std::process::id(),
        record.args()
    );
    if !formatted.ends_with('\n') {
        formatted.push('\n');
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_format_line() {
        let line = format_line(
            Severity::Warning,
            &Record::builder()
                .args(format_args!("disk {}% full", 91))
                .level(Level::Warn)
                .file(Some("src/storage/disk.rs"))
                .line(Some(42))
                .build(),
        );
        assert!(line.starts_with('W'), "{line}");
        assert!(line.ends_with(" disk.rs:42] disk 91% full\n"), "{line}");
        assert!(line.contains(&format!(" {:>7} ", std::process::id())), "{line}");
        // mmdd hh:mm:ss.uuuuuu
        let header = &line[1..21];
        assert_eq!(header.as_bytes()[4], b' ');
        assert_eq!(header.as_bytes()[13], b'.');
        assert!(header[..4].bytes().all(|b| b.is_ascii_digit()));
        assert!(header[14..].bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_format_line_unknown_location() {
        let line = format_line(
            Severity::Info,
            &Record::builder()
                .args(format_args!("already terminated\n"))
                .level(Level::Info)
                .build(),
        );
        assert!(line.starts_with('I'));
        assert!(line.ends_with(" ???:1] already terminated\n"), "{line}");
        assert_eq!(line.matches('\n').count(), 1);
    }
}
