use std::fmt;

use colored::{ColoredString, Colorize};
use log::Level;

/// Severity of a log line, ordered from least to most severe.
///
/// Every formatted line starts with the tag byte of its severity, which is
/// all the router looks at when choosing a destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info = 0,
    Warning = 1,
    Error = 2,
    Fatal = 3,
}

impl Severity {
    /// All severities, indexed like the router's file table.
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Maps a leading tag byte to its severity.
    ///
    /// Anything other than `I`, `W`, `E` or `F` is treated as [`Severity::Info`].
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            b'W' => Severity::Warning,
            b'E' => Severity::Error,
            b'F' => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Severity::Info => b'I',
            Severity::Warning => b'W',
            Severity::Error => b'E',
            Severity::Fatal => b'F',
        }
    }

    /// Name of the destination file for this severity.
    pub fn file_name(self) -> &'static str {
        match self {
            Severity::Info => "info.log",
            Severity::Warning => "warn.log",
            Severity::Error => "error.log",
            Severity::Fatal => "fatal.log",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// This severity and every less severe one, most severe first.
    pub fn cascade(self) -> impl Iterator<Item = Severity> {
        let all: &'static [Severity; 4] = &Severity::ALL;
        all[..=self.index()].iter().rev().copied()
    }

    pub(crate) fn colored_tag(self) -> ColoredString {
        match self {
            Severity::Info => "I".green(),
            Severity::Warning => "W".yellow(),
            Severity::Error => "E".red(),
            Severity::Fatal => "F".red().bold(),
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Severity::Error,
            Level::Warn => Severity::Warning,
            Level::Info | Level::Debug | Level::Trace => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Severity::from_tag(b'I'), Severity::Info);
        assert_eq!(Severity::from_tag(b'W'), Severity::Warning);
        assert_eq!(Severity::from_tag(b'E'), Severity::Error);
        assert_eq!(Severity::from_tag(b'F'), Severity::Fatal);
        for tag in [b'i', b'w', b'D', b'[', b' ', 0u8, 0xff] {
            assert_eq!(Severity::from_tag(tag), Severity::Info);
        }
    }

    #[test]
    fn test_tag_matches_table_index() {
        for (i, severity) in Severity::ALL.into_iter().enumerate() {
            assert_eq!(severity.index(), i);
            assert_eq!(Severity::from_tag(severity.tag()), severity);
        }
    }

    #[test]
    fn test_cascade() {
        assert_eq!(
            Severity::Fatal.cascade().collect::<Vec<_>>(),
            vec![
                Severity::Fatal,
                Severity::Error,
                Severity::Warning,
                Severity::Info
            ]
        );
        assert_eq!(
            Severity::Info.cascade().collect::<Vec<_>>(),
            vec![Severity::Info]
        );
    }

    #[test]
    fn test_from_level() {
        assert_eq!(Severity::from(Level::Error), Severity::Error);
        assert_eq!(Severity::from(Level::Warn), Severity::Warning);
        assert_eq!(Severity::from(Level::Debug), Severity::Info);
        assert_eq!(Severity::from(Level::Trace), Severity::Info);
    }
}
