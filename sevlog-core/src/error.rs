use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up the log files or installing the logger.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to create log directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to open log file {}", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `SEVLOG_*` environment variable could not be parsed.
    #[error("invalid SEVLOG_* environment variable: {0}")]
    Config(String),

    /// Another logger already owns the `log` facade.
    #[error("a global logger is already installed")]
    LoggerInstalled,
}

pub type Result<T> = std::result::Result<T, Error>;
