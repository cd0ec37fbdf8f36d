//! # sevlog
//! Logger splitting log lines into one append-only file per severity.
//!
//! Every record is formatted as a line starting with its severity tag
//! (`I`, `W`, `E` or `F`) and written to `info.log`, `warn.log`, `error.log`
//! or `fatal.log` inside the log directory.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! sevlog = "0.1.0"
//! ```
//!
//! ```rust
//! use sevlog::logger_config;
//!
//! let dir = std::env::temp_dir().join("sevlog_doc_usage");
//! let _guard = logger_config()
//!     .with_log_dir(&dir)
//!     .init_global()
//!     .expect("Unable to set up log files");
//! log::warn!("Hello, world!");
//! drop(_guard); // closes the log files
//! assert!(std::fs::read_to_string(dir.join("warn.log")).unwrap().ends_with("] Hello, world!\n"));
//! ```
//!
//! ## Options
//! Defaults are read from the environment (`SEVLOG_LOG_DIR`, `SEVLOG_TO_STDERR`,
//! `SEVLOG_ONE_OUTPUT`, `SEVLOG_ALSO_STDERR`) and can be overridden on the builder.
//!
//! ```rust
//! use sevlog::logger_config;
//!
//! let dir = std::env::temp_dir().join("sevlog_doc_cascade");
//! let logger = logger_config()
//!     .with_log_dir(&dir)
//!     .one_output(false) // errors are copied to warn.log and info.log too
//!     .also_to_stderr(false)
//!     .build()
//!     .expect("Unable to set up log files");
//! log::Log::log(&logger, &log::Record::builder()
//!     .args(format_args!("boom"))
//!     .level(log::Level::Error)
//!     .build());
//! logger.close();
//! assert!(std::fs::read_to_string(dir.join("info.log")).unwrap().ends_with("] boom\n"));
//! ```

use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use log::{LevelFilter, Log, Metadata, Record};
use sevlog_core::{EchoMessage, EchoSender, LogStderr, sevlog_config, spawn_echo_thread};

pub use log;
pub use sevlog_core::{DEFAULT_LOG_DIR, Error, Result, Severity, SeverityRouter};

mod utils;

use utils::format_line;

/// Records logged with this target are written as fatal.
pub const FATAL_TARGET: &str = "sevlog::fatal";

/// Logs a fatal record, closes the global logger and exits with status 255.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {{
        $crate::log::error!(target: $crate::FATAL_TARGET, $($arg)+);
        $crate::close_global();
        ::std::process::exit(255)
    }};
}

/// Logger writing formatted records through a [`SeverityRouter`].
pub struct SevLogger {
    router: Arc<SeverityRouter>,
    /// Stderr mirror, present when `to_stderr` or `also_to_stderr` is set.
    echo: Option<EchoSender>,
    to_stderr: bool,
    one_output: bool,
}

impl SevLogger {
    /// Logger writing only to the files of `router`, one file per record.
    pub fn new(router: Arc<SeverityRouter>) -> Self {
        Self {
            router,
            echo: None,
            to_stderr: false,
            one_output: true,
        }
    }

    pub fn router(&self) -> &SeverityRouter {
        &self.router
    }

    /// Writes an already formatted line.
    ///
    /// The router picks the file from the leading tag; without `one_output`
    /// the line is also copied into every less severe file.
    pub fn write_line(&self, line: &str) {
        if let Some(echo) = &self.echo {
            echo.send(EchoMessage::Line(line.to_owned())).ok();
        }
        if self.to_stderr {
            return;
        }
        let Some(&tag) = line.as_bytes().first() else {
            return;
        };
        let severity = Severity::from_tag(tag);
        if let Err(err) = self.router.write(line.as_bytes()) {
            self.report(severity, err);
        }
        if !self.one_output {
            for lower in severity.cascade().skip(1) {
                if let Err(err) = self.router.write_at(lower, line.as_bytes()) {
                    self.report(lower, err);
                }
            }
        }
    }

    /// Stops the stderr mirror and closes the log files.
    pub fn close(&self) {
        if let Some(echo) = &self.echo {
            echo.shutdown();
        }
        self.router.close();
    }

    fn report(&self, severity: Severity, err: std::io::Error) {
        eprintln!(
            "sevlog: unable to write {severity} line to {}: {err}",
            self.router.path_for(severity).display()
        );
    }
}

fn severity_of(record: &Record) -> Severity {
    if record.target() == FATAL_TARGET {
        Severity::Fatal
    } else {
        record.level().into()
    }
}

impl Log for SevLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let line = format_line(severity_of(record), record);
        self.write_line(&line);
    }

    fn flush(&self) {}
}

/// Sink of the process-wide logger, swapped by [`ConfigBuilder::init_global`].
static GLOBAL_SINK: RwLock<Option<Arc<SevLogger>>> = RwLock::new(None);

/// Whether the `log` facade was handed to [`GlobalLogger`].
static INSTALLED: OnceLock<bool> = OnceLock::new();

struct GlobalLogger;

fn global_sink() -> Option<Arc<SevLogger>> {
    GLOBAL_SINK
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

impl Log for GlobalLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Some(sink) = global_sink() {
            sink.log(record);
        }
    }

    fn flush(&self) {}
}

/// Detaches and closes the global logger, if any. Later records are dropped.
pub fn close_global() {
    let sink = GLOBAL_SINK
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if let Some(sink) = sink {
        sink.close();
    }
}

/// Guard closing the logger when dropped.
/// Hold this guard for the lifetime of your logging session.
#[must_use = "LoggerGuard must be kept alive to keep the log files open. Do \"let _guard = logger_config().init_global()?;\""]
pub struct LoggerGuard {
    logger: Arc<SevLogger>,
}

impl LoggerGuard {
    pub fn logger(&self) -> &SevLogger {
        &self.logger
    }

    /// Same as dropping the guard.
    pub fn close(self) {}
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let mut sink = GLOBAL_SINK.write().unwrap_or_else(PoisonError::into_inner);
        if sink
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &self.logger))
        {
            *sink = None;
        }
        drop(sink);
        self.logger.close();
    }
}

/// Builder for configuring and initializing the logger.
///
/// Options left unset fall back to the `SEVLOG_*` environment variables.
#[derive(Default)]
pub struct ConfigBuilder {
    log_dir: Option<PathBuf>,
    to_stderr: Option<bool>,
    one_output: Option<bool>,
    also_to_stderr: Option<bool>,
    console: Option<LogStderr>,
}

impl ConfigBuilder {
    /// Sets the directory holding the severity files.
    pub fn with_log_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        Self {
            log_dir: Some(dir.as_ref().to_path_buf()),
            ..self
        }
    }
    /// Write to stderr only, leaving the files untouched.
    pub fn to_stderr(self, yes: bool) -> Self {
        Self {
            to_stderr: Some(yes),
            ..self
        }
    }
    /// Write each record only to the file of its own severity.
    pub fn one_output(self, yes: bool) -> Self {
        Self {
            one_output: Some(yes),
            ..self
        }
    }
    /// Mirror every line to stderr as well.
    pub fn also_to_stderr(self, yes: bool) -> Self {
        Self {
            also_to_stderr: Some(yes),
            ..self
        }
    }
    /// Sends the console lines to `writer` instead of stderr, uncoloured.
    pub fn with_console<W: Write + Send + 'static>(self, writer: W) -> Self {
        Self {
            console: Some(LogStderr::new(writer)),
            ..self
        }
    }

    /// Opens the log files and returns a logger owned by the caller.
    pub fn build(self) -> Result<SevLogger> {
        let Self {
            log_dir,
            to_stderr,
            one_output,
            also_to_stderr,
            console,
        } = self;
        let env = sevlog_config()?;
        let log_dir = log_dir.unwrap_or_else(|| PathBuf::from(&env.LOG_DIR));
        let to_stderr = to_stderr.unwrap_or(env.TO_STDERR);
        let one_output = one_output.unwrap_or(env.ONE_OUTPUT);
        let also_to_stderr = also_to_stderr.unwrap_or(env.ALSO_STDERR);
        let router = Arc::new(SeverityRouter::setup(log_dir)?);
        let echo = (to_stderr || also_to_stderr)
            .then(|| spawn_echo_thread(console.unwrap_or_default()));
        Ok(SevLogger {
            router,
            echo,
            to_stderr,
            one_output,
        })
    }

    /// Opens the log files and makes them the output of the `log` facade.
    /// Returns a guard that closes the files when dropped.
    pub fn init_global(self) -> Result<LoggerGuard> {
        let installed = *INSTALLED.get_or_init(|| {
            log::set_boxed_logger(Box::new(GlobalLogger))
                .map(|()| log::set_max_level(LevelFilter::Trace))
                .is_ok()
        });
        if !installed {
            return Err(Error::LoggerInstalled);
        }
        let logger = Arc::new(self.build()?);
        *GLOBAL_SINK.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&logger));
        Ok(LoggerGuard { logger })
    }
}

/// Returns a ConfigBuilder for configuring the logger, with defaults taken
/// from the environment.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}
