//! # sevlog-core
//! Core utilities for sevlog - routing formatted log lines into one
//! append-only file per severity.
//!
//! ```rust
//! use sevlog_core::{Severity, SeverityRouter};
//!
//! let dir = std::env::temp_dir().join("sevlog_core_doc");
//! let router = SeverityRouter::setup(&dir).expect("Unable to create log files");
//! assert_eq!(router.write(b"Eboom\n").unwrap(), 6);
//! router.close();
//! assert!(std::fs::read_to_string(dir.join("error.log")).unwrap().ends_with("Eboom\n"));
//! ```

mod config;
mod error;
mod router;
mod severity;
mod utils;

pub use config::{SevLogConfig, sevlog_config};
pub use error::{Error, Result};
pub use router::{DEFAULT_LOG_DIR, SeverityRouter};
pub use severity::Severity;
pub use utils::{EchoMessage, EchoSender, LogStderr, spawn_echo_thread};
