use std::{
    fs::{DirBuilder, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
    error::{Error, Result},
    severity::Severity,
};

/// Directory used when an empty path is given to [`SeverityRouter::setup`].
pub const DEFAULT_LOG_DIR: &str = "./log";

/// Demultiplexes formatted log lines into one append-only file per severity.
///
/// The destination is picked from the first byte of each line (see
/// [`Severity::from_tag`]). A single lock is held for the whole of every
/// write, so lines from concurrent callers never interleave, at the cost of
/// serializing writes to different files.
pub struct SeverityRouter {
    dir: PathBuf,
    /// Indexed by `Severity`; `None` once closed.
    files: Mutex<Option<[File; 4]>>,
}

impl SeverityRouter {
    /// Creates `dir` if needed and opens the four severity files for append.
    ///
    /// Only `dir` itself is created; a missing parent is an error.
    pub fn setup<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let dir = if dir.as_os_str().is_empty() {
            Path::new(DEFAULT_LOG_DIR)
        } else {
            dir
        };
        create_log_dir(dir)?;
        let files = [
            open_log_file(&dir.join(Severity::Info.file_name()))?,
            open_log_file(&dir.join(Severity::Warning.file_name()))?,
            open_log_file(&dir.join(Severity::Error.file_name()))?,
            open_log_file(&dir.join(Severity::Fatal.file_name()))?,
        ];
        Ok(Self {
            dir: dir.to_path_buf(),
            files: Mutex::new(Some(files)),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, severity: Severity) -> PathBuf {
        self.dir.join(severity.file_name())
    }

    /// Writes `buf` to the file selected by its leading severity tag.
    ///
    /// The whole buffer is handed to a single `write` call and its result is
    /// returned as is. An empty buffer is a no-op returning `Ok(0)`.
    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        match buf.first() {
            Some(&tag) => self.write_at(Severity::from_tag(tag), buf),
            None => Ok(0),
        }
    }

    /// Writes `buf` to the file of `severity`, whatever its first byte is.
    pub fn write_at(&self, severity: Severity, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut files = self.lock();
        let files = files.as_mut().ok_or_else(closed)?;
        files[severity.index()].write(buf)
    }

    /// Releases the four file handles. Close errors are ignored and later
    /// writes are refused.
    pub fn close(&self) {
        drop(self.lock().take());
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Option<[File; 4]>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for &SeverityRouter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        SeverityRouter::write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn closed() -> io::Error {
    io::Error::other("severity router is closed")
}

fn create_log_dir(dir: &Path) -> Result<()> {
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    match builder.create(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(Error::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    let mut options = File::options();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path).map_err(|source| Error::OpenFile {
        path: path.to_path_buf(),
        source,
    })
}
