//! Log writer module
//!
//! Provides a thread-safe, append-only log sink writing to stderr, a file
//! or an in-memory buffer. Every line carries a UTC timestamp prefix.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use super::format;

/// Process-wide log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    /// Write to stderr
    Stderr,
    /// Append to file
    File(File),
    /// Keep lines in memory
    Memory(Vec<String>),
}

/// Thread-safe log writer
///
/// Cloning is cheap: clones share the same target.
#[derive(Clone)]
pub struct LogWriter {
    target: Arc<Mutex<LogTarget>>,
}

impl std::fmt::Debug for LogWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &*self.lock() {
            LogTarget::Stderr => "stderr",
            LogTarget::File(_) => "file",
            LogTarget::Memory(_) => "memory",
        };
        f.debug_struct("LogWriter").field("target", &kind).finish()
    }
}

impl LogWriter {
    fn with_target(target: LogTarget) -> Self {
        Self {
            target: Arc::new(Mutex::new(target)),
        }
    }

    pub fn stderr() -> Self {
        Self::with_target(LogTarget::Stderr)
    }

    /// Open (or create) `path` for appending
    pub fn file(path: &str) -> io::Result<Self> {
        Ok(Self::with_target(LogTarget::File(open_log_file(path)?)))
    }

    /// Buffer lines in memory, readable back with [`LogWriter::lines`]
    pub fn memory() -> Self {
        Self::with_target(LogTarget::Memory(Vec::new()))
    }

    /// Append one timestamped line
    pub fn write_line(&self, message: &str) {
        self.write_lines(&[message]);
    }

    /// Append several lines without interleaving from other writers
    pub fn write_lines<S: AsRef<str>>(&self, messages: &[S]) {
        let ts = format::timestamp();
        let mut target = self.lock();
        for message in messages {
            let line = format!("{ts}{}", message.as_ref());
            match &mut *target {
                LogTarget::Stderr => eprintln!("{line}"),
                LogTarget::File(f) => {
                    let _ = writeln!(f, "{line}");
                }
                LogTarget::Memory(lines) => lines.push(line),
            }
        }
    }

    /// Lines captured by a memory writer (empty for other targets)
    pub fn lines(&self) -> Vec<String> {
        match &*self.lock() {
            LogTarget::Memory(lines) => lines.clone(),
            _ => Vec::new(),
        }
    }

    // Writers only append, a poisoned lock still holds a usable target.
    fn lock(&self) -> MutexGuard<'_, LogTarget> {
        self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the process-wide log writer
///
/// This should be called once at application startup.
pub fn init(log_file: Option<&str>) -> io::Result<()> {
    let writer = match log_file {
        Some(path) => LogWriter::file(path)?,
        None => LogWriter::stderr(),
    };
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// The process-wide writer, or a stderr writer before [`init`]
pub fn shared() -> LogWriter {
    LOG_WRITER.get().cloned().unwrap_or_else(LogWriter::stderr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_writer_keeps_order() {
        let log = LogWriter::memory();
        log.write_line("first");
        log.write_line("second");

        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn test_clones_share_target() {
        let log = LogWriter::memory();
        let clone = log.clone();
        clone.write_line("from clone");
        assert_eq!(log.lines().len(), 1);
    }

    #[test]
    fn test_file_writer_appends() {
        let dir = std::env::temp_dir().join(format!("webdispatch-log-{}", std::process::id()));
        let path = dir.join("nested").join("server.log");
        let path_str = path.to_string_lossy().to_string();

        let log = LogWriter::file(&path_str).unwrap();
        log.write_line("one");
        let log = LogWriter::file(&path_str).unwrap();
        log.write_line("two");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("one"));
        assert!(content.contains("two"));
        assert_eq!(content.lines().count(), 2);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_non_memory_lines_empty() {
        assert!(LogWriter::stderr().lines().is_empty());
    }
}
