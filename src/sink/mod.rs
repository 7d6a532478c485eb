//! Append-only persistence for acceptable matches.
//!
//! One `secretHex,address` line per match. Losing a found match silently
//! is the worst failure mode for this tool, so any write error is fatal
//! to the whole search.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Destination for matched records.
///
/// `append` must be atomic with respect to concurrent callers: no two
/// records may interleave mid-line.
pub trait ResultSink: Send + Sync {
    fn append(&self, secret_hex: &str, address: &str) -> io::Result<()>;
}

/// File-backed sink.
///
/// Serializes writers with a mutex rather than relying on the platform's
/// append semantics, and flushes per record so a found key survives a
/// later crash.
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Opens the sink, discarding records from any previous run.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ResultSink for FileSink {
    fn append(&self, secret_hex: &str, address: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "sink writer poisoned"))?;
        writeln!(file, "{},{}", secret_hex, address)?;
        file.flush()
    }
}

/// In-memory sink capturing records; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(String, String)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ResultSink for MemorySink {
    fn append(&self, secret_hex: &str, address: &str) -> io::Result<()> {
        self.records
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "sink records poisoned"))?
            .push((secret_hex.to_owned(), address.to_owned()));
        Ok(())
    }
}
