//! JSON-lines file implementation of `EventStore`.
//!
//! One `ChainedEvent` per line, appended and flushed per event. The chain is
//! re-verified when the file is opened, so a tampered or half-written log is
//! refused instead of silently extended.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, info};

use praxis_contracts::{
    error::{PraxisError, PraxisResult},
    event::Event,
};
use praxis_core::traits::EventStore;

use crate::{
    chain::{first_broken_link, Chain},
    record::{ChainedEvent, EventLog},
};

struct FileState {
    chain: Chain,
    file: File,
    /// Set when a failed write could not be cut back. The file then ends in
    /// a partial line and nothing may be written after it.
    torn: bool,
}

/// An append target that can be cut back to an earlier length.
trait LogFile: Write {
    fn end(&self) -> io::Result<u64>;

    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl LogFile for File {
    fn end(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

#[derive(Debug)]
struct WriteFailure {
    error: io::Error,
    /// The partial line is still in the file.
    torn: bool,
}

/// Write and flush one line. On failure the file is cut back to its length
/// before the write.
fn write_line<F: LogFile>(file: &mut F, line: &[u8]) -> Result<(), WriteFailure> {
    let start = file.end().map_err(|error| WriteFailure { error, torn: false })?;
    if let Err(error) = file.write_all(line).and_then(|()| file.flush()) {
        let torn = file.truncate(start).is_err();
        return Err(WriteFailure { error, torn });
    }
    Ok(())
}

/// A durable event store writing one JSON line per event.
pub struct JsonlEventStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl JsonlEventStore {
    /// Open (or create) the log at `path`.
    ///
    /// # Errors
    ///
    /// `EventStoreCorrupted` when an existing line cannot be decoded or the
    /// chain fails verification; `EventStoreWrite` when the file cannot be
    /// opened.
    pub fn open(path: impl AsRef<Path>) -> PraxisResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            read_entries(&path)?
        } else {
            Vec::new()
        };

        if let Some(index) = first_broken_link(&entries) {
            return Err(PraxisError::EventStoreCorrupted {
                reason: format!(
                    "hash chain broken at entry {index} of '{}'",
                    path.display()
                ),
            });
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| PraxisError::EventStoreWrite {
                reason: format!("failed to open '{}': {e}", path.display()),
            })?;

        info!(path = %path.display(), entries = entries.len(), "event log opened");

        Ok(Self {
            path,
            state: Mutex::new(FileState {
                chain: Chain::from_entries(entries),
                file,
                torn: false,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Export a sealed `EventLog` of every entry in the file.
    pub fn export_log(&self) -> PraxisResult<EventLog> {
        Ok(EventLog::seal(self.lock()?.chain.entries.clone()))
    }

    fn lock(&self) -> PraxisResult<MutexGuard<'_, FileState>> {
        self.state.lock().map_err(|e| PraxisError::EventStoreWrite {
            reason: format!("event store lock poisoned: {e}"),
        })
    }
}

impl EventStore for JsonlEventStore {
    /// Seal, write and flush one entry. The in-memory chain only advances
    /// once the line is on disk; a failed write leaves the file as it was.
    fn append(&self, event: Event) -> PraxisResult<()> {
        let mut state = self.lock()?;
        if state.torn {
            return Err(PraxisError::EventStoreWrite {
                reason: format!(
                    "'{}' ends in a partial entry from an earlier failed write",
                    self.path.display()
                ),
            });
        }
        let entry = state.chain.seal(event);

        let mut line = serde_json::to_string(&entry).map_err(|e| PraxisError::EventStoreWrite {
            reason: format!("failed to encode event: {e}"),
        })?;
        line.push('\n');

        if let Err(failure) = write_line(&mut state.file, line.as_bytes()) {
            if failure.torn {
                error!(path = %self.path.display(), "partial entry left in event log; refusing further appends");
                state.torn = true;
            }
            return Err(PraxisError::EventStoreWrite {
                reason: format!("failed to write '{}': {}", self.path.display(), failure.error),
            });
        }

        debug!(sequence = entry.sequence, kind = entry.event.kind_name(), "event written");
        state.chain.commit(entry);
        Ok(())
    }

    fn history(&self) -> PraxisResult<Vec<Event>> {
        Ok(self.lock()?.chain.events())
    }

    fn recent(&self, limit: usize) -> PraxisResult<Vec<Event>> {
        Ok(self.lock()?.chain.recent(limit))
    }

    fn len(&self) -> PraxisResult<usize> {
        Ok(self.lock()?.chain.entries.len())
    }
}

fn read_entries(path: &Path) -> PraxisResult<Vec<ChainedEvent>> {
    let file = File::open(path).map_err(|e| PraxisError::EventStoreCorrupted {
        reason: format!("failed to read '{}': {e}", path.display()),
    })?;

    let mut entries = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| PraxisError::EventStoreCorrupted {
            reason: format!("failed to read '{}': {e}", path.display()),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str::<ChainedEvent>(&line).map_err(|e| {
            PraxisError::EventStoreCorrupted {
                reason: format!("line {} of '{}' is not a valid entry: {e}", number + 1, path.display()),
            }
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::io::{self, Write};

    use tempfile::TempDir;

    use praxis_contracts::event::{Event, EventKind};
    use praxis_core::traits::EventStore;

    use super::{write_line, JsonlEventStore, LogFile};

    /// Accepts `budget` bytes, then fails like a full disk.
    struct ShortDisk {
        bytes: Vec<u8>,
        budget: usize,
        can_truncate: bool,
    }

    impl ShortDisk {
        fn new(existing: &[u8], budget: usize) -> Self {
            Self {
                bytes: existing.to_vec(),
                budget,
                can_truncate: true,
            }
        }
    }

    impl Write for ShortDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
            }
            let n = buf.len().min(self.budget);
            self.bytes.extend_from_slice(&buf[..n]);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogFile for ShortDisk {
        fn end(&self) -> io::Result<u64> {
            Ok(self.bytes.len() as u64)
        }

        fn truncate(&mut self, len: u64) -> io::Result<()> {
            if !self.can_truncate {
                return Err(io::Error::new(io::ErrorKind::Other, "read-only"));
            }
            self.bytes.truncate(len as usize);
            Ok(())
        }
    }

    fn message(text: &str) -> Event {
        Event::new("plant-agent", EventKind::UserMessage { content: text.to_string() })
    }

    // ── Writes ────────────────────────────────────────────────────────────────

    #[test]
    fn short_write_is_cut_back() {
        let mut disk = ShortDisk::new(b"{\"sequence\":0}\n", 5);

        let failure = write_line(&mut disk, b"{\"sequence\":1}\n").unwrap_err();

        assert!(!failure.torn);
        assert_eq!(disk.bytes, b"{\"sequence\":0}\n");
    }

    #[test]
    fn failed_cut_back_is_reported_as_torn() {
        let mut disk = ShortDisk::new(b"", 3);
        disk.can_truncate = false;

        let failure = write_line(&mut disk, b"{\"sequence\":0}\n").unwrap_err();

        assert!(failure.torn);
        assert_eq!(disk.bytes, b"{\"s");
    }

    #[test]
    fn complete_write_is_kept() {
        let mut disk = ShortDisk::new(b"", 64);
        write_line(&mut disk, b"{}\n").unwrap();
        assert_eq!(disk.bytes, b"{}\n");
    }

    // ── Store ─────────────────────────────────────────────────────────────────

    /// A write the store cannot undo stops all further appends, and the
    /// entries already on disk still open cleanly.
    #[test]
    fn store_refuses_appends_after_a_torn_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let store = JsonlEventStore::open(&path).unwrap();
        store.append(message("kept")).unwrap();

        // A read-only handle fails both the write and the cut-back.
        store.state.lock().unwrap().file = File::open(&path).unwrap();
        assert!(store.append(message("lost")).is_err());
        assert!(store.state.lock().unwrap().torn);

        store.state.lock().unwrap().file =
            fs::OpenOptions::new().append(true).open(&path).unwrap();
        assert!(store.append(message("after")).is_err());
        assert_eq!(store.len().unwrap(), 1);

        let reopened = JsonlEventStore::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
    }
}
