//! Panel event log behind the "View Logs" button.
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub event: String,
    pub details: Option<String>,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.timestamp.format("%H:%M:%S"), self.event)?;
        if let Some(d) = &self.details {
            write!(f, " ({d})")?;
        }
        Ok(())
    }
}

/// Secondary sink for log entries.
pub trait Logger {
    fn log(&self, entry: &LogEntry);
}

/// Appends one line per entry to a file.
pub struct FileLogger {
    path: PathBuf,
}

impl FileLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Logger for FileLogger {
    fn log(&self, entry: &LogEntry) {
        use std::fs::OpenOptions;
        use std::io::Write;
        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(mut file) => {
                let _ = writeln!(file, "{} {entry}", entry.timestamp.to_rfc3339());
            }
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "event log sink unavailable"),
        }
    }
}

/// Bounded in-memory log; the oldest entries are dropped first.
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    sink: Option<Box<dyn Logger + Send>>,
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn Logger + Send>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn record(&mut self, event: impl Into<String>, details: Option<String>) {
        let entry = LogEntry {
            timestamp: Local::now(),
            event: event.into(),
            details,
        };
        if let Some(sink) = &self.sink {
            sink.log(&entry);
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
