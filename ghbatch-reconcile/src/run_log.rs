//! Append-only run log.
//!
//! Every terminal outcome (success, skip reason, error with captured text)
//! becomes one [`LogEntry`]:
//!
//! ```text
//! [2026-10-17 09:14:03] [SUCCESS] created alice/repoX (remote only)
//! ```
//!
//! The entry is appended to `create.log`, mirrored as a `tracing` event,
//! handed to the optional [`Reporter`] (the CLI's console echo) and kept in
//! memory for the end-of-run summary. The log is for audit only; no control
//! flow reads it back.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{io_err, ReconcileError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome tag of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Info,
    Warn,
    Error,
    Success,
    Exist,
    Skip,
    Update,
    Sync,
    Commit,
}

impl Tag {
    pub const ALL: [Tag; 9] = [
        Tag::Info,
        Tag::Warn,
        Tag::Error,
        Tag::Success,
        Tag::Exist,
        Tag::Skip,
        Tag::Update,
        Tag::Sync,
        Tag::Commit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tag::Info => "INFO",
            Tag::Warn => "WARN",
            Tag::Error => "ERROR",
            Tag::Success => "SUCCESS",
            Tag::Exist => "EXIST",
            Tag::Skip => "SKIP",
            Tag::Update => "UPDATE",
            Tag::Sync => "SYNC",
            Tag::Commit => "COMMIT",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One timestamped outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub tag: Tag,
    pub message: String,
}

impl LogEntry {
    pub fn to_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.at.format(TIMESTAMP_FORMAT),
            self.tag,
            self.message
        )
    }
}

/// Receives every entry as it is recorded.
pub trait Reporter {
    fn report(&mut self, entry: &LogEntry);
}

/// A plain append-only text file, opened once per run.
#[derive(Debug)]
pub struct TextLog {
    path: PathBuf,
    file: File,
}

impl TextLog {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn open(path: &Path) -> Result<Self, ReconcileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| io_err(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_line(&mut self, line: &str) -> Result<(), ReconcileError> {
        writeln!(self.file, "{line}").map_err(|e| io_err(&self.path, e))
    }

    /// Append `line` prefixed with the current local timestamp.
    pub fn append_stamped(&mut self, line: &str) -> Result<(), ReconcileError> {
        let stamped = format!("[{}] {line}", Local::now().format(TIMESTAMP_FORMAT));
        self.append_line(&stamped)
    }
}

/// The run's outcome log.
#[derive(Default)]
pub struct RunLog {
    sink: Option<TextLog>,
    reporter: Option<Box<dyn Reporter>>,
    entries: Vec<LogEntry>,
}

impl RunLog {
    /// Log appending to `path`.
    pub fn open(path: &Path) -> Result<Self, ReconcileError> {
        Ok(Self {
            sink: Some(TextLog::open(path)?),
            ..Self::default()
        })
    }

    /// In-memory log with no backing file.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn set_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporter = Some(reporter);
    }

    pub fn record(&mut self, tag: Tag, message: impl Into<String>) {
        let entry = LogEntry {
            at: Local::now(),
            tag,
            message: message.into(),
        };
        trace_entry(&entry);

        if let Some(sink) = self.sink.as_mut() {
            if let Err(err) = sink.append_line(&entry.to_line()) {
                tracing::warn!(path = %sink.path().display(), error = %err, "run log write failed");
            }
        }
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.report(&entry);
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn count(&self, tag: Tag) -> usize {
        self.entries.iter().filter(|e| e.tag == tag).count()
    }

    /// Non-zero counts per tag, in [`Tag::ALL`] order.
    pub fn counts(&self) -> BTreeMap<Tag, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.tag).or_insert(0) += 1;
        }
        counts
    }

    /// `true` if any entry with `tag` contains `needle`.
    pub fn contains(&self, tag: Tag, needle: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.tag == tag && e.message.contains(needle))
    }
}

fn trace_entry(entry: &LogEntry) {
    let tag = entry.tag.label();
    match entry.tag {
        Tag::Error => tracing::error!(tag, "{}", entry.message),
        Tag::Warn => tracing::warn!(tag, "{}", entry.message),
        _ => tracing::info!(tag, "{}", entry.message),
    }
}
