//! Outcomes and progress events produced by an ingestion batch

use crate::error::RecordError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a source got to in `Discovered -> Parsing -> Parsed -> Persisted -> Archived`.
///
/// `ParseFailed` is terminal: the file could not be read at all and stays
/// pending for the next batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceState {
    Discovered,
    Parsing,
    Parsed,
    ParseFailed,
    Persisted,
    Archived,
}

impl fmt::Display for SourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovered => "discovered",
            Self::Parsing => "parsing",
            Self::Parsed => "parsed",
            Self::ParseFailed => "parse failed",
            Self::Persisted => "persisted",
            Self::Archived => "archived",
        };
        f.write_str(name)
    }
}

/// A skipped line, numbered from 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFailure {
    pub line: usize,
    pub text: String,
    #[serde(serialize_with = "as_display")]
    pub error: RecordError,
}

/// Result of processing one source file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub path: PathBuf,
    pub state: SourceState,
    pub lines: usize,
    pub blank_lines: usize,
    pub inserted: usize,
    pub rejected: Vec<LineFailure>,
    /// Read or archive failure, when the source did not reach `Archived`
    pub error: Option<String>,
}

impl SourceReport {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            state: SourceState::Discovered,
            lines: 0,
            blank_lines: 0,
            inserted: 0,
            rejected: Vec::new(),
            error: None,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.state == SourceState::Archived
    }
}

/// Result of a whole batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub sources: Vec<SourceReport>,
    pub duplicates_removed: usize,
    pub total_observations: usize,
}

impl IngestReport {
    pub fn inserted(&self) -> usize {
        self.sources.iter().map(|s| s.inserted).sum()
    }

    pub fn rejected_lines(&self) -> usize {
        self.sources.iter().map(|s| s.rejected.len()).sum()
    }

    /// Sources left in the pending set
    pub fn unarchived(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|s| !s.is_archived())
    }
}

/// Progress notifications for a UI
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    SourceStarted {
        path: &'a Path,
        index: usize,
        count: usize,
        lines: usize,
    },
    Lines {
        path: &'a Path,
        done: usize,
        total: usize,
    },
    SourceFinished {
        report: &'a SourceReport,
    },
    BatchFinished {
        report: &'a IngestReport,
    },
}

impl Progress<'_> {
    /// Fraction of lines processed in the current source, if applicable
    pub fn fraction(&self) -> Option<f64> {
        match self {
            Self::Lines { done, total, .. } if *total > 0 => Some(*done as f64 / *total as f64),
            Self::Lines { .. } => Some(1.0),
            _ => None,
        }
    }
}

/// Receiver of [`Progress`] events
pub trait ProgressSink {
    fn update(&mut self, event: &Progress<'_>);
}

impl<F> ProgressSink for F
where
    F: FnMut(&Progress<'_>),
{
    fn update(&mut self, event: &Progress<'_>) {
        self(event)
    }
}

/// Discards every event
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&mut self, _event: &Progress<'_>) {}
}

fn as_display<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
