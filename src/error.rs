//! Error taxonomy for the ingestion and query engine
//!
//! Three failure scopes exist:
//! - [`RecordError`]: one log line could not be turned into an observation.
//!   Recovered locally by the pipeline (line skipped and reported).
//! - [`Error::SourceRead`] / [`Error::Archive`]: one source file could not be
//!   read or moved out of the pending set. Fatal to that source only.
//! - [`Error::Store`]: SQLite rejected an operation. Fatal to the batch.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A log line that does not describe a valid observation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("expected 7 fields separated by ';', found {found}")]
    FieldCount { found: usize },
    #[error("bssid is empty")]
    EmptyBssid,
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("not valid UTF-8 after byte {valid_up_to}")]
    InvalidEncoding { valid_up_to: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("store operation failed: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("failed to read source {path:?}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to archive source {path:?}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to list pending sources in {dir:?}: {source}")]
    Discovery {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
