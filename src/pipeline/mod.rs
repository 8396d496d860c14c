//! Ingestion pipeline
//!
//! ```text
//! SourceCatalog::pending ──▶ parse lines ──▶ insert (per source, atomic)
//!                                                   │
//!                       dedupe (once per batch) ◀── archive
//! ```

pub mod discovery;
pub mod ingest;
pub mod report;

pub use discovery::{DirectorySources, SourceCatalog};
pub use ingest::{ingest_source, run_batch};
pub use report::{
    IngestReport, LineFailure, NoProgress, Progress, ProgressSink, SourceReport, SourceState,
};
