//! Survey log ingestion, deduplication and viewport queries.
//!
//! ```text
//! NewData/*.csv ──▶ parser ──▶ storage (SQLite) ──▶ dedupe
//!                     │             ▲
//!                 pipeline ─────────┘        query::MapView ◀── display
//! ```
//!
//! # Example
//!
//! ```no_run
//! use warwalk::pipeline::{self, DirectorySources, NoProgress};
//! use warwalk::query::MapView;
//! use warwalk::storage::ObservationStore;
//!
//! let mut store = ObservationStore::open("Database/warwalking.sqlite3")?;
//! let sources = DirectorySources::new("NewData", "OldData");
//! sources.prepare()?;
//!
//! let report = pipeline::run_batch(&mut store, &sources, &mut NoProgress)?;
//! println!("{} inserted", report.inserted());
//!
//! let open = MapView::new(&store).get_open(None)?;
//! println!("{} open networks", open.len());
//! # Ok::<(), warwalk::Error>(())
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod parser;
pub mod paths;
pub mod pipeline;
pub mod query;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{Error, RecordError, Result};
pub use storage::ObservationStore;
pub use types::{Coordinate, EncryptionClass, Observation, StoredObservation, Viewport};
