//! Persistent store for survey observations
//!
//! SQLite holds one row per retained observation. Inserts never check for
//! an existing `bssid`; the [`dedupe`] pass restores the one-row-per-radio
//! invariant after a batch. Readers that query between a batch and its
//! dedupe pass may see duplicates.
//!
//! # Example
//!
//! ```no_run
//! use warwalk::storage::ObservationStore;
//!
//! let store = ObservationStore::open("Database/warwalking.sqlite3")?;
//! println!("{} observations", store.count(None)?);
//! # Ok::<(), warwalk::Error>(())
//! ```

pub mod dedupe;
pub mod observations;

pub use observations::ObservationStore;
