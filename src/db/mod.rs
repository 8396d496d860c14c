//! Database handle for the survey store
//!
//! One SQLite connection owned by an explicit context object. Components
//! borrow it; only the owner may reconnect or drop it.
//!
//! # Example
//! ```no_run
//! use warwalk::db::SqliteDatabase;
//!
//! let db = SqliteDatabase::open("Database/warwalking.sqlite3")?;
//! db.execute("CREATE TABLE IF NOT EXISTS test (id INTEGER)", &[])?;
//! # Ok::<(), warwalk::Error>(())
//! ```

pub mod sqlite;

pub use sqlite::SqliteDatabase;
