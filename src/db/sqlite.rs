//! SQLite connection wrapper with an explicit reconnect

use crate::error::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Where the connection points
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite database context shared by the store components
#[derive(Debug)]
pub struct SqliteDatabase {
    conn: Connection,
    location: Location,
}

impl SqliteDatabase {
    /// Open or create a SQLite database file, creating its parent directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened database");

        Ok(Self {
            conn,
            location: Location::File(path.to_path_buf()),
        })
    }

    /// Create an in-memory database for testing
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        Ok(Self {
            conn,
            location: Location::Memory,
        })
    }

    /// Close the current connection and open a fresh one to the same file.
    ///
    /// In-memory databases keep their connection, since reopening would
    /// discard every row.
    pub fn reconnect(&mut self) -> Result<()> {
        match &self.location {
            Location::File(path) => {
                let fresh = Connection::open(path)?;
                let old = std::mem::replace(&mut self.conn, fresh);
                if let Err((_, e)) = old.close() {
                    tracing::warn!("error closing previous connection: {e}");
                }
                tracing::info!(path = %path.display(), "reconnected to database");
            }
            Location::Memory => {
                tracing::debug!("reconnect ignored for in-memory database");
            }
        }
        Ok(())
    }

    /// Execute a SQL statement (INSERT, UPDATE, DELETE, etc.)
    pub fn execute(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Execute a batch of SQL statements
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Path of the backing file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Mutable access for transactions
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
