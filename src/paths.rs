//! Single source of truth for the on-disk layout.
//!
//! This module defines WHERE data lives. It has no I/O and no validation.
//!
//! ```text
//! <data_dir>/
//! ├── warwalk.toml              # Optional config
//! ├── NewData/                  # Survey logs waiting for ingestion
//! ├── OldData/                  # Logs already ingested
//! └── Database/
//!     └── warwalking.sqlite3    # Observation store
//! ```

use std::path::{Path, PathBuf};

pub const PENDING_DIR: &str = "NewData";
pub const ARCHIVE_DIR: &str = "OldData";
pub const DATABASE_DIR: &str = "Database";
pub const DATABASE_FILE: &str = "warwalking.sqlite3";
pub const CONFIG_FILE: &str = "warwalk.toml";

/// Logs waiting for ingestion: `<data>/NewData/`
pub fn pending_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(PENDING_DIR)
}

/// Ingested logs: `<data>/OldData/`
pub fn archive_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(ARCHIVE_DIR)
}

/// Observation store: `<data>/Database/warwalking.sqlite3`
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_DIR).join(DATABASE_FILE)
}

/// Project-local config: `./warwalk.toml`
pub fn local_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE)
}

/// User config: `<config dir>/warwalk/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("warwalk").join("config.toml"))
}
