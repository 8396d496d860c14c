pub mod count;
pub mod dedupe;
pub mod ingest;
pub mod init;
pub mod list;

use anyhow::{Context, Result};
use warwalk::config::Config;
use warwalk::pipeline::DirectorySources;
use warwalk::storage::ObservationStore;

/// Open the configured store, creating it if needed
pub fn open_store(config: &Config) -> Result<ObservationStore> {
    let path = config.database_path()?;
    ObservationStore::open(&path)
        .with_context(|| format!("Failed to open database: {}", path.display()))
}

/// Pending and archive directories from config
pub fn sources(config: &Config) -> Result<DirectorySources> {
    Ok(DirectorySources::new(
        config.pending_dir()?,
        config.archive_dir()?,
    ))
}
