use anyhow::{Context, Result};
use warwalk::config::Config;
use warwalk::paths;

pub fn execute(config: &Config, write_config: bool) -> Result<()> {
    let sources = super::sources(config)?;
    sources
        .prepare()
        .context("Failed to create data directories")?;

    let store = super::open_store(config)?;

    println!("✓ Pending logs:  {}", sources.pending_dir().display());
    println!("✓ Archived logs: {}", sources.archive_dir().display());
    println!("✓ Database:      {}", config.database_path()?.display());
    println!("Total observations: {}", store.count(None)?);

    if write_config {
        let path = config.data_dir()?.join(paths::CONFIG_FILE);
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            config.save(&path)?;
            println!("✓ Wrote {}", path.display());
        }
    }

    Ok(())
}
