use anyhow::Result;
use warwalk::config::Config;

pub fn execute(config: &Config) -> Result<()> {
    let mut store = super::open_store(config)?;

    let removed = store.dedupe()?;
    println!("✓ Removed {} duplicate observation(s)", removed);
    println!("Total observations: {}", store.count(None)?);
    Ok(())
}
