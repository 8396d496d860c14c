use anyhow::Result;
use warwalk::config::Config;
use warwalk::query::MapView;
use warwalk::types::{EncryptionClass, Viewport};

pub fn execute(
    config: &Config,
    class: Option<EncryptionClass>,
    viewport: Option<Viewport>,
    json: bool,
) -> Result<()> {
    let store = super::open_store(config)?;
    let view = MapView::new(&store);

    let observations = view.get(class, viewport.as_ref())?;

    if observations.len() > config.display.marker_limit {
        eprintln!(
            "⚠️  {} observations exceed the display limit of {}; narrow the window to see fewer",
            observations.len(),
            config.display.marker_limit
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&observations)?);
        return Ok(());
    }

    for observation in &observations {
        println!("{}", observation);
    }

    let label = class.map(|c| format!(" with {} encryption", c)).unwrap_or_default();
    println!("{} observation(s){}", observations.len(), label);

    let pending = store.pending_duplicates()?;
    if pending > 0 {
        eprintln!(
            "⚠️  {} duplicate row(s) awaiting deduplication; run `warwalk dedupe`",
            pending
        );
    }
    Ok(())
}
