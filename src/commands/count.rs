use anyhow::Result;
use warwalk::config::Config;
use warwalk::query::MapView;
use warwalk::types::Viewport;

pub fn execute(config: &Config, viewport: Option<Viewport>, json: bool) -> Result<()> {
    let store = super::open_store(config)?;
    let counts = MapView::new(&store).class_counts(viewport.as_ref())?;

    if json {
        let result = serde_json::json!({
            "viewport": viewport,
            "counts": counts,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Total observations: {}", counts.total);
    println!("[open:{}][wep:{}][other:{}]", counts.open, counts.wep, counts.other);
    Ok(())
}
