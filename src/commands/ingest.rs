use anyhow::{Context, Result};
use console::Term;
use warwalk::config::Config;
use warwalk::pipeline::{self, IngestReport, NoProgress, Progress, ProgressSink, SourceReport};

pub fn execute(config: &Config, json: bool) -> Result<()> {
    let sources = super::sources(config)?;
    sources
        .prepare()
        .context("Failed to create data directories")?;
    let mut store = super::open_store(config)?;

    let report = if json {
        pipeline::run_batch(&mut store, &sources, &mut NoProgress)?
    } else {
        println!("🔄 Running ingestor on {}", sources.pending_dir().display());
        pipeline::run_batch(&mut store, &sources, &mut TermProgress::new())?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    let left = report.unarchived().count();
    if left > 0 {
        anyhow::bail!("{left} source(s) left in {}", sources.pending_dir().display());
    }
    Ok(())
}

fn print_summary(report: &IngestReport) {
    if report.sources.is_empty() {
        println!("No new log files");
    }
    for source in &report.sources {
        print_source(source);
    }

    println!();
    println!("Inserted:           {}", report.inserted());
    println!("Skipped lines:      {}", report.rejected_lines());
    println!("Duplicates removed: {}", report.duplicates_removed);
    println!("Total observations: {}", report.total_observations);
}

fn print_source(source: &SourceReport) {
    let marker = if source.is_archived() { "✓" } else { "⚠️" };
    println!(
        "  {} {}: {} inserted, {} skipped ({})",
        marker,
        source.path.display(),
        source.inserted,
        source.rejected.len(),
        source.state
    );
    for failure in &source.rejected {
        println!("      line {}: {}", failure.line, failure.error);
    }
    if let Some(error) = &source.error {
        println!("      {}", error);
    }
}

/// In-place percentage line on stderr
struct TermProgress {
    term: Term,
    last: Option<u32>,
}

impl TermProgress {
    fn new() -> Self {
        Self {
            term: Term::stderr(),
            last: None,
        }
    }
}

impl ProgressSink for TermProgress {
    // Terminal output is best-effort; a broken stderr must not fail ingestion
    fn update(&mut self, event: &Progress<'_>) {
        if !self.term.is_term() {
            return;
        }
        match event {
            Progress::SourceStarted {
                path, index, count, ..
            } => {
                self.last = None;
                let _ = self
                    .term
                    .write_line(&format!("[{}/{}] {}", index + 1, count, path.display()));
            }
            Progress::Lines { .. } => {
                let Some(fraction) = event.fraction() else {
                    return;
                };
                let hundredths = (fraction * 10_000.0).round() as u32;
                if self.last == Some(hundredths) {
                    return;
                }
                self.last = Some(hundredths);
                let _ = self.term.clear_line();
                let _ = self.term.write_str(&format!(
                    "Uploading observations to database: {:.2}%",
                    fraction * 100.0
                ));
            }
            Progress::SourceFinished { .. } => {
                let _ = self.term.clear_line();
            }
            Progress::BatchFinished { .. } => {}
        }
    }
}
