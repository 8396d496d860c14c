//! Batch ingestion: discover -> parse -> persist -> archive -> dedupe

use super::discovery::SourceCatalog;
use super::report::{IngestReport, LineFailure, Progress, ProgressSink, SourceReport, SourceState};
use crate::error::{Error, RecordError, Result};
use crate::parser::parse_line;
use crate::storage::ObservationStore;
use std::fs;
use std::path::Path;

/// Ingest every pending source, then run one deduplication pass.
///
/// Malformed lines are skipped and listed in the source's report. A source
/// that cannot be read is left pending and reported. A store failure ends
/// the batch immediately and is returned; sources committed before it stay
/// committed and the dedupe pass does not run.
pub fn run_batch(
    store: &mut ObservationStore,
    catalog: &dyn SourceCatalog,
    progress: &mut dyn ProgressSink,
) -> Result<IngestReport> {
    let sources = catalog.pending()?;
    tracing::info!(count = sources.len(), "discovered pending sources");

    let mut report = IngestReport::default();
    for (index, path) in sources.iter().enumerate() {
        let source = ingest_source(store, catalog, path, index, sources.len(), progress)?;
        progress.update(&Progress::SourceFinished { report: &source });
        report.sources.push(source);
    }

    report.duplicates_removed = store.dedupe()?;
    report.total_observations = store.count(None)?;

    tracing::info!(
        sources = report.sources.len(),
        inserted = report.inserted(),
        rejected = report.rejected_lines(),
        removed = report.duplicates_removed,
        total = report.total_observations,
        "ingestion batch complete"
    );
    progress.update(&Progress::BatchFinished { report: &report });

    Ok(report)
}

/// Process a single source up to archival.
///
/// Only store failures are returned as errors; everything else ends up in
/// the report.
pub fn ingest_source(
    store: &mut ObservationStore,
    catalog: &dyn SourceCatalog,
    path: &Path,
    index: usize,
    count: usize,
    progress: &mut dyn ProgressSink,
) -> Result<SourceReport> {
    let mut report = SourceReport::new(path);
    report.state = SourceState::Parsing;

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(source) => {
            let err = Error::SourceRead {
                path: path.to_path_buf(),
                source,
            };
            tracing::warn!("{err}; source left pending");
            report.state = SourceState::ParseFailed;
            report.error = Some(err.to_string());
            return Ok(report);
        }
    };

    let lines = split_lines(&content);
    report.lines = lines.len();
    progress.update(&Progress::SourceStarted {
        path,
        index,
        count,
        lines: lines.len(),
    });

    let mut parsed = Vec::with_capacity(lines.len());
    for (i, raw) in lines.iter().enumerate() {
        match decode_line(raw) {
            Ok(line) if line.trim().is_empty() => report.blank_lines += 1,
            Ok(line) => match parse_line(line) {
                Ok(observation) => parsed.push(observation),
                Err(error) => report.rejected.push(reject(path, i, line.to_string(), error)),
            },
            Err(error) => {
                let text = String::from_utf8_lossy(raw).into_owned();
                report.rejected.push(reject(path, i, text, error));
            }
        }
        progress.update(&Progress::Lines {
            path,
            done: i + 1,
            total: lines.len(),
        });
    }
    report.state = SourceState::Parsed;

    let ids = store.insert_batch(&parsed)?;
    report.inserted = ids.len();
    report.state = SourceState::Persisted;
    tracing::info!(
        file = %path.display(),
        inserted = report.inserted,
        rejected = report.rejected.len(),
        "source persisted"
    );

    match catalog.archive(path) {
        Ok(()) => report.state = SourceState::Archived,
        Err(err) => {
            tracing::warn!("{err}; source left pending");
            report.error = Some(err.to_string());
        }
    }

    Ok(report)
}

/// Split raw file content into lines, dropping the `\n` terminators and
/// any trailing `\r`, the way [`str::lines`] does
fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = content
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect();
    if content.is_empty() || content.ends_with(b"\n") {
        lines.pop();
    }
    lines
}

/// Lines are decoded one by one so an undecodable SSID only costs its own line
fn decode_line(raw: &[u8]) -> Result<&str, RecordError> {
    std::str::from_utf8(raw).map_err(|e| RecordError::InvalidEncoding {
        valid_up_to: e.valid_up_to(),
    })
}

fn reject(path: &Path, index: usize, text: String, error: RecordError) -> LineFailure {
    tracing::warn!(file = %path.display(), line = index + 1, "skipping malformed record: {error}");
    LineFailure {
        line: index + 1,
        text,
        error,
    }
}
