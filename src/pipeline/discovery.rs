//! Pending-source discovery and archival
//!
//! The pipeline only sees the [`SourceCatalog`] trait: a list of pending
//! log files and a way to move one out of the pending set.
//! [`DirectorySources`] is the on-disk implementation: files waiting in
//! one directory get moved into another once ingested.

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collaborator that owns the set of log files awaiting ingestion
pub trait SourceCatalog {
    /// Pending sources, in the order they should be processed
    fn pending(&self) -> Result<Vec<PathBuf>>;

    /// Remove a fully ingested source from the pending set
    fn archive(&self, source: &Path) -> Result<()>;
}

/// Pending and archive directories on the local filesystem
#[derive(Debug, Clone)]
pub struct DirectorySources {
    pending_dir: PathBuf,
    archive_dir: PathBuf,
}

impl DirectorySources {
    pub fn new(pending_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            pending_dir: pending_dir.into(),
            archive_dir: archive_dir.into(),
        }
    }

    /// Create both directories if missing
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.pending_dir)?;
        fs::create_dir_all(&self.archive_dir)?;
        Ok(())
    }

    pub fn pending_dir(&self) -> &Path {
        &self.pending_dir
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }
}

impl SourceCatalog for DirectorySources {
    /// Regular, non-hidden files directly inside the pending directory,
    /// sorted by name
    fn pending(&self) -> Result<Vec<PathBuf>> {
        if !self.pending_dir.is_dir() {
            return Err(Error::Discovery {
                dir: self.pending_dir.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "pending directory missing"),
            });
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(&self.pending_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| Error::Discovery {
                dir: self.pending_dir.clone(),
                source: io::Error::from(e),
            })?;

            if !entry.file_type().is_file() || is_hidden(entry.path()) {
                continue;
            }
            files.push(entry.into_path());
        }

        Ok(files)
    }

    /// Move the file into the archive directory under the same name,
    /// replacing any earlier archive of that name
    fn archive(&self, source: &Path) -> Result<()> {
        let archive_error = |source_err: io::Error| Error::Archive {
            path: source.to_path_buf(),
            source: source_err,
        };

        let file_name = source.file_name().ok_or_else(|| {
            archive_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "source has no file name",
            ))
        })?;
        let target = self.archive_dir.join(file_name);

        if fs::rename(source, &target).is_err() {
            // Rename fails across filesystems; fall back to copy + remove
            fs::copy(source, &target).map_err(archive_error)?;
            fs::remove_file(source).map_err(archive_error)?;
        }

        tracing::debug!(from = %source.display(), to = %target.display(), "archived source");
        Ok(())
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sources(temp: &TempDir) -> DirectorySources {
        DirectorySources::new(temp.path().join("NewData"), temp.path().join("OldData"))
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new("NewData/.gitkeep")));
        assert!(!is_hidden(Path::new("NewData/ww_scan.csv")));
    }

    #[test]
    fn test_pending_lists_sorted_files_only() -> Result<()> {
        let temp = TempDir::new()?;
        let dirs = sources(&temp);
        dirs.prepare()?;

        fs::write(dirs.pending_dir().join("b.csv"), "")?;
        fs::write(dirs.pending_dir().join("a.csv"), "")?;
        fs::write(dirs.pending_dir().join(".DS_Store"), "")?;
        fs::create_dir(dirs.pending_dir().join("nested"))?;
        fs::write(dirs.pending_dir().join("nested").join("c.csv"), "")?;

        let pending = dirs.pending()?;
        let names: Vec<_> = pending
            .iter()
            .filter_map(|p| p.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
        Ok(())
    }

    #[test]
    fn test_missing_pending_dir_is_discovery_error() {
        let temp = TempDir::new().unwrap();
        let dirs = sources(&temp);
        assert!(matches!(dirs.pending(), Err(Error::Discovery { .. })));
    }

    #[test]
    fn test_archive_moves_and_replaces() -> Result<()> {
        let temp = TempDir::new()?;
        let dirs = sources(&temp);
        dirs.prepare()?;

        let source = dirs.pending_dir().join("scan.csv");
        fs::write(dirs.archive_dir().join("scan.csv"), "old")?;
        fs::write(&source, "new")?;

        dirs.archive(&source)?;

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(dirs.archive_dir().join("scan.csv"))?, "new");
        assert!(dirs.pending()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_archive_missing_source_fails() -> Result<()> {
        let temp = TempDir::new()?;
        let dirs = sources(&temp);
        dirs.prepare()?;

        let result = dirs.archive(&dirs.pending_dir().join("ghost.csv"));
        assert!(matches!(result, Err(Error::Archive { .. })));
        Ok(())
    }
}
