//! Configuration from `warwalk.toml`
//!
//! Every section and field is optional; missing values fall back to the
//! default layout in [`crate::paths`]. Directory values may use `~` and
//! `$VAR`, and relative sub-directories resolve against `data_dir`.

use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_pending_dir")]
    pub pending_dir: String,
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,
    #[serde(default = "default_database_dir")]
    pub database_dir: String,
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_data_dir() -> String {
    ".".to_string()
}
fn default_pending_dir() -> String {
    paths::PENDING_DIR.to_string()
}
fn default_archive_dir() -> String {
    paths::ARCHIVE_DIR.to_string()
}
fn default_database_dir() -> String {
    paths::DATABASE_DIR.to_string()
}
fn default_database_file() -> String {
    paths::DATABASE_FILE.to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            pending_dir: default_pending_dir(),
            archive_dir: default_archive_dir(),
            database_dir: default_database_dir(),
            database_file: default_database_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    /// Listings larger than this trigger a warning
    #[serde(default = "default_marker_limit")]
    pub marker_limit: usize,
}

fn default_marker_limit() -> usize {
    500
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            marker_limit: default_marker_limit(),
        }
    }
}

impl Config {
    /// Load config from an explicit file, or the first of `./warwalk.toml`
    /// and the user config that exists, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let candidates = std::iter::once(paths::local_config_path()).chain(paths::user_config_path());
        for path in candidates {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "using config file");
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::load_from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn load_from_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        Ok(config)
    }

    /// Write this config as pretty TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Replace the data directory, e.g. from a command-line flag
    pub fn with_data_dir(mut self, data_dir: &Path) -> Self {
        self.paths.data_dir = data_dir.display().to_string();
        self
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        expand(&self.paths.data_dir)
    }

    pub fn pending_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(expand(&self.paths.pending_dir)?))
    }

    pub fn archive_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(expand(&self.paths.archive_dir)?))
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(self
            .data_dir()?
            .join(expand(&self.paths.database_dir)?)
            .join(&self.paths.database_file))
    }
}

fn expand(raw: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(raw).with_context(|| format!("Failed to expand path: {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_layout() -> Result<()> {
        let config = Config::default().with_data_dir(Path::new("/survey"));
        let data = Path::new("/survey");
        assert_eq!(config.pending_dir()?, paths::pending_dir(data));
        assert_eq!(config.archive_dir()?, paths::archive_dir(data));
        assert_eq!(config.database_path()?, paths::database_path(data));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.display.marker_limit, 500);
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Result<()> {
        let config = Config::load_from_str(
            r#"
            [paths]
            data_dir = "/data/walks"
            archive_dir = "/backup/logs"

            [display]
            marker_limit = 50
            "#,
        )?;
        assert_eq!(config.pending_dir()?, PathBuf::from("/data/walks/NewData"));
        assert_eq!(config.archive_dir()?, PathBuf::from("/backup/logs"));
        assert_eq!(config.display.marker_limit, 50);
        assert_eq!(config.logging.level, "warn");
        Ok(())
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::load_from_str("[paths\ndata_dir = 1").is_err());
    }

    #[test]
    fn test_save_and_load_explicit() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("warwalk.toml");
        let mut config = Config::default();
        config.logging.level = "debug".to_string();
        config.save(&path)?;

        let loaded = Config::load(Some(path.as_path()))?;
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.paths.database_file, paths::DATABASE_FILE);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/warwalk.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
