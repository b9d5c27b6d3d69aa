use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional settings file read from the working directory at startup.
pub const CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings.  Every field has a default, so `dashboard.json` may
/// list only the ones it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    /// Rows in the best-rated table.
    pub top_n: usize,
    /// Bins of the runtime histogram.
    pub histogram_bins: usize,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("NetflixOriginals.csv"),
            top_n: 5,
            histogram_bins: 20,
            window_width: 1200.0,
            window_height: 900.0,
        }
    }
}

impl DashboardConfig {
    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config.clamped())
    }

    /// Use `path` when it exists, defaults otherwise.  A broken file is
    /// reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }

    fn clamped(mut self) -> Self {
        self.top_n = self.top_n.max(1);
        self.histogram_bins = self.histogram_bins.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_path": "films.parquet", "histogram_bins": 0}}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("films.parquet"));
        assert_eq!(config.histogram_bins, 1);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn missing_or_broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(CONFIG_FILE);
        assert_eq!(DashboardConfig::load_or_default(&missing), DashboardConfig::default());

        std::fs::write(&missing, "not json").unwrap();
        assert!(DashboardConfig::from_file(&missing).is_err());
        assert_eq!(DashboardConfig::load_or_default(&missing), DashboardConfig::default());
    }
}
