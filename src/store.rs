use crate::types::Dataset;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// JSON file holding the draw history between runs.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    source: String,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Reads the stored dataset. A missing or unreadable file is not an
    /// error: the run starts over from an empty history.
    pub fn load(&self) -> Dataset {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no stored results yet");
                return Dataset::empty(&self.source);
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "error loading existing data: {}", e);
                return Dataset::empty(&self.source);
            }
        };

        match serde_json::from_str::<Dataset>(&raw) {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "error parsing existing data: {}", e);
                Dataset::empty(&self.source)
            }
        }
    }

    /// Replaces the stored dataset. The JSON goes to a sibling temp file first
    /// and is renamed into place.
    pub fn save(&self, dataset: &Dataset) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }

        let mut json = serde_json::to_string_pretty(dataset).context("failed to serialize results")?;
        json.push('\n');

        let tmp = self.tmp_path();
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "results.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
