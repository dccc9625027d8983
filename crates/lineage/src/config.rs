//! Project configuration (`lineage.yaml`).
//!
//! Every key is optional:
//!
//! ```yaml
//! data-file: lineage.jsonl
//! within-universe: false
//! fail-on-cycle: false
//! ```
//!
//! A relative `data-file` is resolved against the directory holding the
//! configuration file, so a project can be analysed from anywhere.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "lineage.yaml";

/// Lineage document used when neither the config nor the command line names one
pub const DEFAULT_DATA_FILE: &str = "lineage.jsonl";

/// Lineage project configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LineageConfig {
    /// Path to the lineage document
    pub data_file: PathBuf,

    /// Restrict downstream results to nodes declared in the document
    pub within_universe: bool,

    /// Treat an incomplete order as a command failure
    pub fail_on_cycle: bool,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            within_universe: false,
            fail_on_cycle: false,
            base_dir: PathBuf::new(),
        }
    }
}

impl LineageConfig {
    /// Parse configuration from YAML text.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file that must exist.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config = Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `lineage.yaml` from `dir`, falling back to the defaults when the
    /// file does not exist.
    pub async fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&path).await? {
            return Self::load(&path).await;
        }

        tracing::debug!(dir = %dir.display(), "No configuration file, using defaults");
        Ok(Self {
            base_dir: dir.to_path_buf(),
            ..Self::default()
        })
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Path of the lineage document, resolved against the config directory.
    #[must_use]
    pub fn resolved_data_file(&self) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            self.base_dir.join(&self.data_file)
        }
    }
}
