//! `solflat.toml` configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solflat_core::{FlattenOptions, OutputNaming};

/// Config file looked up in the working root.
pub const CONFIG_FILE: &str = "solflat.toml";

/// ```toml
/// [flatten]
/// unresolved_imports = "skip"   # or "fail"
/// cycles = "keep"               # or "break"
///
/// [output]
/// directory = "browser"
/// suffix = "_flat"
/// extension = "sol"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub flatten: FlattenOptions,
    pub output: OutputNaming,
}

impl Config {
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load `solflat.toml` from `root`, falling back to defaults if absent.
    pub async fn load(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, root.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot read {}", path.display()));
            }
        };
        let config = Self::from_toml(&text).with_context(|| format!("Invalid {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
