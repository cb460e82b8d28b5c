use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// toy histogram document published with the uhepp docs
pub const DATA_URL: &str = "https://gitlab.cern.ch/fsauerbu/uhepp/-/raw/master/docs/toyhisto.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    DATA_URL.into()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_compression")]
    pub compression: String, // snappy | zstd | none
}

fn default_compression() -> String {
    "snappy".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { compression: default_compression() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("toyhist")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// missing file means defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&content)
            .map_err(|e| crate::ToyHistError::Other(format!("{}: {e}", path.display())))?;
        Ok(cfg)
    }
}
