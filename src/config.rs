use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::importers::asana_mapper::StatusSource;
use crate::logging::LogFormat;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub asana: Option<AsanaConfig>,
    pub output: Option<OutputConfig>,
    pub log: Option<LogSettings>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AsanaConfig {
    /// Base project URL, e.g. `https://app.asana.com/0/1/`.
    pub org_url: Option<String>,
    #[serde(default)]
    pub status_source: StatusSource,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LogSettings {
    pub level: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".work-import")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    Ok(toml::from_str(contents)?)
}

impl AppConfig {
    pub fn org_url(&self) -> Option<&str> {
        self.asana.as_ref().and_then(|a| a.org_url.as_deref())
    }

    pub fn status_source(&self) -> StatusSource {
        self.asana
            .as_ref()
            .map(|a| a.status_source)
            .unwrap_or_default()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_format(&self) -> LogFormat {
        self.log.as_ref().map(|l| l.format).unwrap_or_default()
    }
}
