//! Structured logging via `tracing`. Everything goes to stderr so the import
//! document can be piped from stdout.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
}

impl LogConfig {
    /// `-v` count wins over the configured level; without flags the configured
    /// level (or info) is used.
    pub fn resolve(verbosity: u8, configured: Option<&str>, format: LogFormat) -> Result<Self> {
        let level = match verbosity {
            0 => match configured {
                Some(raw) => parse_level(raw)?,
                None => Level::INFO,
            },
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Ok(Self { level, format })
    }
}

fn parse_level(raw: &str) -> Result<Level> {
    raw.parse::<Level>()
        .map_err(|_| anyhow!("Unknown log level '{raw}' (expected error, warn, info, debug or trace)"))
}

/// Install the global subscriber. `RUST_LOG` overrides the resolved level.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_lowercase()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_config() {
        let config = LogConfig::resolve(1, Some("warn"), LogFormat::Compact).unwrap();
        assert_eq!(config.level, Level::DEBUG);
        let config = LogConfig::resolve(3, None, LogFormat::Compact).unwrap();
        assert_eq!(config.level, Level::TRACE);
    }

    #[test]
    fn configured_level_used_without_flags() {
        let config = LogConfig::resolve(0, Some("warn"), LogFormat::Json).unwrap();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Json);
        let config = LogConfig::resolve(0, None, LogFormat::Compact).unwrap();
        assert_eq!(config.level, Level::INFO);
    }

    #[test]
    fn unknown_level_fails() {
        let err = LogConfig::resolve(0, Some("loud"), LogFormat::Compact).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }
}
