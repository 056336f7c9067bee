//! TOML configuration for the estimator.
//!
//! Every section and key is optional; a missing file section falls back to
//! the statutory defaults.
//!
//! ```toml
//! [rules]
//! replacement_buffer_rate = "0.05"
//! three_property_limit = 3
//! aggregate_value_multiplier = "2.00"
//! acquisition_threshold = "0.95"
//!
//! [logging]
//! level = "info"
//! file = "exchange.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use exchange_core::ExchangeRules;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rules: ExchangeRules,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` and `-v` take
    /// precedence.
    pub level: Option<String>,
    /// Append log records to this file as well as stderr.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Loads and validates `path`, or returns the defaults when `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("failed to parse TOML configuration")?;
        config.rules.validate().context("invalid [rules] section")?;
        Ok(config)
    }
}
