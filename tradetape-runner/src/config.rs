//! Report configuration loaded from TOML.
//!
//! ```toml
//! [columns]
//! currency = "USD"
//! datetime_format = "%d/%m/%Y %H:%M"
//!
//! [report]
//! separate_long_short = true
//! parallel = false
//! precision = 4
//! ```
//!
//! Every key is optional; an empty file yields [`ReportConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tradetape_core::data::ColumnMap;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub columns: ColumnMap,
    pub report: ReportOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Add per-side rows to the monthly table.
    pub separate_long_short: bool,
    /// Summarize months on the rayon pool.
    pub parallel: bool,
    /// Decimal places in text output.
    pub precision: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            separate_long_short: false,
            parallel: false,
            precision: 6,
        }
    }
}

/// Upper bound on text precision; `f64` carries no more significant digits.
const MAX_PRECISION: usize = 17;

impl ReportConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded report config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Replace the money-column currency suffix, rejecting a blank one.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Result<Self, ConfigError> {
        self.columns.currency = currency.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("columns.currency is empty".into()));
        }
        if self.report.precision > MAX_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "report.precision {} exceeds {MAX_PRECISION}",
                self.report.precision
            )));
        }
        Ok(())
    }
}
